use crate::config::TableSettings;
use crate::domain::entities::column::ColumnCatalogue;
use crate::domain::entities::filter::{FilterState, SortOrder};
use crate::usecase::services::table_controller::TableOptions;

pub const USERS_SCREEN: &str = "users";
pub const PRODUCTS_SCREEN: &str = "products";

/// Non-data column holding the row actions.
pub const ACTIONS_COLUMN: &str = "actions";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Users,
    Products,
}

impl Screen {
    pub const ALL: [Screen; 2] = [Screen::Users, Screen::Products];

    pub fn key(self) -> &'static str {
        match self {
            Screen::Users => USERS_SCREEN,
            Screen::Products => PRODUCTS_SCREEN,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Screen::Users => "Users",
            Screen::Products => "Products",
        }
    }

    /// Name of one row, for form headings.
    pub fn noun(self) -> &'static str {
        match self {
            Screen::Users => "User",
            Screen::Products => "Product",
        }
    }
}

pub fn user_catalogue() -> ColumnCatalogue {
    ColumnCatalogue::from_pairs(&[
        ("id", "ID"),
        ("name", "Name"),
        ("email", "Email"),
        ("role", "Role"),
        ("phone", "Phone"),
        ("status", "Status"),
        ("country", "Country"),
        ("lastActive", "Last Active"),
        (ACTIONS_COLUMN, "Actions"),
    ])
}

pub fn users_table_options(settings: &TableSettings) -> TableOptions {
    let initial = FilterState::default()
        .with_limit(settings.page_size)
        .with_sort("name", SortOrder::Asc);
    TableOptions::new(
        initial,
        &[
            "name",
            "email",
            "role",
            "phone",
            "status",
            "country",
            "lastActive",
            ACTIONS_COLUMN,
        ],
    )
    .with_catalogue(user_catalogue())
    .with_min_visible(settings.min_visible_columns)
}

pub fn product_catalogue() -> ColumnCatalogue {
    ColumnCatalogue::from_pairs(&[
        ("code", "Product Code"),
        ("title", "Product Title"),
        ("price", "Price"),
        ("stock", "Stock"),
        ("category", "Category"),
        ("status", "Status"),
        (ACTIONS_COLUMN, "Actions"),
    ])
}

pub fn products_table_options(settings: &TableSettings) -> TableOptions {
    let initial = FilterState::default()
        .with_limit(settings.page_size)
        .with_sort("title", SortOrder::Asc);
    TableOptions::new(
        initial,
        &[
            "code",
            "title",
            "price",
            "stock",
            "category",
            "status",
            ACTIONS_COLUMN,
        ],
    )
    .with_catalogue(product_catalogue())
    .with_min_visible(settings.min_visible_columns)
}

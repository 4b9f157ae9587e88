use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::Connection;

use crate::config::TableSettings;
use crate::domain::entities::filter::{FilterState, FilterValue, SortOrder};
use crate::domain::entities::product::{NewProduct, Product};
use crate::domain::entities::user::{NewUser, User, UserPatch, UserRole, UserStatus};
use crate::infra::mock::collection::MockCollection;
use crate::infra::mock::seed::{seed_products, seed_users, SEED_COUNT};
use crate::infra::mock::MockBackend;
use crate::infra::sqlite::queries::{list_view_screens, load_view_query};
use crate::infra::sqlite::repo::SqliteQueryStore;
use crate::infra::sqlite::schema::init_db;
use crate::infra::url::location::MemoryLocation;
use crate::ui::screens::{products_table_options, users_table_options, ACTIONS_COLUMN};
use crate::usecase::ports::query_store::QueryStore;
use crate::usecase::ports::repo::{RecordRepository, RepoError};
use crate::domain::entities::form::FormValues;
use crate::usecase::services::edit_service::{EditService, SubmitError};
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::table_controller::TableController;
use tokio_util::sync::CancellationToken;

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("dioxus-{prefix}-{nanos}"))
}

fn users() -> Arc<MockCollection<User>> {
    Arc::new(MockCollection::new("users", seed_users(SEED_COUNT)))
}

fn list(repo: &MockCollection<User>, filters: &FilterState) -> Vec<String> {
    repo.fetch_list(filters, &CancellationToken::new())
        .expect("list should succeed")
        .data
        .into_iter()
        .map(|user| user.id)
        .collect()
}

#[test]
fn init_db_creates_required_tables() {
    let temp_dir = unique_test_dir("init-db");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let db_path = temp_dir.join("app.sqlite");

    let result = init_db(&db_path);

    assert!(result.is_ok(), "init_db should succeed: {result:?}");

    let conn = Connection::open(&db_path).expect("should open sqlite db");
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'view_query'",
            [],
            |row| row.get(0),
        )
        .expect("should query sqlite_master");
    assert_eq!(table_count, 1, "view_query table should exist");
}

#[test]
fn init_db_is_idempotent() {
    let temp_dir = unique_test_dir("init-db-twice");
    let db_path = temp_dir.join("nested").join("app.sqlite");

    init_db(&db_path).expect("first init should succeed");
    init_db(&db_path).expect("second init should succeed");

    assert!(db_path.is_file());
}

#[test]
fn sqlite_store_restores_filters_for_a_new_controller() {
    let temp_dir = unique_test_dir("view-query");
    let db_path = temp_dir.join("views.sqlite");
    let settings = TableSettings::default();

    {
        let store = SqliteQueryStore::open(db_path.clone(), "users").expect("should open store");
        let mut table: TableController<User, _> =
            TableController::new(users_table_options(&settings), store);
        table.set_search(Some("ann".to_string()));
        table.set_page(3);
    }

    let store = SqliteQueryStore::open(db_path.clone(), "users").expect("should reopen store");
    let table: TableController<User, _> =
        TableController::new(users_table_options(&settings), store);

    assert_eq!(table.filters().q.as_deref(), Some("ann"));
    assert_eq!(table.filters().page, 3);
    assert_eq!(table.filters().sort_by.as_deref(), Some("name"));
    assert_eq!(
        list_view_screens(&db_path).expect("should list screens"),
        vec!["users".to_string()]
    );
}

#[test]
fn sqlite_store_keeps_screens_apart_and_forgets() {
    let temp_dir = unique_test_dir("view-query-screens");
    let db_path = temp_dir.join("views.sqlite");
    let settings = TableSettings::default();

    let users_store = SqliteQueryStore::open(db_path.clone(), "users").expect("should open");
    let products_store = SqliteQueryStore::open(db_path.clone(), "products").expect("should open");
    let mut users_table: TableController<User, _> =
        TableController::new(users_table_options(&settings), users_store);
    let products_table: TableController<Product, _> =
        TableController::new(products_table_options(&settings), products_store.clone());
    users_table.set_limit(50);

    assert_eq!(products_table.filters().limit, settings.page_size);
    assert_eq!(
        products_store.read_query().expect("should read"),
        "",
        "untouched screen should have no stored query"
    );

    users_table.store().forget().expect("should forget");
    assert_eq!(load_view_query(&db_path, "users").expect("should load"), None);
}

#[test]
fn mock_list_searches_name_and_email() {
    let repo = users();
    let mut filters = FilterState::default();
    filters.q = Some("user1".to_string());

    let response = repo
        .fetch_list(&filters, &CancellationToken::new())
        .expect("list should succeed");

    // user1@ plus user10@ .. user19@
    assert_eq!(response.meta.total, 11);
    assert_eq!(response.meta.last_page, 2);
    assert_eq!(response.data.len(), 10);
}

#[test]
fn mock_list_applies_extra_filters_and_ignores_unknown_keys() {
    let repo = users();
    let filters = FilterState::default()
        .with_limit(50)
        .with_filter("role", "Admin")
        .with_filter("shoeSize", "44");

    let response = repo
        .fetch_list(&filters, &CancellationToken::new())
        .expect("list should succeed");

    assert_eq!(response.meta.total, 17);
    assert!(response.data.iter().all(|user| user.role == UserRole::Admin));
}

#[test]
fn mock_list_matches_any_value_of_a_list_filter() {
    let repo = users();
    let filters = FilterState::default().with_filter(
        "status",
        vec!["active".to_string(), "suspended".to_string()],
    );

    let response = repo
        .fetch_list(&filters, &CancellationToken::new())
        .expect("list should succeed");

    let expected = seed_users(SEED_COUNT)
        .iter()
        .filter(|user| user.status != UserStatus::Inactive)
        .count() as u64;
    assert_eq!(response.meta.total, expected);
}

#[test]
fn mock_list_sorts_numbers_numerically() {
    let repo = users();
    let filters = FilterState::default()
        .with_limit(3)
        .with_sort("id", SortOrder::Desc);

    assert_eq!(list(&repo, &filters), vec!["50", "49", "48"]);
}

#[test]
fn mock_list_past_last_page_is_empty_but_counts() {
    let repo = users();
    let mut filters = FilterState::default();
    filters.page = 99;

    let response = repo
        .fetch_list(&filters, &CancellationToken::new())
        .expect("list should succeed");

    assert!(response.data.is_empty());
    assert_eq!(response.meta.total, SEED_COUNT as u64);
    assert_eq!(response.meta.last_page, 5);
}

#[test]
fn mock_list_refuses_a_cancelled_request() {
    let repo = users();
    let token = CancellationToken::new();
    token.cancel();

    let result = repo.fetch_list(&FilterState::default(), &token);

    assert_eq!(result, Err(RepoError::Cancelled));
}

#[test]
fn product_status_filter_uses_display_names() {
    let repo = MockCollection::new("products", seed_products(SEED_COUNT));
    let filters = FilterState::default().with_filter("status", "out of stock");

    let response = repo
        .fetch_list(&filters, &CancellationToken::new())
        .expect("list should succeed");

    assert_eq!(response.meta.total, 12);
    assert!(response.data.iter().all(|product| product.stock == 0));
}

fn form(pairs: &[(&str, &str)]) -> FormValues {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn create_form_is_validated_before_saving() {
    let repo = users();
    let edits = EditService::new(repo.clone() as Arc<dyn RecordRepository<User>>);

    let rejected = edits.submit_create(&form(&[("name", "Grace"), ("email", "grace@")]));

    let errors = match rejected {
        Err(SubmitError::Invalid(errors)) => errors,
        other => panic!("invalid form should be rejected: {other:?}"),
    };
    assert_eq!(errors.get("email"), Some("Invalid email"));
    assert_eq!(repo.len(), SEED_COUNT);

    let created = edits
        .submit_create(&form(&[
            ("name", "Grace Hopper"),
            ("email", "grace@company.com"),
            ("role", "Admin"),
            ("status", "active"),
            ("phone", "+1 555 0199"),
            ("country", "USA"),
        ]))
        .expect("valid form should save");
    assert_eq!(created.id, "51");
    assert_eq!(list(&repo, &FilterState::default())[0], "51");
}

#[test]
fn edit_form_saves_only_changed_fields() {
    let repo = users();
    let edits = EditService::new(repo.clone() as Arc<dyn RecordRepository<User>>);
    let initial = edits.edit_values("2").expect("seeded user should load");
    let mut values = initial.clone();
    values.insert("country".to_string(), "Portugal".to_string());

    let updated = edits
        .submit_update("2", &initial, &values)
        .expect("edit should save");

    assert_eq!(updated.country, "Portugal");
    assert_eq!(updated.name, "User 2");

    values.insert("email".to_string(), "broken".to_string());
    assert!(matches!(
        edits.submit_update("2", &initial, &values),
        Err(SubmitError::Invalid(_))
    ));
    assert_eq!(
        edits.submit_update("404", &initial, &values_with_name("Nobody")),
        Err(SubmitError::Repo(RepoError::NotFound {
            id: "404".to_string()
        }))
    );
}

fn values_with_name(name: &str) -> FormValues {
    form(&[("name", name)])
}

#[test]
fn edit_service_create_update_delete() {
    let repo = users();
    let edits = EditService::new(repo.clone() as Arc<dyn RecordRepository<User>>);

    let created = edits
        .create(NewUser {
            name: "Ada Lovelace".to_string(),
            email: "ada@company.com".to_string(),
            role: UserRole::Manager,
            status: UserStatus::Active,
            phone: "+44 20 0000".to_string(),
            country: "UK".to_string(),
        })
        .expect("create should succeed");
    assert_eq!(created.id, "51");
    assert_eq!(list(&repo, &FilterState::default())[0], "51");

    let updated = edits
        .update(
            "51",
            UserPatch {
                country: Some("Ireland".to_string()),
                ..UserPatch::default()
            },
        )
        .expect("update should succeed");
    assert_eq!(updated.country, "Ireland");
    assert_eq!(updated.name, "Ada Lovelace");

    edits.delete("51").expect("delete should succeed");
    assert_eq!(
        edits.get("51"),
        Err(RepoError::NotFound {
            id: "51".to_string()
        })
    );
    assert_eq!(repo.len(), SEED_COUNT);
}

#[test]
fn delete_many_stops_at_first_missing_id() {
    let repo = users();
    let edits = EditService::new(repo.clone() as Arc<dyn RecordRepository<User>>);

    let result = edits.delete_many(["1", "2", "404", "3"]);

    assert_eq!(
        result,
        Err(RepoError::NotFound {
            id: "404".to_string()
        })
    );
    assert_eq!(repo.len(), SEED_COUNT - 2);
    assert!(edits.get("3").is_ok());
}

#[test]
fn product_create_derives_status_from_stock() {
    let backend = MockBackend::seeded();
    let edits = EditService::new(backend.products.clone() as Arc<dyn RecordRepository<Product>>);

    let created = edits
        .create(NewProduct {
            code: "NEW001".to_string(),
            title: "Plain Mug".to_string(),
            price: 4.5,
            stock: 0,
            category: "Home".to_string(),
        })
        .expect("create should succeed");

    assert_eq!(created.status.as_str(), "Out of Stock");
    assert_eq!(backend.products.len(), SEED_COUNT + 1);
}

#[test]
fn query_service_drops_superseded_responses() {
    let repo: Arc<dyn RecordRepository<User>> = users();
    let mut service = QueryService::new(repo);
    let first_filters = FilterState::default();
    let second_filters = FilterState::default().with_limit(20);

    let first = service.begin(&first_filters);
    let second = service.begin(&second_filters);

    assert!(first.is_cancelled(), "starting a request cancels the older one");
    let late = service.fetch(&first);
    assert_eq!(late, Err(RepoError::Cancelled));
    assert!(service.accept(&first, late).is_none());

    let fresh = service.fetch(&second);
    let accepted = service
        .accept(&second, fresh)
        .expect("latest response should be accepted")
        .expect("latest response should be ok");
    assert_eq!(accepted.meta.limit, 20);
    assert_eq!(accepted.data.len(), 20);
}

#[test]
fn query_service_only_refetches_on_value_change() {
    let repo: Arc<dyn RecordRepository<User>> = users();
    let mut service = QueryService::new(repo);
    let filters = FilterState::default();

    assert!(service.needs_fetch(&filters));
    service.load(&filters).expect("load should succeed");

    assert!(!service.needs_fetch(&filters.clone()));
    assert!(service.needs_fetch(&filters.with_limit(50)));
}

#[test]
fn controller_filters_drive_mock_listing() {
    let repo = users();
    let settings = TableSettings::default();
    let mut table: TableController<User, _> =
        TableController::new(users_table_options(&settings), MemoryLocation::default());

    table.set_filter("role", Some(FilterValue::from("Manager")));
    table.set_order("id", SortOrder::Asc);

    assert_eq!(list(&repo, table.filters()), vec!["6", "11", "21", "26", "36", "41"]);
    assert_eq!(
        table.store().query(),
        "page=1&limit=10&sortBy=id&order=asc&role=Manager"
    );
}

#[test]
fn controller_with_same_query_reproduces_filters() {
    let settings = TableSettings::default();
    let mut first: TableController<User, _> =
        TableController::new(users_table_options(&settings), MemoryLocation::default());
    first.set_search(Some("user 4".to_string()));
    first.set_filter("country", Some(FilterValue::from("Japan")));
    first.set_page(2);

    let second: TableController<User, _> = TableController::new(
        users_table_options(&settings),
        MemoryLocation::new(first.store().query()),
    );

    assert_eq!(second.filters(), first.filters());
}

#[test]
fn screen_defaults_only_show_known_columns() {
    let settings = TableSettings {
        page_size: 20,
        ..TableSettings::default()
    };
    let table: TableController<User, _> =
        TableController::new(users_table_options(&settings), MemoryLocation::default());

    assert_eq!(table.filters().limit, 20);
    assert_eq!(table.filters().order, Some(SortOrder::Asc));
    assert!(table.visible_columns().iter().all(|key| table.catalogue().contains(key)));
    assert!(!table.visible_columns().contains(&"id".to_string()));
    assert_eq!(
        table.visible_columns().last().map(String::as_str),
        Some(ACTIONS_COLUMN)
    );
}

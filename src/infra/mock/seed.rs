use chrono::{Duration, Utc};

use crate::domain::entities::product::{Product, ProductStatus};
use crate::domain::entities::user::{User, UserRole, UserStatus};

pub const SEED_COUNT: usize = 50;

const COUNTRIES: [&str; 5] = ["USA", "Canada", "Germany", "Egypt", "Japan"];
const ADJECTIVES: [&str; 6] = ["Ergonomic", "Rustic", "Sleek", "Handmade", "Refined", "Small"];
const NOUNS: [&str; 7] = ["Chair", "Table", "Lamp", "Keyboard", "Mug", "Backpack", "Shoes"];
const CATEGORIES: [&str; 5] = ["Home", "Office", "Outdoors", "Electronics", "Clothing"];

pub fn seed_users(count: usize) -> Vec<User> {
    let now = Utc::now();
    (0..count)
        .map(|i| User {
            id: (i + 1).to_string(),
            name: format!("User {}", i + 1),
            email: format!("user{}@company.com", i + 1),
            role: if i % 3 == 0 {
                UserRole::Admin
            } else if i % 5 == 0 {
                UserRole::Manager
            } else {
                UserRole::User
            },
            status: if i % 7 == 6 {
                UserStatus::Suspended
            } else if i % 2 == 0 {
                UserStatus::Active
            } else {
                UserStatus::Inactive
            },
            phone: format!("+1 555 01{i:02}"),
            country: COUNTRIES[i % COUNTRIES.len()].to_string(),
            last_active: now - Duration::hours(i as i64),
        })
        .collect()
}

pub fn seed_products(count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[i % ADJECTIVES.len()];
            let noun = NOUNS[i % NOUNS.len()];
            // Every fourth product is sold out.
            let stock = if i % 4 == 3 { 0 } else { ((i * 17) % 100 + 1) as u32 };
            Product {
                id: (i + 1).to_string(),
                code: format!("{}{}", &adjective[..3].to_uppercase(), 100 + i),
                title: format!("{adjective} {noun}"),
                price: 5.0 + ((i * 37) % 500) as f64 + 0.99,
                stock,
                category: CATEGORIES[i % CATEGORIES.len()].to_string(),
                status: ProductStatus::for_stock(stock),
            }
        })
        .collect()
}

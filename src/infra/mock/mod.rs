pub mod collection;
pub mod seed;

use std::sync::Arc;

use crate::domain::entities::product::Product;
use crate::domain::entities::user::User;
use collection::MockCollection;
use seed::{seed_products, seed_users, SEED_COUNT};

/// The resources the dashboard talks to, seeded for local development.
#[derive(Clone)]
pub struct MockBackend {
    pub users: Arc<MockCollection<User>>,
    pub products: Arc<MockCollection<Product>>,
}

impl MockBackend {
    pub fn seeded() -> Self {
        Self {
            users: Arc::new(MockCollection::new("users", seed_users(SEED_COUNT))),
            products: Arc::new(MockCollection::new("products", seed_products(SEED_COUNT))),
        }
    }
}

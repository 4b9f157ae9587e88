use std::path::PathBuf;

use crate::infra::sqlite::queries::{delete_view_query, load_view_query, upsert_view_query};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::query_store::{QueryStore, StoreError, WriteMode};

/// Keeps one screen's query string in sqlite so filters survive restarts.
///
/// There is no history here: push and replace both overwrite the row.
#[derive(Debug, Clone)]
pub struct SqliteQueryStore {
    pub db_path: PathBuf,
    pub screen: String,
}

impl SqliteQueryStore {
    pub fn open(db_path: PathBuf, screen: &str) -> Result<Self, StoreError> {
        init_db(&db_path).map_err(|err| StoreError::Backend(err.to_string()))?;
        Ok(Self {
            db_path,
            screen: screen.to_string(),
        })
    }

    pub fn forget(&self) -> Result<(), StoreError> {
        delete_view_query(&self.db_path, &self.screen)
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

impl QueryStore for SqliteQueryStore {
    fn read_query(&self) -> Result<String, StoreError> {
        load_view_query(&self.db_path, &self.screen)
            .map(Option::unwrap_or_default)
            .map_err(|err| StoreError::Backend(err.to_string()))
    }

    fn write_query(&mut self, query: &str, _mode: WriteMode) -> Result<(), StoreError> {
        upsert_view_query(&self.db_path, &self.screen, query)
            .map_err(|err| StoreError::Backend(err.to_string()))
    }
}

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Overwrite the current entry (no new history step).
    Replace,
    /// Record a new entry the user can navigate back from.
    Push,
}

/// Where the serialized filter state lives between renders and reloads.
pub trait QueryStore {
    fn read_query(&self) -> Result<String, StoreError>;

    fn write_query(&mut self, query: &str, mode: WriteMode) -> Result<(), StoreError>;
}

impl<S: QueryStore + ?Sized> QueryStore for Box<S> {
    fn read_query(&self) -> Result<String, StoreError> {
        (**self).read_query()
    }

    fn write_query(&mut self, query: &str, mode: WriteMode) -> Result<(), StoreError> {
        (**self).write_query(query, mode)
    }
}

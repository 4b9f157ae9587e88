use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::page::ListResponse;
use crate::domain::entities::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("record \"{id}\" was not found")]
    NotFound { id: String },
    #[error("request was cancelled")]
    Cancelled,
    #[error("{0}")]
    Backend(String),
}

/// List and CRUD operations of one resource (`/users`, `/products`).
pub trait RecordRepository<T: Record>: Send + Sync {
    /// Implementations should give up with [`RepoError::Cancelled`] once
    /// `token` is cancelled.
    fn fetch_list(
        &self,
        filters: &FilterState,
        token: &CancellationToken,
    ) -> Result<ListResponse<T>, RepoError>;

    fn get(&self, id: &str) -> Result<T, RepoError>;

    fn create(&self, draft: T::Draft) -> Result<T, RepoError>;

    fn update(&self, id: &str, patch: T::Patch) -> Result<T, RepoError>;

    fn delete(&self, id: &str) -> Result<(), RepoError>;
}

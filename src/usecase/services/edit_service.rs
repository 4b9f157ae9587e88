use std::sync::Arc;

use thiserror::Error;

use crate::domain::entities::form::{changed_values, Editable, FieldErrors, FormValues};
use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RecordRepository, RepoError};

/// Why a create or edit form was not saved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("invalid input: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct EditService<T: Record> {
    repo: Arc<dyn RecordRepository<T>>,
}

impl<T: Record> EditService<T> {
    pub fn new(repo: Arc<dyn RecordRepository<T>>) -> Self {
        Self { repo }
    }

    pub fn get(&self, id: &str) -> Result<T, RepoError> {
        self.repo.get(id)
    }

    pub fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        self.repo.create(draft)
    }

    pub fn update(&self, id: &str, patch: T::Patch) -> Result<T, RepoError> {
        self.repo.update(id, patch)
    }

    pub fn delete(&self, id: &str) -> Result<(), RepoError> {
        self.repo.delete(id).inspect_err(|err| {
            tracing::warn!(id, error = %err, "delete failed");
        })
    }

    /// Deletes every id, stopping at the first failure.
    pub fn delete_many<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<usize, RepoError> {
        let mut deleted = 0;
        for id in ids {
            self.delete(id)?;
            deleted += 1;
        }
        Ok(deleted)
    }
}

impl<T: Editable> EditService<T> {
    /// Validates the create form and stores the new record.
    pub fn submit_create(&self, values: &FormValues) -> Result<T, SubmitError> {
        let draft = T::parse_draft(values).map_err(|errors| {
            tracing::debug!(fields = errors.len(), "create form rejected");
            SubmitError::Invalid(errors)
        })?;
        Ok(self.create(draft)?)
    }

    /// Loads the values the edit form for `id` starts from.
    pub fn edit_values(&self, id: &str) -> Result<FormValues, RepoError> {
        self.get(id).map(|record| record.form_values())
    }

    /// Validates and applies only the fields that differ from `initial`.
    pub fn submit_update(
        &self,
        id: &str,
        initial: &FormValues,
        values: &FormValues,
    ) -> Result<T, SubmitError> {
        let changed = changed_values(initial, values);
        let patch = T::parse_patch(&changed).map_err(|errors| {
            tracing::debug!(id, fields = errors.len(), "edit form rejected");
            SubmitError::Invalid(errors)
        })?;
        Ok(self.update(id, patch)?)
    }
}

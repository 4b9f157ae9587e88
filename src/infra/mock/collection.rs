use std::cmp::Ordering;
use std::sync::RwLock;

use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::{FilterState, SortOrder};
use crate::domain::entities::page::{ListResponse, PageMeta};
use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RecordRepository, RepoError};

/// In-process stand-in for one REST resource.
pub struct MockCollection<T: Record> {
    name: &'static str,
    records: RwLock<Vec<T>>,
}

impl<T: Record> MockCollection<T> {
    pub fn new(name: &'static str, records: Vec<T>) -> Self {
        Self {
            name,
            records: RwLock::new(records),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<T>>, RepoError> {
        self.records
            .read()
            .map_err(|_| RepoError::Backend(format!("{} store is poisoned", self.name)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<T>>, RepoError> {
        self.records
            .write()
            .map_err(|_| RepoError::Backend(format!("{} store is poisoned", self.name)))
    }

    fn next_id(records: &[T]) -> String {
        let max = records
            .iter()
            .filter_map(|record| record.id().parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

/// Applies search, extra-key filters and sorting, then slices the page.
pub fn query_records<T: Record>(records: &[T], filters: &FilterState) -> ListResponse<T> {
    let mut matched: Vec<&T> = records
        .iter()
        .filter(|record| match filters.search_term() {
            Some(needle) => record.matches_search(needle),
            None => true,
        })
        .filter(|record| matches_extra(*record, filters))
        .collect();

    if let Some(sort_by) = filters.sort_by.as_deref() {
        let order = filters.order.unwrap_or(SortOrder::Asc);
        matched.sort_by(|left, right| {
            let ordering = match (left.field(sort_by), right.field(sort_by)) {
                (Some(left), Some(right)) => left.compare(&right),
                _ => Ordering::Equal,
            };
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    let page = filters.page.max(1);
    let limit = filters.limit.max(1);
    let total = matched.len() as u64;
    let start = (page as usize - 1).saturating_mul(limit as usize);
    let data = matched
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();

    ListResponse {
        data,
        meta: PageMeta::new(total, page, limit),
    }
}

// Keys the record does not know are ignored.
fn matches_extra<T: Record>(record: &T, filters: &FilterState) -> bool {
    filters.extra.iter().all(|(key, wanted)| {
        let Some(value) = record.field(key) else {
            return true;
        };
        let wanted = wanted.values();
        wanted.is_empty() || wanted.iter().any(|candidate| value.matches_exact(candidate))
    })
}

impl<T: Record> RecordRepository<T> for MockCollection<T> {
    fn fetch_list(
        &self,
        filters: &FilterState,
        token: &CancellationToken,
    ) -> Result<ListResponse<T>, RepoError> {
        if token.is_cancelled() {
            tracing::debug!(resource = self.name, "list request cancelled before start");
            return Err(RepoError::Cancelled);
        }
        let records = self.read()?;
        let response = query_records(&records, filters);
        tracing::debug!(
            resource = self.name,
            page = response.meta.page,
            total = response.meta.total,
            "served list request"
        );
        Ok(response)
    }

    fn get(&self, id: &str) -> Result<T, RepoError> {
        self.read()?
            .iter()
            .find(|record| record.id() == id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })
    }

    fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        let mut records = self.write()?;
        let record = T::from_draft(Self::next_id(&records), draft);
        records.insert(0, record.clone());
        tracing::info!(resource = self.name, id = record.id(), "created record");
        Ok(record)
    }

    fn update(&self, id: &str, patch: T::Patch) -> Result<T, RepoError> {
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })?;
        record.apply_patch(patch);
        tracing::info!(resource = self.name, id, "updated record");
        Ok(record.clone())
    }

    fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|record| record.id() != id);
        if records.len() == before {
            return Err(RepoError::NotFound { id: id.to_string() });
        }
        tracing::info!(resource = self.name, id, "deleted record");
        Ok(())
    }
}

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::entities::filter::FilterState;
use crate::domain::entities::page::ListResponse;
use crate::domain::entities::record::Record;
use crate::usecase::ports::repo::{RecordRepository, RepoError};

/// One list request, tied to the filter value it was issued for.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    filters: FilterState,
    token: CancellationToken,
}

impl FetchTicket {
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Issues list requests and drops responses that a newer request superseded.
pub struct QueryService<T: Record> {
    repo: Arc<dyn RecordRepository<T>>,
    generation: u64,
    in_flight: Option<CancellationToken>,
    last_filters: Option<FilterState>,
}

impl<T: Record> QueryService<T> {
    pub fn new(repo: Arc<dyn RecordRepository<T>>) -> Self {
        Self {
            repo,
            generation: 0,
            in_flight: None,
            last_filters: None,
        }
    }

    /// True when `filters` differ by value from the last request issued.
    pub fn needs_fetch(&self, filters: &FilterState) -> bool {
        self.last_filters.as_ref() != Some(filters)
    }

    /// Starts a request for `filters`, cancelling whichever one was in flight.
    pub fn begin(&mut self, filters: &FilterState) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.last_filters = Some(filters.clone());
        tracing::debug!(generation = self.generation, "list request started");
        FetchTicket {
            generation: self.generation,
            filters: filters.clone(),
            token,
        }
    }

    pub fn fetch(&self, ticket: &FetchTicket) -> Result<ListResponse<T>, RepoError> {
        self.repo.fetch_list(&ticket.filters, &ticket.token)
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && !ticket.is_cancelled()
    }

    /// Hands back `result` only if `ticket` is still the latest request.
    pub fn accept(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ListResponse<T>, RepoError>,
    ) -> Option<Result<ListResponse<T>, RepoError>> {
        if !self.is_current(ticket) {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.generation,
                "ignoring stale list response"
            );
            return None;
        }
        self.in_flight = None;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "list request failed");
        }
        Some(result)
    }

    /// Begin, fetch and accept in one step.
    pub fn load(&mut self, filters: &FilterState) -> Result<ListResponse<T>, RepoError> {
        let ticket = self.begin(filters);
        let result = self.fetch(&ticket);
        self.accept(&ticket, result)
            .unwrap_or(Err(RepoError::Cancelled))
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}

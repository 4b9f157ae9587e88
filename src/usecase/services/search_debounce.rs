//! Debounced free-text search.
//!
//! The text box edits a local buffer; the buffer reaches the table's `q` only
//! after the quiet period passes without another edit. Commits arrive on a
//! [`SearchCommits`] channel owned by whoever owns the table controller.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::usecase::ports::query_store::QueryStore;
use crate::usecase::services::table_controller::TableController;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Pending,
}

/// Buffer text whose quiet period elapsed, stamped with the edit it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommit {
    generation: u64,
    text: String,
}

impl SearchCommit {
    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct SearchCommits {
    rx: mpsc::UnboundedReceiver<SearchCommit>,
}

impl SearchCommits {
    pub async fn recv(&mut self) -> Option<SearchCommit> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<SearchCommit> {
        self.rx.try_recv().ok()
    }
}

pub struct DebouncedSearch {
    buffer: String,
    upstream: String,
    quiet: Duration,
    // Bumped on every edit, resync, clear and cancel. A commit already sitting
    // in the channel with an older stamp is dropped on arrival.
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SearchCommit>,
}

impl DebouncedSearch {
    /// Must be called inside a tokio runtime: edits spawn the timer task.
    pub fn channel(upstream: Option<&str>, quiet: Duration) -> (Self, SearchCommits) {
        let (tx, rx) = mpsc::unbounded_channel();
        let upstream = upstream.unwrap_or_default().to_string();
        let search = Self {
            buffer: upstream.clone(),
            upstream,
            quiet,
            generation: 0,
            pending: None,
            tx,
        };
        (search, SearchCommits { rx })
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn phase(&self) -> SearchPhase {
        match &self.pending {
            Some(handle) if !handle.is_finished() => SearchPhase::Pending,
            _ => SearchPhase::Idle,
        }
    }

    /// Whether the clear affordance should be enabled.
    pub fn is_active(&self, is_filtered: bool) -> bool {
        !self.buffer.is_empty() || is_filtered
    }

    /// A keystroke: restarts the quiet period with the new text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.cancel();
        self.buffer = text.into();
        if self.buffer == self.upstream {
            return;
        }

        let tx = self.tx.clone();
        let commit = SearchCommit {
            generation: self.generation,
            text: self.buffer.clone(),
        };
        let quiet = self.quiet;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(commit);
        }));
    }

    /// Records that `committed` has been applied upstream.
    pub fn acknowledge(&mut self, committed: &str) {
        self.upstream = committed.to_string();
        if self.phase() == SearchPhase::Idle {
            self.pending = None;
        }
    }

    /// Pulls in an upstream `q` that changed without us (navigation, reset).
    /// Drops any pending commit; never schedules one.
    pub fn sync_upstream(&mut self, upstream: Option<&str>) -> bool {
        let upstream = upstream.unwrap_or_default();
        if upstream == self.upstream {
            return false;
        }
        self.cancel();
        self.upstream = upstream.to_string();
        self.buffer = upstream.to_string();
        true
    }

    /// Empties the buffer right away, skipping the quiet period.
    pub fn clear(&mut self) {
        self.cancel();
        self.buffer.clear();
        self.upstream.clear();
    }

    /// Stops the timer and invalidates any commit it already sent.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True when `commit` still reflects the latest edit of the buffer.
    pub fn is_current(&self, commit: &SearchCommit) -> bool {
        commit.generation == self.generation && commit.text == self.buffer
    }

    /// Applies a received commit to `table`. Commits overtaken by a later
    /// edit, resync or clear are dropped; returns whether it was applied.
    pub fn commit_into<R: Clone, S: QueryStore>(
        &mut self,
        commit: SearchCommit,
        table: &mut TableController<R, S>,
    ) -> bool {
        if !self.is_current(&commit) {
            tracing::debug!(
                stamp = commit.generation,
                latest = self.generation,
                "dropping outdated search commit"
            );
            return false;
        }
        self.acknowledge(&commit.text);
        table.set_search(Some(commit.text));
        true
    }

    /// The clear button: empty the box and reset the table's filters.
    pub fn clear_into<R: Clone, S: QueryStore>(&mut self, table: &mut TableController<R, S>) {
        self.clear();
        table.set_search(None);
        table.reset_filters();
        self.sync_upstream(table.filters().q.as_deref());
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

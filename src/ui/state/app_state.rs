use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::entities::filter::FilterState;
use crate::domain::entities::form::{FieldErrors, FormValues};
use crate::domain::entities::page::ListResponse;
use crate::domain::entities::record::Record;
use crate::infra::sqlite::repo::SqliteQueryStore;
use crate::infra::url::location::MemoryLocation;
use crate::ui::screens::Screen;
use crate::usecase::ports::query_store::{QueryStore, StoreError};
use crate::usecase::ports::repo::{RecordRepository, RepoError};
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::search_debounce::DebouncedSearch;
use crate::usecase::services::table_controller::{TableController, TableOptions};

pub type ScreenStore = Box<dyn QueryStore>;

pub struct ShellState {
    pub active_screen: Signal<Screen>,
    pub sidebar_collapsed: Signal<bool>,
    pub status: Signal<String>,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            active_screen: use_signal(|| Screen::Users),
            sidebar_collapsed: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}

/// Which record form is open, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit { id: String, initial: FormValues },
}

#[derive(Clone, Copy)]
pub struct EditorState {
    pub mode: Signal<Option<EditorMode>>,
    pub errors: Signal<FieldErrors>,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            mode: use_signal(|| None),
            errors: use_signal(FieldErrors::new),
        }
    }

    pub fn open(&mut self, mode: EditorMode) {
        self.errors.set(FieldErrors::new());
        self.mode.set(Some(mode));
    }

    pub fn close(&mut self) {
        self.errors.set(FieldErrors::new());
        self.mode.set(None);
    }
}

/// Everything one CRUD screen binds its table to.
pub struct TableScreen<R: Record> {
    pub controller: Signal<TableController<R, ScreenStore>>,
    pub search: Signal<DebouncedSearch>,
    /// Bumped after writes so the current page is fetched again.
    pub revision: Signal<u64>,
    pub page: Memo<Result<ListResponse<R>, RepoError>>,
}

impl<R: Record> Clone for TableScreen<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Record> Copy for TableScreen<R> {}

/// Sqlite-backed when filters should outlive the window, in-memory otherwise.
pub fn open_screen_store(config: &AppConfig, screen: Screen) -> ScreenStore {
    if config.storage.persist_filters {
        let opened = config
            .db_path()
            .map_err(|err| StoreError::Backend(err.to_string()))
            .and_then(|path| SqliteQueryStore::open(path, screen.key()));
        match opened {
            Ok(store) => return Box::new(store),
            Err(err) => {
                tracing::warn!(screen = screen.key(), error = %err, "falling back to in-memory filters");
            }
        }
    }
    Box::new(MemoryLocation::default())
}

pub fn use_table_screen<R: Record>(
    init: impl FnOnce() -> (TableOptions, ScreenStore),
    repo: Arc<dyn RecordRepository<R>>,
    quiet: Duration,
) -> TableScreen<R> {
    let (mut controller, mut search, commits) = use_hook(|| {
        let (options, store) = init();
        let controller = TableController::new(options, store);
        let (search, commits) = DebouncedSearch::channel(controller.filters().q.as_deref(), quiet);
        (
            Signal::new(controller),
            Signal::new(search),
            Rc::new(RefCell::new(Some(commits))),
        )
    });
    let revision = use_signal(|| 0_u64);
    let service = use_hook(|| Rc::new(RefCell::new(QueryService::new(repo))));

    use_future(move || {
        let commits = commits.borrow_mut().take();
        async move {
            let Some(mut commits) = commits else {
                return;
            };
            while let Some(committed) = commits.recv().await {
                let mut table = controller.write();
                search.write().commit_into(committed, &mut *table);
            }
        }
    });

    use_effect(move || {
        let upstream = controller.read().filters().q.clone();
        search.write().sync_upstream(upstream.as_deref());
    });

    // Column and selection changes must not refetch; only a new filter value does.
    let filters = use_memo(move || controller.read().filters().clone());
    let page = use_memo(move || {
        let _ = revision();
        let filters: FilterState = filters();
        service.borrow_mut().load(&filters)
    });

    TableScreen {
        controller,
        search,
        revision,
        page,
    }
}

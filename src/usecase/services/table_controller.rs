//! State behind a CRUD data table: filters mirrored into a query store, plus
//! the visible-column and selected-row sets.

use crate::domain::entities::column::{ColumnCatalogue, ColumnDef, VisibleColumns, DEFAULT_MIN_VISIBLE};
use crate::domain::entities::filter::{FilterPatch, FilterState, FilterValue, SortOrder};
use crate::infra::url::query_codec::{parse_filters, serialize_filters};
use crate::usecase::ports::query_store::{QueryStore, WriteMode};

#[derive(Debug, Clone)]
pub struct TableOptions {
    pub initial_filters: FilterState,
    pub default_visible_columns: Vec<String>,
    pub catalogue: ColumnCatalogue,
    pub min_visible: usize,
}

impl TableOptions {
    pub fn new(initial_filters: FilterState, default_visible_columns: &[&str]) -> Self {
        Self {
            initial_filters,
            default_visible_columns: default_visible_columns
                .iter()
                .map(|key| key.to_string())
                .collect(),
            catalogue: ColumnCatalogue::default(),
            min_visible: DEFAULT_MIN_VISIBLE,
        }
    }

    pub fn with_catalogue(mut self, catalogue: ColumnCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn with_min_visible(mut self, min_visible: usize) -> Self {
        self.min_visible = min_visible;
        self
    }
}

pub struct TableController<R, S: QueryStore> {
    store: S,
    options: TableOptions,
    filters: FilterState,
    synced_query: String,
    visible: VisibleColumns,
    selected: Vec<R>,
}

impl<R: Clone, S: QueryStore> TableController<R, S> {
    /// Filters start as the initial filters overridden by whatever the store
    /// already holds.
    pub fn new(options: TableOptions, store: S) -> Self {
        let synced_query = read_or_empty(&store);
        let filters = parse_filters(&synced_query, &options.initial_filters);
        let visible = VisibleColumns::new(
            sanitize_keys(&options.catalogue, options.default_visible_columns.clone()),
            options.min_visible,
        );
        tracing::debug!(query = %synced_query, "table controller created");
        Self {
            store,
            options,
            filters,
            synced_query,
            visible,
            selected: Vec::new(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn initial_filters(&self) -> &FilterState {
        &self.options.initial_filters
    }

    pub fn visible_columns(&self) -> &[String] {
        self.visible.keys()
    }

    pub fn visible_set(&self) -> &VisibleColumns {
        &self.visible
    }

    pub fn catalogue(&self) -> &ColumnCatalogue {
        &self.options.catalogue
    }

    /// Catalogue entries currently shown, in catalogue order.
    pub fn columns(&self) -> Vec<&ColumnDef> {
        self.options.catalogue.visible(self.visible.keys())
    }

    pub fn internal_selected(&self) -> &[R] {
        &self.selected
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Re-derives the filters after the store changed underneath us (back or
    /// forward navigation, another writer). Returns whether they changed.
    pub fn sync(&mut self) -> bool {
        let query = read_or_empty(&self.store);
        if query == self.synced_query {
            return false;
        }
        let filters = parse_filters(&query, &self.options.initial_filters);
        self.synced_query = query;
        if filters == self.filters {
            return false;
        }
        tracing::debug!(query = %self.synced_query, "filters re-derived from store");
        self.filters = filters;
        true
    }

    pub fn update_filters(&mut self, patch: FilterPatch) {
        if patch.is_empty() {
            return;
        }
        let next = self.filters.merged(patch);
        self.commit(next, WriteMode::Replace);
    }

    pub fn set_search(&mut self, q: Option<String>) {
        self.update_filters(FilterPatch::new().search(q));
    }

    pub fn set_page(&mut self, page: u32) {
        self.update_filters(FilterPatch::new().page(page));
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.update_filters(FilterPatch::new().limit(limit).page(1));
    }

    /// Changing the order keeps the reader on the page they are looking at.
    pub fn set_order(&mut self, sort_by: &str, order: SortOrder) {
        let page = self.filters.page;
        self.update_filters(
            FilterPatch::new()
                .sort(Some(sort_by.to_string()), Some(order))
                .page(page),
        );
    }

    pub fn set_filter(&mut self, key: &str, value: Option<FilterValue>) {
        self.update_filters(FilterPatch::new().filter(key, value));
    }

    pub fn reset_filters(&mut self) {
        let initial = self.options.initial_filters.clone();
        self.commit(initial, WriteMode::Push);
    }

    pub fn toggle_column(&mut self, key: &str) {
        if !self.options.catalogue.accepts(key) {
            tracing::debug!(key, "ignoring toggle of unknown column");
            return;
        }
        if !self.visible.toggle(key) {
            tracing::debug!(key, min = self.visible.min_visible(), "column toggle refused");
        }
    }

    /// Bulk replacement; the minimum is not enforced here.
    pub fn set_visible_columns(&mut self, keys: Vec<String>) {
        self.visible
            .replace(sanitize_keys(&self.options.catalogue, keys));
    }

    pub fn reset_columns(&mut self) {
        let defaults = sanitize_keys(
            &self.options.catalogue,
            self.options.default_visible_columns.clone(),
        );
        self.visible.replace(defaults);
    }

    pub fn set_internal_selected(&mut self, records: Vec<R>) {
        self.selected = records;
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn commit(&mut self, next: FilterState, mode: WriteMode) {
        let query = serialize_filters(&next);
        if let Err(err) = self.store.write_query(&query, mode) {
            tracing::warn!(error = %err, "failed to persist filters; keeping them in memory");
        }
        tracing::debug!(query = %query, "filters updated");
        self.synced_query = query;
        self.filters = next;
    }
}

fn read_or_empty<S: QueryStore>(store: &S) -> String {
    store.read_query().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to read stored filters; using defaults");
        String::new()
    })
}

fn sanitize_keys(catalogue: &ColumnCatalogue, keys: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keys.len());
    for key in keys {
        if catalogue.accepts(&key) && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::url::location::MemoryLocation;

    fn controller(query: &str) -> TableController<String, MemoryLocation> {
        let options = TableOptions::new(FilterState::default(), &["id", "name"])
            .with_catalogue(ColumnCatalogue::from_pairs(&[
                ("id", "ID"),
                ("name", "Name"),
                ("email", "Email"),
            ]));
        TableController::new(options, MemoryLocation::new(query))
    }

    #[test]
    fn search_resets_page() {
        let mut table = controller("page=7&q=x");

        table.set_search(Some("y".to_string()));

        assert_eq!(table.filters().page, 1);
        assert_eq!(table.filters().q.as_deref(), Some("y"));
        assert_eq!(table.store().query(), "page=1&limit=10&q=y");
    }

    #[test]
    fn order_keeps_page() {
        let mut table = controller("page=7");

        table.set_order("name", SortOrder::Asc);

        assert_eq!(table.filters().page, 7);
        assert_eq!(table.filters().sort_by.as_deref(), Some("name"));
        assert_eq!(table.filters().order, Some(SortOrder::Asc));
    }

    #[test]
    fn limit_resets_page() {
        let mut table = controller("page=4");

        table.set_limit(50);

        assert_eq!(table.filters().page, 1);
        assert_eq!(table.filters().limit, 50);
    }

    #[test]
    fn set_page_touches_only_page() {
        let mut table = controller("q=abc&limit=20");

        table.set_page(3);

        assert_eq!(table.filters().page, 3);
        assert_eq!(table.filters().limit, 20);
        assert_eq!(table.filters().q.as_deref(), Some("abc"));
    }

    #[test]
    fn update_filters_with_order_only_resets_page() {
        let mut table = controller("page=5");

        table.update_filters(FilterPatch {
            order: Some(Some(SortOrder::Desc)),
            ..FilterPatch::default()
        });

        assert_eq!(table.filters().page, 1);
    }

    #[test]
    fn toggle_respects_minimum_and_catalogue() {
        let mut table = controller("");
        table.set_visible_columns(vec!["id".to_string()]);

        table.toggle_column("id");
        assert_eq!(table.visible_columns(), ["id".to_string()]);

        table.toggle_column("nope");
        assert_eq!(table.visible_columns(), ["id".to_string()]);

        table.toggle_column("email");
        assert_eq!(table.visible_columns(), ["id".to_string(), "email".to_string()]);
    }

    #[test]
    fn set_visible_columns_skips_minimum_but_drops_unknown_keys() {
        let mut table = controller("");

        table.set_visible_columns(Vec::new());
        assert!(table.visible_columns().is_empty());

        table.set_visible_columns(vec![
            "email".to_string(),
            "bogus".to_string(),
            "email".to_string(),
        ]);
        assert_eq!(table.visible_columns(), ["email".to_string()]);

        table.reset_columns();
        assert_eq!(table.visible_columns(), ["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn columns_follow_catalogue_order() {
        let mut table = controller("");
        table.set_visible_columns(vec!["email".to_string(), "id".to_string()]);

        let labels: Vec<&str> = table
            .columns()
            .into_iter()
            .map(|column| column.label.as_str())
            .collect();

        assert_eq!(labels, vec!["ID", "Email"]);
    }

    #[test]
    fn selection_survives_page_change_until_cleared() {
        let mut table = controller("");
        table.set_internal_selected(vec!["1".to_string(), "2".to_string()]);

        table.set_page(2);
        assert_eq!(table.internal_selected().len(), 2);

        table.clear_selection();
        assert!(table.internal_selected().is_empty());
    }

    #[test]
    fn reset_restores_initial_filters_exactly() {
        let initial = FilterState::default()
            .with_limit(20)
            .with_sort("name", SortOrder::Desc);
        let options = TableOptions::new(initial.clone(), &["id"]);
        let mut table: TableController<String, _> =
            TableController::new(options, MemoryLocation::default());

        table.set_page(4);
        table.set_search(Some("kim".to_string()));
        table.set_limit(50);
        table.set_page(2);
        table.reset_filters();

        assert_eq!(table.filters(), &initial);
        assert_eq!(table.store().query(), serialize_filters(&initial));
    }

    #[test]
    fn sync_follows_back_navigation() {
        let mut table = controller("");
        table.set_page(2);
        table.reset_filters();
        assert_eq!(table.filters().page, 1);

        assert!(table.store_mut().back());
        assert!(table.sync());
        assert_eq!(table.filters().page, 2);
        assert!(!table.sync());
    }
}

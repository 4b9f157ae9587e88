use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;

use crate::config::AppConfig;
use crate::domain::entities::column::ColumnDef;
use crate::domain::entities::filter::SortOrder;
use crate::domain::entities::form::{Editable, FieldErrors, FieldKind, FormField, FormValues};
use crate::domain::entities::page::PageMeta;
use crate::domain::entities::product::Product;
use crate::domain::entities::record::Record;
use crate::domain::entities::user::User;
use crate::infra::mock::MockBackend;
use crate::ui::screens::{
    products_table_options, users_table_options, Screen, ACTIONS_COLUMN,
};
use crate::ui::state::app_state::{
    open_screen_store, use_table_screen, EditorMode, EditorState, ShellState, TableScreen,
};
use crate::usecase::ports::repo::RecordRepository;
use crate::usecase::services::edit_service::{EditService, SubmitError};

const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

#[derive(Clone, Debug, PartialEq)]
struct TableRow {
    id: String,
    cells: Vec<String>,
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    use_context_provider(MockBackend::seeded);

    let ShellState {
        mut active_screen,
        mut sidebar_collapsed,
        status,
    } = ShellState::new();

    let collapsed = sidebar_collapsed();
    let sidebar_width = if collapsed { 56 } else { 200 };
    let toggle_label = if collapsed { "»" } else { "«" };
    let current = active_screen();
    let current_status = status();
    let persist_note = if config.storage.persist_filters {
        "filters saved"
    } else {
        "filters in memory"
    };

    rsx! {
        div {
            style: "display: flex; height: 100vh; font-family: sans-serif;",
            nav {
                style: "width: {sidebar_width}px; border-right: 1px solid #ddd; padding: 8px; display: flex; flex-direction: column; gap: 6px;",
                button {
                    style: "align-self: flex-end; border: none; background: transparent; cursor: pointer;",
                    onclick: move |_| sidebar_collapsed.set(!collapsed),
                    "{toggle_label}"
                }
                {Screen::ALL.iter().map(|screen| {
                    let screen = *screen;
                    let title = screen.title();
                    let label = if collapsed { &title[..1] } else { title };
                    let background = if screen == current { "#eef4ff" } else { "transparent" };
                    rsx!(
                        button {
                            key: "{title}",
                            style: "text-align: left; border: none; border-radius: 6px; padding: 6px 8px; cursor: pointer; background: {background};",
                            onclick: move |_| active_screen.set(screen),
                            "{label}"
                        }
                    )
                })}
            }
            div {
                style: "flex: 1; display: flex; flex-direction: column; min-width: 0;",
                main {
                    style: "flex: 1; overflow: auto; padding: 16px;",
                    {match current {
                        Screen::Users => rsx! { UsersPage { status } },
                        Screen::Products => rsx! { ProductsPage { status } },
                    }}
                }
                footer {
                    style: "border-top: 1px solid #ddd; padding: 4px 16px; font-size: 12px; color: #555;",
                    "{current_status} · {persist_note}"
                }
            }
        }
    }
}

#[component]
fn UsersPage(status: Signal<String>) -> Element {
    let config = use_context::<AppConfig>();
    let backend = use_context::<MockBackend>();
    let repo: Arc<dyn RecordRepository<User>> = backend.users.clone();
    let init_config = config.clone();
    let table = use_table_screen(
        move || {
            (
                users_table_options(&init_config.table),
                open_screen_store(&init_config, Screen::Users),
            )
        },
        repo.clone(),
        config.table.quiet_period(),
    );
    let edits = use_hook(|| Rc::new(EditService::new(repo)));
    let editor = EditorState::new();

    render_table(Screen::Users, table, edits, editor, status)
}

#[component]
fn ProductsPage(status: Signal<String>) -> Element {
    let config = use_context::<AppConfig>();
    let backend = use_context::<MockBackend>();
    let repo: Arc<dyn RecordRepository<Product>> = backend.products.clone();
    let init_config = config.clone();
    let table = use_table_screen(
        move || {
            (
                products_table_options(&init_config.table),
                open_screen_store(&init_config, Screen::Products),
            )
        },
        repo.clone(),
        config.table.quiet_period(),
    );
    let edits = use_hook(|| Rc::new(EditService::new(repo)));
    let editor = EditorState::new();

    render_table(Screen::Products, table, edits, editor, status)
}

/// Binds a screen's state to [`DataTableView`] and its [`RecordForm`].
fn render_table<R: Editable>(
    screen: Screen,
    mut table: TableScreen<R>,
    edits: Rc<EditService<R>>,
    mut editor: EditorState,
    mut status: Signal<String>,
) -> Element {
    let controller = table.controller.read();
    let filters = controller.filters().clone();
    let catalogue: Vec<ColumnDef> = controller.catalogue().columns().to_vec();
    let columns: Vec<ColumnDef> = controller.columns().into_iter().cloned().collect();
    let locked: Vec<String> = controller
        .visible_columns()
        .iter()
        .filter(|key| controller.visible_set().is_locked(key))
        .cloned()
        .collect();
    let selected: Vec<String> = controller
        .internal_selected()
        .iter()
        .map(|record| record.id().to_string())
        .collect();
    drop(controller);

    let search = table.search.read();
    let search_value = search.value().to_string();
    let clear_active = search.is_active(filters.is_filtered());
    drop(search);

    let (records, meta, error) = match &*table.page.read() {
        Ok(response) => (response.data.clone(), response.meta, String::new()),
        Err(err) => (
            Vec::new(),
            PageMeta::new(0, filters.page, filters.limit),
            err.to_string(),
        ),
    };
    let rows: Vec<TableRow> = records
        .iter()
        .map(|record| TableRow {
            id: record.id().to_string(),
            cells: columns.iter().map(|column| record.cell(&column.key)).collect(),
        })
        .collect();

    let sort_by = filters.sort_by.clone().unwrap_or_default();
    let order = filters.order.unwrap_or(SortOrder::Asc);
    let sorted_key = sort_by.clone();
    let delete_edits = edits.clone();
    let edit_loader = edits.clone();

    let mode = editor.mode.read().clone();
    let form = match mode {
        None => rsx! {},
        Some(mode) => {
            let (heading, form_key, initial) = match &mode {
                EditorMode::Create => (
                    format!("New {}", screen.noun()),
                    "create".to_string(),
                    FormValues::new(),
                ),
                EditorMode::Edit { id, initial } => (
                    format!("Edit {} #{id}", screen.noun()),
                    format!("edit-{id}"),
                    initial.clone(),
                ),
            };
            let errors = editor.errors.read().clone();
            let submit_edits = edits.clone();
            rsx! {
                RecordForm {
                    key: "{form_key}",
                    heading,
                    fields: R::form_fields().to_vec(),
                    initial,
                    errors,
                    on_cancel: move |_| editor.close(),
                    on_submit: move |values: FormValues| {
                        let outcome = match &mode {
                            EditorMode::Create => submit_edits.submit_create(&values),
                            EditorMode::Edit { id, initial } => {
                                submit_edits.submit_update(id, initial, &values)
                            }
                        };
                        match outcome {
                            Ok(record) => {
                                status.set(format!("Saved #{}", record.id()));
                                editor.close();
                                *table.revision.write() += 1;
                            }
                            Err(SubmitError::Invalid(errors)) => editor.errors.set(errors),
                            Err(err) => status.set(format!("Save failed: {err}")),
                        }
                    },
                }
            }
        }
    };

    rsx! {
        DataTableView {
            title: screen.title().to_string(),
            catalogue,
            columns,
            locked,
            rows,
            selected,
            search_value,
            clear_active,
            sort_by,
            order,
            meta,
            error,
            on_search: move |text: String| table.search.write().input(text),
            on_clear: move |_| {
                let mut controller = table.controller.write();
                table.search.write().clear_into(&mut *controller);
            },
            on_sort: move |key: String| {
                let next = if key == sorted_key { order.reversed() } else { SortOrder::Asc };
                table.controller.write().set_order(&key, next);
            },
            on_toggle_column: move |key: String| table.controller.write().toggle_column(&key),
            on_reset_columns: move |_| table.controller.write().reset_columns(),
            on_select: move |id: String| {
                let mut controller = table.controller.write();
                let mut chosen = controller.internal_selected().to_vec();
                if let Some(pos) = chosen.iter().position(|record| record.id() == id) {
                    chosen.remove(pos);
                } else if let Some(record) = records.iter().find(|record| record.id() == id) {
                    chosen.push(record.clone());
                }
                controller.set_internal_selected(chosen);
            },
            on_delete: move |id: String| {
                match delete_edits.delete(&id) {
                    Ok(()) => {
                        let mut controller = table.controller.write();
                        let remaining: Vec<R> = controller
                            .internal_selected()
                            .iter()
                            .filter(|record| record.id() != id)
                            .cloned()
                            .collect();
                        controller.set_internal_selected(remaining);
                        drop(controller);
                        status.set(format!("Deleted #{id}"));
                        *table.revision.write() += 1;
                    }
                    Err(err) => status.set(format!("Delete failed: {err}")),
                }
            },
            on_delete_selected: move |_| {
                let ids: Vec<String> = table
                    .controller
                    .read()
                    .internal_selected()
                    .iter()
                    .map(|record| record.id().to_string())
                    .collect();
                let outcome = edits.delete_many(ids.iter().map(String::as_str));
                table.controller.write().clear_selection();
                match outcome {
                    Ok(count) => status.set(format!("Deleted {count} record(s)")),
                    Err(err) => status.set(format!("Bulk delete stopped: {err}")),
                }
                *table.revision.write() += 1;
            },
            on_page: move |page: u32| table.controller.write().set_page(page),
            on_limit: move |limit: u32| table.controller.write().set_limit(limit),
            on_new: move |_| editor.open(EditorMode::Create),
            on_edit: move |id: String| match edit_loader.edit_values(&id) {
                Ok(initial) => editor.open(EditorMode::Edit { id, initial }),
                Err(err) => status.set(format!("Cannot edit #{id}: {err}")),
            },
        }
        {form}
    }
}

#[component]
fn DataTableView(
    title: String,
    catalogue: Vec<ColumnDef>,
    columns: Vec<ColumnDef>,
    locked: Vec<String>,
    rows: Vec<TableRow>,
    selected: Vec<String>,
    search_value: String,
    clear_active: bool,
    sort_by: String,
    order: SortOrder,
    meta: PageMeta,
    error: String,
    on_search: EventHandler<String>,
    on_clear: EventHandler<()>,
    on_sort: EventHandler<String>,
    on_toggle_column: EventHandler<String>,
    on_reset_columns: EventHandler<()>,
    on_select: EventHandler<String>,
    on_delete: EventHandler<String>,
    on_delete_selected: EventHandler<()>,
    on_page: EventHandler<u32>,
    on_limit: EventHandler<u32>,
    on_new: EventHandler<()>,
    on_edit: EventHandler<String>,
) -> Element {
    let mut columns_open = use_signal(|| false);
    let visible_count = columns.len();
    let catalogue_count = catalogue.len();
    let selected_count = selected.len();
    let range = match meta.row_range(rows.len()) {
        Some((first, last)) => format!("{first}-{last} of {}", meta.total),
        None => "No records".to_string(),
    };
    let page = meta.page;
    let has_previous = meta.has_previous();
    let has_next = meta.has_next();
    let current_limit = meta.limit;
    let arrow = match order {
        SortOrder::Asc => "▲",
        SortOrder::Desc => "▼",
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px;",
            header {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                h2 { style: "margin: 0; flex: 1;", "{title}" }
                input {
                    r#type: "search",
                    placeholder: "Search…",
                    value: "{search_value}",
                    oninput: move |event| on_search.call(event.value()),
                }
                button {
                    disabled: !clear_active,
                    onclick: move |_| on_clear.call(()),
                    "Clear"
                }
                button {
                    onclick: move |_| on_new.call(()),
                    "New"
                }
                button {
                    disabled: selected_count == 0,
                    onclick: move |_| on_delete_selected.call(()),
                    "Delete selected ({selected_count})"
                }
                div {
                    style: "position: relative;",
                    button {
                        onclick: move |_| columns_open.set(!columns_open()),
                        "Columns {visible_count} / {catalogue_count}"
                    }
                    if columns_open() {
                        div {
                            style: "position: absolute; right: 0; top: 32px; min-width: 200px; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200; padding: 6px;",
                            {catalogue.iter().map(|column| {
                                let key = column.key.clone();
                                let label = column.label.clone();
                                let checked = columns.iter().any(|visible| visible.key == key);
                                let disabled = locked.contains(&key);
                                rsx!(
                                    label {
                                        key: "{key}",
                                        style: "display: flex; align-items: center; gap: 8px; padding: 6px 4px;",
                                        input {
                                            r#type: "checkbox",
                                            checked: checked,
                                            disabled: disabled,
                                            onclick: move |_| on_toggle_column.call(key.clone()),
                                        }
                                        span { "{label}" }
                                    }
                                )
                            })}
                            button {
                                style: "margin-top: 6px;",
                                onclick: move |_| on_reset_columns.call(()),
                                "Reset columns"
                            }
                        }
                    }
                }
            }

            if !error.is_empty() {
                div {
                    style: "padding: 8px 12px; border-radius: 6px; background: #fdecea; color: #a11;",
                    "Could not load records: {error}"
                }
            }

            table {
                style: "border-collapse: collapse; width: 100%;",
                thead {
                    tr {
                        th { style: "width: 32px;" }
                        {columns.iter().map(|column| {
                            let key = column.key.clone();
                            let label = column.label.clone();
                            let sortable = key != ACTIONS_COLUMN;
                            let indicator = if sortable && key == sort_by { arrow } else { "" };
                            rsx!(
                                th {
                                    key: "{key}",
                                    style: "position: sticky; top: 0; background: #fafafa; text-align: left; padding: 6px 8px; border-bottom: 1px solid #ddd; cursor: pointer;",
                                    onclick: move |_| {
                                        if sortable {
                                            on_sort.call(key.clone());
                                        }
                                    },
                                    "{label} {indicator}"
                                }
                            )
                        })}
                    }
                }
                tbody {
                    {rows.iter().map(|row| {
                        let id = row.id.clone();
                        let select_id = id.clone();
                        let is_selected = selected.contains(&id);
                        let background = if is_selected { "#eef4ff" } else { "transparent" };
                        let cells: Vec<(String, String)> = columns
                            .iter()
                            .map(|column| column.key.clone())
                            .zip(row.cells.iter().cloned())
                            .collect();
                        rsx!(
                            tr {
                                key: "{id}",
                                style: "background: {background};",
                                td {
                                    input {
                                        r#type: "checkbox",
                                        checked: is_selected,
                                        onclick: move |_| on_select.call(select_id.clone()),
                                    }
                                }
                                {cells.into_iter().map(|(column_key, value)| {
                                    let edit_id = id.clone();
                                    let delete_id = id.clone();
                                    rsx!(
                                        td {
                                            key: "{column_key}",
                                            style: "padding: 6px 8px; border-bottom: 1px solid #eee;",
                                            if column_key == ACTIONS_COLUMN {
                                                button {
                                                    onclick: move |_| on_edit.call(edit_id.clone()),
                                                    "Edit"
                                                }
                                                button {
                                                    onclick: move |_| on_delete.call(delete_id.clone()),
                                                    "Delete"
                                                }
                                            } else {
                                                "{value}"
                                            }
                                        }
                                    )
                                })}
                            }
                        )
                    })}
                }
            }

            footer {
                style: "display: flex; gap: 12px; align-items: center;",
                span { style: "flex: 1;", "{range}" }
                select {
                    value: "{current_limit}",
                    onchange: move |event| {
                        if let Ok(limit) = event.value().parse::<u32>() {
                            on_limit.call(limit);
                        }
                    },
                    {PAGE_SIZE_OPTIONS.iter().map(|size| {
                        let size = *size;
                        rsx!(
                            option {
                                key: "{size}",
                                value: "{size}",
                                selected: size == current_limit,
                                "{size} / page"
                            }
                        )
                    })}
                }
                button {
                    disabled: !has_previous,
                    onclick: move |_| on_page.call(page - 1),
                    "Previous"
                }
                span { "Page {page}" }
                button {
                    disabled: !has_next,
                    onclick: move |_| on_page.call(page + 1),
                    "Next"
                }
            }
        }
    }
}

#[component]
fn RecordForm(
    heading: String,
    fields: Vec<FormField>,
    initial: FormValues,
    errors: FieldErrors,
    on_submit: EventHandler<FormValues>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut values = use_signal(|| initial.clone());

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1500;",
            div {
                style: "background: #fff; border-radius: 10px; padding: 20px; min-width: 360px; display: flex; flex-direction: column; gap: 10px;",
                h3 { style: "margin: 0 0 6px 0;", "{heading}" }
                {fields.iter().map(|field| {
                    let field_key = field.key;
                    let field_label = field.label;
                    let current = values.read().get(field_key).cloned().unwrap_or_default();
                    let message = errors.get(field_key).map(str::to_string);
                    let control = match field.kind {
                        FieldKind::Choice(options) => rsx!(
                            select {
                                value: "{current}",
                                onchange: move |event| {
                                    values.write().insert(field_key.to_string(), event.value());
                                },
                                option { value: "", disabled: true, selected: current.is_empty(), "Choose…" }
                                {options.iter().map(|choice| {
                                    let choice = *choice;
                                    rsx!(
                                        option {
                                            key: "{choice}",
                                            value: "{choice}",
                                            selected: choice == current,
                                            "{choice}"
                                        }
                                    )
                                })}
                            }
                        ),
                        FieldKind::Number => rsx!(
                            input {
                                r#type: "number",
                                step: "any",
                                value: "{current}",
                                oninput: move |event| {
                                    values.write().insert(field_key.to_string(), event.value());
                                },
                            }
                        ),
                        FieldKind::Text => rsx!(
                            input {
                                r#type: "text",
                                value: "{current}",
                                oninput: move |event| {
                                    values.write().insert(field_key.to_string(), event.value());
                                },
                            }
                        ),
                    };
                    rsx!(
                        label {
                            key: "{field_key}",
                            style: "display: flex; flex-direction: column; gap: 4px;",
                            span { "{field_label}" }
                            {control}
                            {message.map(|message| rsx!(
                                span { style: "color: #a11; font-size: 12px;", "{message}" }
                            ))}
                        }
                    )
                })}
                div {
                    style: "display: flex; justify-content: flex-end; gap: 8px; margin-top: 8px;",
                    button {
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        onclick: move |_| on_submit.call(values.read().clone()),
                        "Save"
                    }
                }
            }
        }
    }
}

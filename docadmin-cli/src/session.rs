//! Scripted admin session over the in-memory rule store.
//!
//! Drives both engines the way an operator would: browse and filter the rule
//! table, then open the batch editor, change a few rows and save.

use std::time::Duration;

use chrono::NaiveDate;
use docadmin_lib::EngineConfig;
use docadmin_lib::error::{ContextError, SaveError, TableError};
use docadmin_lib::input::{Key, KeyCombo, Modifiers};
use docadmin_lib::model::Value;
use docadmin_lib::sheet::{
    CellPosition, EditSheet, FieldRules, KeyOutcome, SelectOption, SheetBody, SheetColumn,
    SheetView, ToolbarView,
};
use docadmin_lib::source::LogErrorSink;
use docadmin_lib::table::{
    BodyView, ColumnDef, ColumnSize, Controllers, DataTable, DateField, FilterEditor,
    FilterOption, FilterSpec, Slot, TableView, TitleAction, TitleBar, date_column,
    line_number_column,
};
use log::{debug, info};
use thiserror::Error;

use crate::rule::{Category, Rule, RulePayload};
use crate::store::{self, RuleStore};

/// Session error type.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

// =============================================================================
// Seed data
// =============================================================================

fn categories() -> Vec<Category> {
    vec![
        Category::new(1, "Style"),
        Category::new(2, "Tone"),
        Category::new(3, "Safety"),
    ]
}

const SEED: &[(&str, &str)] = &[
    ("Style", "Prefer active voice"),
    ("Style", "Keep paragraphs under five sentences"),
    ("Tone", "Address the reader directly"),
    ("Safety", "Never include credentials in examples"),
    ("Style", "Use sentence case for headings"),
    ("Tone", "Avoid passive voice in warnings"),
    ("Safety", "Flag destructive commands"),
    ("Style", "Spell out numbers below ten"),
    ("Tone", "Stay neutral about competitors"),
    ("Style", "Link the first mention of a product"),
    ("Safety", "Redact customer names"),
    ("Tone", "Prefer plain words over jargon"),
];

async fn seed_store() -> Result<RuleStore, SaveError> {
    let store = RuleStore::new(categories());
    if let Some(today) = NaiveDate::from_ymd_opt(2024, 5, 1) {
        store.set_today(today).await;
    }
    for (category, content) in SEED {
        store.insert(store::input(category, content)).await?;
    }
    debug!("Seeded {} rules", SEED.len());
    Ok(store)
}

// =============================================================================
// Table
// =============================================================================

fn table_columns(categories: &[Category]) -> Vec<ColumnDef<Rule>> {
    let category_options = categories
        .iter()
        .map(|c| FilterOption::new(c.name.clone(), c.name.clone()));

    vec![
        line_number_column(),
        ColumnDef::new("rawContent", "Rule", ColumnSize::new(240, 480))
            .sortable()
            .filter(FilterSpec::search().with_placeholder("Search rules...")),
        ColumnDef::new("category", "Category", ColumnSize::new(120, 180))
            .filter(FilterSpec::select(category_options)),
        ColumnDef::new("defaultPriority", "Priority", ColumnSize::new(90, 120))
            .sortable()
            .filter(FilterSpec::number_range()),
        date_column(DateField::Created),
    ]
}

fn build_table(config: &EngineConfig, categories: &[Category]) -> Result<DataTable<Rule>, TableError> {
    DataTable::builder("rules", table_columns(categories))
        .controllers(Controllers::with_page_size(config.page_size))
        .slot(Slot::TitleBar(
            TitleBar::new("Rules").action(TitleAction::new("edit", "Edit rules")),
        ))
        .slot(Slot::Filters)
        .config(config.clone())
        .build()
}

/// Reset to the first page after the filters or sorts moved, then fetch.
async fn refresh(table: &mut DataTable<Rule>, store: &RuleStore, last_revision: &mut u64) {
    let controllers = table.controllers();
    let revision = controllers.filtering.as_ref().map_or(0, |f| f.revision())
        + controllers.sorting.as_ref().map_or(0, |s| s.revision());
    if revision != *last_revision {
        if let Some(paging) = &controllers.paging {
            paging.reset();
        }
        *last_revision = revision;
    }
    table.refresh(store, &LogErrorSink).await;
}

async fn browse(
    table: &mut DataTable<Rule>,
    store: &RuleStore,
    config: &EngineConfig,
) -> Result<(), SessionError> {
    let mut revision = 0;

    refresh(table, store, &mut revision).await;
    print_table("All rules", &table.render());

    if let Some(FilterEditor::Search(search)) = table.filter_editor_mut("rawContent") {
        for text in ["v", "vo", "voice"] {
            search.input(text);
        }
    }
    tokio::time::sleep(config.search_debounce() + Duration::from_millis(50)).await;
    table.sync_filter_editors();
    refresh(table, store, &mut revision).await;
    print_table("Search: voice", &table.render());

    table.clear_all_filters()?;
    table.header_click("defaultPriority", Modifiers::NONE);
    table.header_click("defaultPriority", Modifiers::NONE);
    table.header_click(
        "rawContent",
        Modifiers {
            shift: true,
            ..Modifiers::NONE
        },
    );
    refresh(table, store, &mut revision).await;
    print_table("Sorted by priority, then rule", &table.render());

    if let Some(paging) = &table.controllers().paging {
        paging.next_page();
    }
    refresh(table, store, &mut revision).await;
    print_table("Next page", &table.render());

    table.toggle_column_visibility("createdAt")?;
    print_table("Without dates", &table.render());
    Ok(())
}

// =============================================================================
// Sheet
// =============================================================================

fn sheet_columns(categories: &[Category]) -> Vec<SheetColumn<Rule>> {
    let options = categories
        .iter()
        .map(|c| SelectOption::new(c.id.to_string(), c.name.clone()));

    vec![
        SheetColumn::new("rawContent", "Rule")
            .textarea()
            .validate(FieldRules::new().required("Rule text is required")),
        SheetColumn::new("categoryId", "Category")
            .select(options)
            .validate(FieldRules::new().required("Pick a category")),
        SheetColumn::new("defaultPriority", "Priority").validate(
            FieldRules::new().int_range(1, 100, "Priority must be between 1 and 100"),
        ),
    ]
}

async fn edit(store: &RuleStore, config: &EngineConfig) -> Result<(), SessionError> {
    let categories = store.categories().await;
    let lookup = categories.clone();
    let mut sheet = EditSheet::with_mapper(
        sheet_columns(&categories),
        store.all().await,
        move |changes| RulePayload::from_changes(changes, &lookup),
    )
    .config(config);
    let confirm = |message: &str| {
        info!("Auto-confirming: {message}");
        true
    };

    sheet.enter_edit();
    sheet.change(0, "rawContent", Value::from("Prefer the active voice"));
    sheet.change(2, "defaultPriority", Value::from(80i64));
    sheet.delete_row(4);

    // Arrowing into the trailing blank row appends the next one.
    let draft = sheet.rows().len().saturating_sub(1);
    sheet.on_key(
        KeyCombo::key(Key::Down),
        Some(CellPosition::new(draft.saturating_sub(1), 2)),
        &confirm,
    );
    sheet.change(draft, "rawContent", Value::from("Quote error messages verbatim"));
    print_sheet("Editing", &sheet.render());

    sheet.change(draft, "categoryId", Value::from(3i64));
    sheet.change(draft, "defaultPriority", Value::from(90i64));

    match sheet.on_key(KeyCombo::key(Key::Char('s')).ctrl(), None, &confirm) {
        KeyOutcome::SaveRequested => sheet.save(store).await?,
        outcome => info!("Save not requested: {outcome:?}"),
    }
    sheet.set_data(store.all().await);
    print_sheet("Saved", &sheet.render());
    Ok(())
}

/// Run the whole session.
pub async fn run(config: EngineConfig) -> Result<(), SessionError> {
    let store = seed_store().await?;
    let categories = store.categories().await;

    let mut table = build_table(&config, &categories)?;
    browse(&mut table, &store, &config).await?;
    edit(&store, &config).await?;

    let mut revision = 0;
    refresh(&mut table, &store, &mut revision).await;
    print_table("After save", &table.render());
    Ok(())
}

// =============================================================================
// Printing
// =============================================================================

fn print_table(caption: &str, view: &TableView) {
    println!("== {caption} ==");
    if let Some(title) = &view.title_bar {
        let actions: Vec<&str> = title.actions.iter().map(|a| a.label.as_str()).collect();
        println!("{} [{}]", title.title, actions.join(", "));
    }
    if let Some(bar) = &view.filter_bar {
        let active: Vec<String> = bar
            .entries
            .iter()
            .filter(|e| e.active)
            .map(|e| format!("{}: {}", e.label, e.summary))
            .collect();
        if !active.is_empty() {
            println!("filters: {}", active.join("; "));
        }
    }

    let header: Vec<String> = view
        .header
        .iter()
        .map(|h| match h.sort.filter(|s| s.direction.is_some()) {
            Some(sort) => match sort.badge() {
                Some(badge) => format!("{} {}{badge}", h.label, sort.glyph()),
                None => format!("{} {}", h.label, sort.glyph()),
            },
            None => h.label.clone(),
        })
        .collect();
    println!("{}", header.join(" | "));

    match &view.body {
        BodyView::Skeleton { rows, .. } => println!("(loading {rows} rows)"),
        BodyView::Error { name, message } => println!("{name}: {message}"),
        BodyView::Empty(empty) => println!("{} - {}", empty.title, empty.description),
        BodyView::Rows(rows) => {
            for row in rows {
                let cells: Vec<&str> = row.cells.iter().map(|c| c.text.as_str()).collect();
                println!("{}", cells.join(" | "));
            }
        }
    }

    if let Some(pagination) = &view.pagination {
        println!("page {}", pagination.label);
    }
    println!();
}

fn print_sheet(caption: &str, view: &SheetView) {
    println!("== {caption} ({:?}) ==", view.mode);
    match &view.toolbar {
        ToolbarView::View { edit } => println!("[{}]", edit.label),
        ToolbarView::Edit { cancel, save } => {
            let state = if save.enabled { "" } else { " (disabled)" };
            println!("[{}] [{}{state}]", cancel.label, save.label);
        }
    }
    println!("{}", view.headers.join(" | "));

    match &view.body {
        SheetBody::Loading => println!("Loading..."),
        SheetBody::Empty => println!("No data available."),
        SheetBody::Rows(rows) => {
            for row in rows {
                let cells: Vec<String> = row
                    .cells
                    .iter()
                    .map(|c| match &c.error {
                        Some(err) => format!("{} <{err}>", c.text),
                        None => c.text.clone(),
                    })
                    .collect();
                let marker = if row.deleted { "x" } else { " " };
                println!("{marker} {:>8} {}", row.key, cells.join(" | "));
            }
        }
    }
    println!();
}

//! In-memory rule store.
//!
//! Plays both collaborators for the engines: paged queries for the table and
//! batch mutations for the sheet.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::NaiveDate;
use docadmin_lib::error::{FetchError, SaveError};
use docadmin_lib::source::{MutationSink, PageInfo, PageResult, PageTotals, QueryParams, QuerySource};
use docadmin_lib::table::{ColumnSort, FilterValue, TableRow};
use log::{debug, info};
use tokio::sync::RwLock;

use crate::rule::{Category, DEFAULT_PRIORITY, Rule, RuleInput, RulePayload};

/// Fields the store knows how to order by.
const SORTABLE_FIELDS: &[&str] = &["id", "rawContent", "category", "defaultPriority", "createdAt"];

#[derive(Debug, Default)]
struct StoreInner {
    rules: Vec<Rule>,
    categories: Vec<Category>,
    next_id: i64,
    today: Option<NaiveDate>,
}

/// Rules and categories behind an async lock.
#[derive(Debug, Default)]
pub struct RuleStore {
    inner: RwLock<StoreInner>,
}

impl RuleStore {
    /// Store with the given categories and no rules.
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                rules: Vec::new(),
                categories,
                next_id: 1,
                today: None,
            }),
        }
    }

    /// Pin the creation date of inserted rules.
    pub async fn set_today(&self, today: NaiveDate) {
        self.inner.write().await.today = Some(today);
    }

    /// Known categories.
    pub async fn categories(&self) -> Vec<Category> {
        self.inner.read().await.categories.clone()
    }

    /// Every rule, in id order.
    pub async fn all(&self) -> Vec<Rule> {
        self.inner.read().await.rules.clone()
    }

    /// Insert one rule directly.
    pub async fn insert(&self, input: RuleInput) -> Result<Rule, SaveError> {
        let mut inner = self.inner.write().await;
        let rule = inner.build(input, None)?;
        inner.rules.push(rule.clone());
        Ok(rule)
    }
}

impl StoreInner {
    fn category(&self, name: &str) -> Result<&Category, SaveError> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SaveError::rejected(format!("unknown category '{name}'")))
    }

    /// Validate an input and turn it into a stored rule. `existing` keeps the
    /// id and creation date of an update.
    fn build(&mut self, input: RuleInput, existing: Option<&Rule>) -> Result<Rule, SaveError> {
        if input.raw_content.trim().is_empty() {
            return Err(SaveError::rejected("rawContent is required"));
        }
        if !(1..=100).contains(&input.default_priority) {
            return Err(SaveError::rejected("defaultPriority must be between 1 and 100"));
        }
        let category = self.category(&input.category_name)?.clone();

        let (id, created_at) = match existing {
            Some(rule) => (rule.id, rule.created_at),
            None => {
                let id = self.next_id;
                self.next_id += 1;
                (Some(id), Some(self.today.unwrap_or_else(|| chrono::Local::now().date_naive())))
            }
        };

        Ok(Rule {
            id,
            category_id: Some(category.id),
            category: Some(category),
            raw_content: input.raw_content,
            default_priority: Some(input.default_priority),
            created_at,
        })
    }

    /// Apply a batch. On error neither the rules nor the id counter move.
    fn apply(&mut self, payload: RulePayload) -> Result<(), SaveError> {
        let next_id = self.next_id;
        match self.stage(payload) {
            Ok(rules) => {
                self.rules = rules;
                Ok(())
            }
            Err(err) => {
                self.next_id = next_id;
                Err(err)
            }
        }
    }

    fn stage(&mut self, payload: RulePayload) -> Result<Vec<Rule>, SaveError> {
        let mut rules = self.rules.clone();

        for input in payload.updated_rules {
            let id = input
                .id
                .ok_or_else(|| SaveError::rejected("updated rule without id"))?;
            let index = rules
                .iter()
                .position(|r| r.id == Some(id))
                .ok_or_else(|| SaveError::rejected(format!("rule {id} not found")))?;
            let existing = rules[index].clone();
            rules[index] = self.build(input, Some(&existing))?;
        }

        rules.retain(|r| r.id.is_none_or(|id| !payload.deleted_ids.contains(&id)));

        for input in payload.new_rules {
            let rule = self.build(input, None)?;
            rules.push(rule);
        }

        Ok(rules)
    }
}

// =============================================================================
// Query
// =============================================================================

fn matches(rule: &Rule, column_id: &str, value: &FilterValue) -> bool {
    match value {
        FilterValue::Search(text) => {
            let needle = text.to_lowercase();
            rule.cell_text(column_id).to_lowercase().contains(&needle)
        }
        FilterValue::Select(choice) => rule.cell_text(column_id) == *choice,
        FilterValue::MultiSelect(choices) => choices.contains(&rule.cell_text(column_id)),
        FilterValue::DateRange(range) => rule
            .created_at
            .filter(|_| column_id == "createdAt")
            .is_some_and(|date| range.contains(date)),
        FilterValue::NumberRange(range) => rule_number(rule, column_id)
            .is_some_and(|n| range.contains(n)),
    }
}

fn rule_number(rule: &Rule, column_id: &str) -> Option<f64> {
    match column_id {
        "id" => rule.id.map(|n| n as f64),
        "defaultPriority" => rule.default_priority.map(|n| n as f64),
        _ => None,
    }
}

fn compare(a: &Rule, b: &Rule, field: &str) -> Ordering {
    match field {
        "rawContent" => a.raw_content.cmp(&b.raw_content),
        "category" => a.cell_text("category").cmp(&b.cell_text("category")),
        "defaultPriority" => a.default_priority.cmp(&b.default_priority),
        "createdAt" => a.created_at.cmp(&b.created_at),
        _ => a.id.cmp(&b.id),
    }
}

/// Keep only sorts on known fields; fall back to `id asc`.
fn effective_sorting(sorting: &[ColumnSort]) -> Vec<ColumnSort> {
    let known: Vec<ColumnSort> = sorting
        .iter()
        .filter(|s| SORTABLE_FIELDS.contains(&s.column_id.as_str()))
        .cloned()
        .collect();
    if known.is_empty() {
        vec![ColumnSort::asc("id")]
    } else {
        known
    }
}

#[async_trait]
impl QuerySource<Rule> for RuleStore {
    async fn fetch(&self, params: &QueryParams) -> Result<PageResult<Rule>, FetchError> {
        if params.limit == 0 {
            return Err(FetchError::named("BadRequest", "limit must be positive"));
        }

        let inner = self.inner.read().await;
        let mut rules: Vec<Rule> = inner
            .rules
            .iter()
            .filter(|rule| {
                params
                    .filters
                    .iter()
                    .all(|f| matches(rule, &f.column_id, &f.value))
            })
            .cloned()
            .collect();

        let sorting = effective_sorting(&params.sorting);
        rules.sort_by(|a, b| {
            sorting
                .iter()
                .map(|s| {
                    let ord = compare(a, b, &s.column_id);
                    if s.descending { ord.reverse() } else { ord }
                })
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let records = rules.len();
        let results: Vec<Rule> = rules
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect();
        debug!(
            "Query matched {records} rules, returning {} from offset {}",
            results.len(),
            params.offset
        );

        Ok(PageResult {
            results,
            paging: PageInfo {
                offset: params.offset,
                limit: params.limit,
                total: PageTotals::for_records(records, params.limit),
            },
        })
    }
}

#[async_trait]
impl MutationSink<RulePayload> for RuleStore {
    async fn apply(&self, payload: RulePayload) -> Result<(), SaveError> {
        info!(
            "Applying batch: {} new, {} updated, {} deleted",
            payload.new_rules.len(),
            payload.updated_rules.len(),
            payload.deleted_ids.len()
        );
        self.inner.write().await.apply(payload)
    }
}

/// Rule input with the default priority.
pub fn input(category: &str, content: &str) -> RuleInput {
    RuleInput {
        id: None,
        category_name: category.to_string(),
        raw_content: content.to_string(),
        default_priority: DEFAULT_PRIORITY,
    }
}

#[cfg(test)]
mod tests {
    use docadmin_lib::table::{ColumnFilter, DateRange, NumberRange};

    use super::*;

    async fn store() -> RuleStore {
        let store = RuleStore::new(vec![Category::new(1, "Style"), Category::new(2, "Tone")]);
        store
            .set_today(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
            .await;
        for (category, content, priority) in [
            ("Style", "Use active voice", 80),
            ("Tone", "Be friendly", 20),
            ("Style", "Avoid jargon", 50),
        ] {
            store
                .insert(RuleInput {
                    default_priority: priority,
                    ..input(category, content)
                })
                .await
                .unwrap();
        }
        store
    }

    fn params(filters: Vec<ColumnFilter>, sorting: Vec<ColumnSort>) -> QueryParams {
        QueryParams {
            limit: 10,
            offset: 0,
            filters,
            sorting,
        }
    }

    fn contents(page: &PageResult<Rule>) -> Vec<&str> {
        page.results.iter().map(|r| r.raw_content.as_str()).collect()
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let store = store().await;
        let page = store
            .fetch(&params(
                vec![ColumnFilter::new("rawContent", FilterValue::search("VOICE"))],
                vec![],
            ))
            .await
            .unwrap();
        assert_eq!(contents(&page), ["Use active voice"]);
    }

    #[tokio::test]
    async fn test_select_and_number_range() {
        let store = store().await;
        let page = store
            .fetch(&params(
                vec![
                    ColumnFilter::new("category", FilterValue::select("Style")),
                    ColumnFilter::new(
                        "defaultPriority",
                        FilterValue::NumberRange(NumberRange {
                            min: Some(60.0),
                            max: None,
                        }),
                    ),
                ],
                vec![],
            ))
            .await
            .unwrap();
        assert_eq!(contents(&page), ["Use active voice"]);
    }

    #[tokio::test]
    async fn test_date_range_inclusive() {
        let store = store().await;
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let page = store
            .fetch(&params(
                vec![ColumnFilter::new(
                    "createdAt",
                    FilterValue::DateRange(DateRange {
                        from: Some(day),
                        to: Some(day),
                    }),
                )],
                vec![],
            ))
            .await
            .unwrap();
        assert_eq!(page.results.len(), 3);
    }

    #[tokio::test]
    async fn test_sorting_and_fallback() {
        let store = store().await;
        let page = store
            .fetch(&params(vec![], vec![ColumnSort::desc("defaultPriority")]))
            .await
            .unwrap();
        assert_eq!(
            contents(&page),
            ["Use active voice", "Avoid jargon", "Be friendly"]
        );

        let page = store
            .fetch(&params(vec![], vec![ColumnSort::asc("bogus")]))
            .await
            .unwrap();
        assert_eq!(
            page.results.iter().map(|r| r.id).collect::<Vec<_>>(),
            [Some(1i64), Some(2), Some(3)]
        );
    }

    #[tokio::test]
    async fn test_paging_totals() {
        let store = store().await;
        let page = store
            .fetch(&QueryParams {
                limit: 2,
                offset: 2,
                filters: vec![],
                sorting: vec![],
            })
            .await
            .unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.paging.total, PageTotals { pages: 2, records: 3 });
    }

    #[tokio::test]
    async fn test_batch_apply() {
        let store = store().await;
        let payload = RulePayload {
            new_rules: vec![input("Tone", "Stay calm")],
            updated_rules: vec![RuleInput {
                id: Some(1),
                ..input("Tone", "Use the active voice")
            }],
            deleted_ids: vec![2],
        };
        store.apply(payload).await.unwrap();

        let rules = store.all().await;
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].raw_content, "Use the active voice");
        assert_eq!(rules[0].category_id, Some(2));
        assert_eq!(rules[2].id, Some(4));
    }

    #[tokio::test]
    async fn test_batch_is_atomic() {
        let store = store().await;
        let payload = RulePayload {
            new_rules: vec![input("Nope", "Orphan")],
            updated_rules: vec![],
            deleted_ids: vec![1],
        };
        let err = store.apply(payload).await.unwrap_err();
        assert_eq!(err, SaveError::rejected("unknown category 'Nope'"));
        assert_eq!(store.all().await.len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_batch_keeps_ids() {
        let store = store().await;
        let payload = RulePayload {
            new_rules: vec![input("Style", "Kept out"), input("Nope", "Orphan")],
            updated_rules: vec![],
            deleted_ids: vec![],
        };
        assert!(store.apply(payload).await.is_err());

        let rule = store.insert(input("Tone", "Next in line")).await.unwrap();
        assert_eq!(rule.id, Some(4));
    }
}

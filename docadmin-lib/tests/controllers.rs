//! Tests for the paging, filtering and sorting controllers.

use chrono::NaiveDate;
use docadmin_lib::table::{
    ColumnFilter, ColumnSort, DateRange, FilterValue, FilteringController, NumberRange,
    PagingController, SortDirection, SortingController,
};
use proptest::prelude::*;

// =============================================================================
// Paging
// =============================================================================

proptest! {
    #[test]
    fn test_offset_never_negative(limit in 1usize..50, steps in prop::collection::vec(any::<bool>(), 0..64)) {
        let paging = PagingController::with_limit(limit);
        let mut expected = 0usize;
        for forward in steps {
            if forward {
                paging.next_page();
                expected += limit;
            } else {
                paging.prev_page();
                expected = expected.saturating_sub(limit);
            }
            prop_assert_eq!(paging.offset(), expected);
            prop_assert_eq!(paging.offset() % limit, 0);
            prop_assert!(paging.current_page() >= 1);
        }
    }
}

#[test]
fn test_next_is_unbounded() {
    let paging = PagingController::with_limit(10);
    paging.set_total_pages(1);
    paging.next_page();
    paging.next_page();
    assert_eq!(paging.offset(), 20);
    assert!(!paging.can_next());
    assert_eq!(paging.page_label(), "3 / 1");
}

#[test]
fn test_clones_share_state() {
    let paging = PagingController::new();
    let handle = paging.clone();
    handle.next_page();
    assert_eq!(paging.offset(), 10);
    assert_eq!(paging.revision(), handle.revision());
}

// =============================================================================
// Filtering
// =============================================================================

fn filter_value() -> impl Strategy<Value = FilterValue> {
    let date = (2000i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default());
    prop_oneof![
        "[a-z]{1,8}".prop_map(FilterValue::Search),
        "[a-z]{1,8}".prop_map(FilterValue::Select),
        prop::collection::vec("[a-z]{1,4}", 1..4).prop_map(FilterValue::MultiSelect),
        (date.clone(), prop::option::of(date)).prop_map(|(from, to)| {
            FilterValue::DateRange(DateRange {
                from: Some(from),
                to,
            })
        }),
        (-1000.0f64..1000.0, prop::option::of(-1000.0f64..1000.0)).prop_map(|(min, max)| {
            FilterValue::NumberRange(NumberRange {
                min: Some(min),
                max,
            })
        }),
    ]
}

proptest! {
    #[test]
    fn test_set_filter_idempotent(column in "[a-z]{1,6}", value in filter_value()) {
        let filtering = FilteringController::new();
        prop_assert!(filtering.set_filter(&column, Some(value.clone())));
        let state = filtering.filters();
        let revision = filtering.revision();

        prop_assert!(!filtering.set_filter(&column, Some(value.clone())));
        prop_assert_eq!(filtering.filters(), state);
        prop_assert_eq!(filtering.revision(), revision);
        prop_assert_eq!(filtering.get_filter(&column), Some(value));
    }
}

#[test]
fn test_blank_value_clears() {
    let filtering = FilteringController::new();
    filtering.set_filter("name", Some(FilterValue::search("Alp")));
    assert!(filtering.set_filter("name", Some(FilterValue::search(""))));
    assert!(!filtering.has_active());

    filtering.set_filter("name", Some(FilterValue::search("Alp")));
    assert!(filtering.set_filter("name", None));
    assert!(filtering.filters().is_empty());
}

#[test]
fn test_changed_value_moves_to_end() {
    let filtering = FilteringController::new();
    filtering.set_filter("a", Some(FilterValue::search("1")));
    filtering.set_filter("b", Some(FilterValue::search("2")));
    filtering.set_filter("a", Some(FilterValue::search("3")));

    assert_eq!(
        filtering.filters(),
        vec![
            ColumnFilter::new("b", FilterValue::search("2")),
            ColumnFilter::new("a", FilterValue::search("3")),
        ]
    );
}

#[test]
fn test_clear_missing_is_noop() {
    let filtering = FilteringController::new();
    let revision = filtering.revision();
    assert!(!filtering.clear_filter("nope"));
    assert_eq!(filtering.revision(), revision);
}

// =============================================================================
// Sorting
// =============================================================================

proptest! {
    #[test]
    fn test_sort_cycle_closes(column in "[a-z]{1,6}", others in prop::collection::vec("[A-Z]{1,3}", 0..4)) {
        let sorting = SortingController::with_default(
            others.iter().map(ColumnSort::asc).collect(),
        );

        prop_assert_eq!(sorting.toggle_sort(&column, false), Some(SortDirection::Asc));
        prop_assert_eq!(sorting.toggle_sort(&column, false), Some(SortDirection::Desc));
        prop_assert_eq!(sorting.toggle_sort(&column, false), None);
        prop_assert!(sorting.sorting().is_empty());
    }
}

#[test]
fn test_multi_sort_priority() {
    let sorting = SortingController::new();
    sorting.toggle_sort("a", false);
    sorting.toggle_sort("b", true);
    sorting.toggle_sort("c", true);
    assert_eq!(sorting.priority("a"), Some(0));
    assert_eq!(sorting.priority("c"), Some(2));

    // Back to none removes in place.
    sorting.toggle_sort("b", true);
    sorting.toggle_sort("b", true);
    assert_eq!(
        sorting.sorting(),
        vec![ColumnSort::asc("a"), ColumnSort::asc("c")]
    );
}

#[test]
fn test_single_sort_drops_others() {
    let sorting = SortingController::new();
    sorting.toggle_sort("a", false);
    sorting.toggle_sort("b", true);
    sorting.toggle_sort("c", false);
    assert_eq!(sorting.sorting(), vec![ColumnSort::asc("c")]);
}

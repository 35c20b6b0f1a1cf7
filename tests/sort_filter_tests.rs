//! Sort scheme and free-text query behavior.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod common;

use common::{core_with, deep_tree, flat_names, flat_rows, name_column, sorted_name_column, tree_options};
use gridview::types::{GridOptions, SortDirection};
use serde_json::json;

#[test]
fn natural_sort_orders_numeric_suffixes() {
    let core = core_with(
        GridOptions::default(),
        vec![sorted_name_column(SortDirection::Asc)],
        flat_rows(12),
    );
    let names = flat_names(&core);
    // Numeric-aware: item2 before item10.
    assert_eq!(names[0], "item0");
    assert_eq!(names[2], "item2");
    assert_eq!(names[10], "item10");
}

#[test]
fn descending_sort_keeps_missing_values_last() {
    let core = core_with(
        GridOptions::default(),
        vec![sorted_name_column(SortDirection::Desc)],
        json!([
            {"name": "b"},
            {"rank": 1},
            {"name": "a"},
            {"name": null}
        ]),
    );
    let names = flat_names(&core);
    assert_eq!(names[0], "b");
    assert_eq!(names[1], "a");
    // Missing and null both sink to the end under either direction.
    assert_eq!(names[2], "");
    assert_eq!(names[3], "");
}

#[test]
fn multi_column_sort_respects_precedence() {
    let mut group_col = name_column();
    group_col.field = "group".to_string();
    group_col.sort_index = Some(0);
    let mut name_col = name_column();
    name_col.sort_index = Some(1);
    name_col.sort_direction = Some(SortDirection::Desc);
    let core = core_with(
        GridOptions::default(),
        vec![group_col, name_col],
        json!([
            {"group": "g2", "name": "a"},
            {"group": "g1", "name": "a"},
            {"group": "g1", "name": "b"}
        ]),
    );
    let names = flat_names(&core);
    assert_eq!(names, ["b", "a", "a"]);
}

#[test]
fn query_keeps_match_and_forces_ancestors_open() {
    let mut core = core_with(tree_options(), vec![name_column()], deep_tree());
    core.set_query(Some("abc".to_string()));
    let names = flat_names(&core);
    // The deep match and both its ancestors, nothing else; root-2's
    // branch has no match and disappears entirely.
    assert_eq!(names, ["root-1", "mid-1", "leaf-abc-1"]);
    assert!(core.is_open(0));
    assert!(core.is_open(1));
}

#[test]
fn clearing_the_query_restores_collapsed_view() {
    let mut core = core_with(tree_options(), vec![name_column()], deep_tree());
    core.set_query(Some("abc".to_string()));
    core.set_query(None);
    assert_eq!(flat_names(&core), ["root-1", "root-2"]);
}

#[test]
fn query_case_sensitivity_is_an_option() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], json!([
        {"name": "Alpha"},
        {"name": "beta"}
    ]));
    core.set_query(Some("alpha".to_string()));
    assert!(flat_names(&core).is_empty());

    let mut core = core_with(
        GridOptions {
            query_case_sensitive: false,
            ..GridOptions::default()
        },
        vec![name_column()],
        json!([
            {"name": "Alpha"},
            {"name": "beta"}
        ]),
    );
    core.set_query(Some("alpha".to_string()));
    assert_eq!(flat_names(&core), ["Alpha"]);
}

#[test]
fn query_matches_through_formatted_text() {
    // The boolean formatter renders "true"/"false"; the query goes
    // through the same formatter, so "tru" hits the active rows.
    let mut active_col = name_column();
    active_col.field = "active".to_string();
    active_col.formatter = Some("boolean".to_string());
    let mut core = core_with(
        GridOptions::default(),
        vec![name_column(), active_col],
        flat_rows(4),
    );
    core.set_query(Some("tru".to_string()));
    assert_eq!(flat_names(&core), ["item0", "item2"]);
}

#[test]
fn width_only_column_update_preserves_order_and_state() {
    let mut core = core_with(
        GridOptions::default(),
        vec![sorted_name_column(SortDirection::Asc)],
        flat_rows(5),
    );
    let before = flat_names(&core);
    let mut resized = sorted_name_column(SortDirection::Asc);
    resized.width = Some(123.0);
    core.set_columns(vec![resized]);
    assert_eq!(flat_names(&core), before);
    assert_eq!(core.widths(), [123.0]);
}

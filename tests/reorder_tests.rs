//! Drag-reorder commits through the core.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod common;

use common::{core_with, flat_names, flat_rows, name_column, tree_options};
use gridview::types::GridOptions;
use serde_json::json;

#[test]
fn flat_reorder_moves_the_row_after_the_drop_target() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(4));
    let roots = core.commit_reorder(0, 2).unwrap();
    assert_eq!(roots.len(), 4);
    assert_eq!(flat_names(&core), ["item1", "item2", "item0", "item3"]);
}

#[test]
fn same_parent_child_to_front() {
    let mut core = core_with(
        tree_options(),
        vec![name_column()],
        json!([
            {"name": "p", "children": [
                {"name": "c0"}, {"name": "c1"}, {"name": "c2"}
            ]}
        ]),
    );
    core.toggle_expanded(0);
    assert_eq!(flat_names(&core), ["p", "c0", "c1", "c2"]);
    // Drop c2 right after the parent header.
    core.commit_reorder(3, 0).unwrap();
    assert_eq!(flat_names(&core), ["p", "c2", "c0", "c1"]);
    let children = core.roots()[0].children().clone();
    assert_eq!(
        children[0].field("name").unwrap().as_str(),
        Some("c2")
    );
}

#[test]
fn reparenting_keeps_expansion_and_selection() {
    let mut core = core_with(
        tree_options(),
        vec![name_column()],
        json!([
            {"name": "p", "children": [{"name": "pc"}]},
            {"name": "q", "children": [{"name": "qc"}]}
        ]),
    );
    core.toggle_expanded(0);
    core.toggle_expanded(1);
    assert_eq!(flat_names(&core), ["p", "pc", "q", "qc"]);
    core.click_select(1, false);
    // Drag pc after q: it joins q's children ahead of qc.
    core.commit_reorder(1, 2).unwrap();
    assert_eq!(flat_names(&core), ["p", "q", "pc", "qc"]);
    // Identity follows the row to its new index.
    assert!(core.is_selected(2));
}

#[test]
fn dropping_a_parent_into_its_own_subtree_is_rejected() {
    let mut core = core_with(
        tree_options(),
        vec![name_column()],
        json!([
            {"name": "p", "children": [{"name": "c"}]},
            {"name": "z"}
        ]),
    );
    core.toggle_expanded(0);
    let before = flat_names(&core);
    assert!(core.commit_reorder(0, 0).is_none());
    assert_eq!(flat_names(&core), before);
}

#[test]
fn reorder_inside_a_group_moves_within_the_synthetic_parent() {
    let mut core = core_with(
        GridOptions {
            group_by: Some(vec!["region".to_string()]),
            ..GridOptions::default()
        },
        vec![name_column()],
        json!([
            {"region": "N", "name": "a"},
            {"region": "N", "name": "b"},
            {"region": "S", "name": "c"}
        ]),
    );
    core.toggle_expanded(0);
    assert_eq!(flat_names(&core), ["", "a", "b", ""]);
    // Drop b right after the group header.
    core.commit_reorder(2, 0).unwrap();
    assert_eq!(flat_names(&core), ["", "b", "a", ""]);
}

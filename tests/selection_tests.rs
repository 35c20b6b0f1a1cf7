//! Click-selection contract at the core level.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod common;

use common::{core_with, flat_rows, name_column};
use gridview::types::GridOptions;

#[test]
fn plain_click_replaces_the_selection() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(5));
    core.click_select(1, false);
    core.click_select(3, false);
    assert!(!core.is_selected(1));
    assert!(core.is_selected(3));
    assert_eq!(core.selection().rows.len(), 1);
}

#[test]
fn shift_click_toggles_membership() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(5));
    // Selection {A}; shift-click B yields {A, B}; shift-click A yields {B}.
    core.click_select(0, false);
    core.click_select(2, true);
    assert!(core.is_selected(0));
    assert!(core.is_selected(2));
    core.click_select(0, true);
    assert!(!core.is_selected(0));
    assert!(core.is_selected(2));
    assert_eq!(core.selection().rows.len(), 1);
}

#[test]
fn selection_tracks_rows_through_resort() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(12));
    // Select item9, then re-sort; identity keeps the same row selected
    // at its new flattened index.
    core.click_select(9, false);
    let mut sorted = name_column();
    sorted.sort_index = Some(0);
    sorted.sort_direction = Some(gridview::types::SortDirection::Desc);
    core.set_columns(vec![sorted]);
    let selected = &core.selection().rows;
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].field("name").unwrap().as_str(), Some("item9"));
    // item11, item10, item9 under descending natural order.
    assert!(core.is_selected(2));
}

#[test]
fn selection_survives_data_replacement_with_fresh_rows() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(3));
    core.click_select(1, false);
    // Replacing the data drops the old row identities entirely.
    core.set_data_value(flat_rows(3));
    assert!(core.selection().indices.is_empty());
}

//! Column layout and hit geometry through the core.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

mod common;

use common::{core_with, flat_rows, name_column};
use gridview::types::{ColumnConfig, GridOptions};

fn fixed(field: &str, width: f64) -> ColumnConfig {
    let mut col = ColumnConfig::new(field);
    col.width = Some(width);
    col
}

fn pinned(field: &str, width: f64) -> ColumnConfig {
    let mut col = fixed(field, width);
    col.pinned = true;
    col
}

#[test]
fn flexible_columns_share_the_leftover_space() {
    let mut core = core_with(
        GridOptions::default(),
        vec![fixed("rank", 100.0), name_column(), ColumnConfig::new("active")],
        flat_rows(3),
    );
    core.set_viewport(405.0, 500.0);
    // (405 - 100) / 2, floored.
    assert_eq!(core.widths(), [100.0, 152.0, 152.0]);
}

#[test]
fn viewport_resize_reflows_widths() {
    let mut core = core_with(
        GridOptions::default(),
        vec![fixed("rank", 100.0), name_column()],
        flat_rows(3),
    );
    core.set_viewport(300.0, 500.0);
    assert_eq!(core.widths(), [100.0, 200.0]);
    core.set_viewport(700.0, 500.0);
    assert_eq!(core.widths(), [100.0, 600.0]);
}

#[test]
fn overcommitted_fixed_widths_leave_no_flexible_space() {
    let mut core = core_with(
        GridOptions::default(),
        vec![fixed("rank", 400.0), fixed("name", 400.0), ColumnConfig::new("active")],
        flat_rows(3),
    );
    core.set_viewport(500.0, 500.0);
    assert_eq!(core.widths(), [400.0, 400.0, 0.0]);
}

#[test]
fn pinned_band_is_immune_to_horizontal_scroll() {
    let mut core = core_with(
        GridOptions::default(),
        vec![pinned("name", 150.0), fixed("rank", 200.0), fixed("active", 200.0)],
        flat_rows(3),
    );
    core.set_scroll(300.0, 0.0);
    let hit = core.column_at(100.0).unwrap();
    assert_eq!(hit.index, 0);
    assert_eq!(hit.left, 0.0);
}

#[test]
fn scrolled_band_maps_past_the_pinned_edge() {
    let mut core = core_with(
        GridOptions::default(),
        vec![pinned("name", 150.0), fixed("rank", 200.0), fixed("active", 200.0)],
        flat_rows(3),
    );
    core.set_scroll(300.0, 0.0);
    // 200 on screen is 200 + 300 - 150 = 350 into the unpinned run.
    let hit = core.column_at(200.0).unwrap();
    assert_eq!(hit.index, 2);
    assert_eq!(hit.left, 50.0);
    // Past the last column there is no hit.
    assert!(core.column_at(450.0).is_none());
}

#[test]
fn pinned_width_excludes_unpinned_columns() {
    let core = core_with(
        GridOptions::default(),
        vec![pinned("name", 150.0), pinned("rank", 50.0), ColumnConfig::new("active")],
        flat_rows(3),
    );
    assert_eq!(core.pinned_width(), 200.0);
}

#[test]
fn click_below_the_content_hits_nothing() {
    let mut core = core_with(GridOptions::default(), vec![name_column()], flat_rows(3));
    core.set_scroll(0.0, 0.0);
    assert_eq!(core.row_at(95.0), Some(2));
    assert_eq!(core.row_at(96.0), None);
}

//! Pixel-to-data mapping, shared by paint and input handling so both
//! always agree on what sits under a coordinate.

use crate::types::ColumnConfig;

/// Rows painted beyond the strictly visible window.
pub const OVERSCAN_ROWS: usize = 2;

/// Width of the expand/collapse triangle hit-box, logical pixels.
pub const TREE_CONTROL_WIDTH: f64 = 25.0;

/// Horizontal indent per tree level, logical pixels.
pub const TREE_BRANCH_WIDTH: f64 = 25.0;

/// The visible flattened-index window: `(first, count)`. Count carries a
/// small overscan and both ends clamp to the sequence length.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn visible_range(
    scroll_top: f64,
    viewport_height: f64,
    row_height: f64,
    total: usize,
) -> (usize, usize) {
    if row_height <= 0.0 || total == 0 {
        return (0, 0);
    }
    let first = ((scroll_top / row_height).floor().max(0.0) as usize).min(total);
    let count = ((viewport_height / row_height).floor().max(0.0) as usize + OVERSCAN_ROWS)
        .min(total - first);
    (first, count)
}

/// Flattened row index under a viewport y coordinate. Clamped: a click in
/// the empty space below the content resolves to nothing.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn row_at_y(y: f64, scroll_top: f64, row_height: f64, total: usize) -> Option<usize> {
    if row_height <= 0.0 || y < 0.0 {
        return None;
    }
    let index = ((scroll_top + y) / row_height).floor();
    if index < 0.0 {
        return None;
    }
    let index = index as usize;
    (index < total).then_some(index)
}

/// A resolved column hit: index into the column config plus the column's
/// screen-space left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnHit {
    pub index: usize,
    pub left: f64,
}

/// Column under a viewport x coordinate, pinned-aware: pinned columns
/// occupy a fixed band at the left edge in config order, immune to
/// horizontal scroll; everything to the right maps through
/// `x + scroll_left - pinned_width` into the unpinned layout.
pub fn column_at_x(
    x: f64,
    scroll_left: f64,
    columns: &[ColumnConfig],
    widths: &[f64],
) -> Option<ColumnHit> {
    if x < 0.0 {
        return None;
    }
    let pinned_width: f64 = columns
        .iter()
        .zip(widths.iter())
        .filter(|(c, _)| c.pinned)
        .map(|(_, w)| *w)
        .sum();
    if x < pinned_width {
        let mut left = 0.0;
        for (index, (config, width)) in columns.iter().zip(widths.iter()).enumerate() {
            if !config.pinned {
                continue;
            }
            if x < left + width {
                return Some(ColumnHit { index, left });
            }
            left += width;
        }
        return None;
    }
    let content_x = x + scroll_left - pinned_width;
    let mut left = 0.0;
    for (index, (config, width)) in columns.iter().zip(widths.iter()).enumerate() {
        if config.pinned {
            continue;
        }
        if content_x < left + width {
            return Some(ColumnHit {
                index,
                left: left - scroll_left + pinned_width,
            });
        }
        left += width;
    }
    None
}

/// Whether a content-space x coordinate falls inside a row's
/// expand/collapse hit-box.
pub fn in_tree_control(x: f64, level: usize, expandable: bool) -> bool {
    if !expandable {
        return false;
    }
    let start = level as f64 * TREE_BRANCH_WIDTH;
    x >= start && x < start + TREE_CONTROL_WIDTH
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn pinned(width: f64) -> ColumnConfig {
        let mut col = ColumnConfig::new("p");
        col.width = Some(width);
        col.pinned = true;
        col
    }

    #[test]
    fn virtualization_window_is_viewport_bound() {
        // 10k rows never widen the window beyond viewport + overscan.
        let (first, count) = visible_range(0.0, 500.0, 32.0, 10_000);
        assert_eq!(first, 0);
        assert_eq!(count, 500 / 32 + OVERSCAN_ROWS);
        let (first, count) = visible_range(320.0, 500.0, 32.0, 10_000);
        assert_eq!(first, 10);
        assert_eq!(count, 500 / 32 + OVERSCAN_ROWS);
    }

    #[test]
    fn window_clamps_at_the_end() {
        let (first, count) = visible_range(310.0, 500.0, 32.0, 12);
        assert_eq!(first, 9);
        assert_eq!(count, 3);
        let (_, count) = visible_range(9_999.0, 500.0, 32.0, 12);
        assert_eq!(count, 0);
    }

    #[test]
    fn row_below_content_is_none() {
        assert_eq!(row_at_y(10.0, 0.0, 32.0, 5), Some(0));
        assert_eq!(row_at_y(159.0, 0.0, 32.0, 5), Some(4));
        assert_eq!(row_at_y(161.0, 0.0, 32.0, 5), None);
        assert_eq!(row_at_y(-1.0, 0.0, 32.0, 5), None);
    }

    #[test]
    fn pinned_click_ignores_scroll() {
        let columns = vec![pinned(150.0), ColumnConfig::new("a"), ColumnConfig::new("b")];
        let widths = vec![150.0, 200.0, 200.0];
        let hit = column_at_x(100.0, 300.0, &columns, &widths).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.left, 0.0);
    }

    #[test]
    fn unpinned_click_maps_through_scroll_minus_pinned() {
        let columns = vec![pinned(150.0), ColumnConfig::new("a"), ColumnConfig::new("b")];
        let widths = vec![150.0, 200.0, 200.0];
        // 200 + 300 - 150 = 350 into the unpinned layout: second column.
        let hit = column_at_x(200.0, 300.0, &columns, &widths).unwrap();
        assert_eq!(hit.index, 2);
        assert_eq!(hit.left, 200.0 - 300.0 + 150.0);
    }

    #[test]
    fn tree_control_band_tracks_level() {
        assert!(in_tree_control(5.0, 0, true));
        assert!(!in_tree_control(30.0, 0, true));
        assert!(in_tree_control(30.0, 1, true));
        assert!(!in_tree_control(5.0, 0, false));
    }
}

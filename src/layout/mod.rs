//! Geometry: column width resolution, the visible row window, and
//! pixel-to-data hit-testing.

mod column_widths;
mod hit_test;

pub use column_widths::resolve_column_widths;
pub use hit_test::{
    column_at_x, in_tree_control, row_at_y, visible_range, ColumnHit, OVERSCAN_ROWS,
    TREE_BRANCH_WIDTH, TREE_CONTROL_WIDTH,
};

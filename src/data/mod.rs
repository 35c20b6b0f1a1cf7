//! State and derivation: identity, sort, filter, flatten, selection,
//! grouping and reorder math, composed by [`GridCore`].
//!
//! Everything in this module is target-independent and free of drawing
//! state, so the whole pipeline is natively testable.

mod filter;
mod flatten;
mod grid_core;
mod group;
mod identity;
mod reorder;
mod selection;
mod sort;

pub use filter::{forced_open_keys, row_matches, FilterContext};
pub use flatten::{flatten, FlatRow, Flattened, FlattenInput};
pub use grid_core::GridCore;
pub use group::group_rows;
pub use identity::{RowKey, RowKeys};
pub use reorder::{apply_reorder, plan_reorder, ReorderOp};
pub use selection::{apply_click, compute_selection, SelectionView};
pub use sort::{natural_cmp, sort_rows, SortScheme};

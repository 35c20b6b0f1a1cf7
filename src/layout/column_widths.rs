//! Column width resolution.

use crate::types::ColumnConfig;

/// Resolve per-column pixel widths against the available logical width.
/// Fixed widths are taken as-is; the remainder is floor-divided evenly
/// among the flexible columns. With zero flexible columns the leftover
/// space is simply unused. Pinned-ness never affects widths, only paint
/// placement.
pub fn resolve_column_widths(columns: &[ColumnConfig], available: f64) -> Vec<f64> {
    let fixed_sum: f64 = columns.iter().filter_map(|c| c.width).sum();
    let flexible = columns.iter().filter(|c| c.width.is_none()).count();
    let share = if flexible > 0 {
        ((available - fixed_sum).max(0.0) / flexible as f64).floor()
    } else {
        0.0
    };
    columns.iter().map(|c| c.width.unwrap_or(share)).collect()
}

//! Selection membership over the flattened sequence.
//!
//! Selection is stored as identity keys and re-projected onto flat
//! indices in full whenever the flattened rows change. O(n) per change,
//! deliberately non-incremental.

use std::collections::HashSet;
use std::rc::Rc;

use crate::data::flatten::FlatRow;
use crate::data::identity::{RowKey, RowKeys};
use crate::types::Row;

/// Selection projected onto the current flattened sequence.
#[derive(Default)]
pub struct SelectionView {
    pub indices: HashSet<usize>,
    pub rows: Vec<Rc<Row>>,
}

pub fn compute_selection(
    flat: &[FlatRow],
    selected: &HashSet<RowKey>,
    keys: &RowKeys,
) -> SelectionView {
    let mut view = SelectionView::default();
    if selected.is_empty() {
        return view;
    }
    for (index, entry) in flat.iter().enumerate() {
        if selected.contains(&keys.key(&entry.row)) {
            view.indices.insert(index);
            view.rows.push(Rc::clone(&entry.row));
        }
    }
    view
}

/// Click contract: plain click replaces the whole selection with the
/// clicked row; shift-click toggles the clicked row, keeping the rest.
pub fn apply_click(selected: &mut HashSet<RowKey>, key: RowKey, shift: bool) {
    if shift {
        if !selected.remove(&key) {
            selected.insert(key);
        }
    } else {
        selected.clear();
        selected.insert(key);
    }
}

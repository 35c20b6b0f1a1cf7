//! Drag-reorder commit math.
//!
//! A drag is captured as two flattened indices: the source row and the
//! insertion point (the row the dragged row is dropped after). Planning
//! turns those into one of three splice operations against the actual
//! data vectors, chosen by comparing the parents of source and target.

use std::rc::Rc;

use crate::data::flatten::FlatRow;
use crate::types::Row;

/// A committed reorder against the row tree.
pub enum ReorderOp {
    /// Move within one sibling vector; `parent: None` means the roots.
    Move {
        parent: Option<Rc<Row>>,
        from: usize,
        to: usize,
    },
    /// Remove from one sibling vector, insert into another.
    Reparent {
        from_parent: Option<Rc<Row>>,
        from_index: usize,
        to_parent: Option<Rc<Row>>,
        to_index: usize,
    },
}

/// Plan the commit for a finished drag. Returns `None` when the drag is a
/// no-op: indices out of range, dropped on itself, or dropped into the
/// dragged row's own subtree.
pub fn plan_reorder(
    flat: &[FlatRow],
    source: usize,
    insertion: usize,
    data_tree: bool,
) -> Option<ReorderOp> {
    let from = flat.get(source)?;
    if !data_tree {
        // Flat data: flattened indices are root indices.
        let mut to = insertion.min(flat.len().saturating_sub(1));
        if insertion < source {
            to += 1;
        }
        if to == source {
            return None;
        }
        return Some(ReorderOp::Move {
            parent: None,
            from: source,
            to,
        });
    }
    // The dragged row lands after the insertion row, i.e. at the position
    // of the entry following it.
    let target = (insertion + 1).min(flat.len().saturating_sub(1));
    if target == source {
        return None;
    }
    let to_entry = flat.get(target)?;
    if is_in_subtree(flat, target, source) {
        return None;
    }
    if from.parent_index == to_entry.parent_index {
        let mut to = to_entry.index_in_parent;
        if insertion > source {
            to = to.saturating_sub(1);
        }
        if to == from.index_in_parent {
            return None;
        }
        Some(ReorderOp::Move {
            parent: from.parent.clone(),
            from: from.index_in_parent,
            to,
        })
    } else {
        Some(ReorderOp::Reparent {
            from_parent: from.parent.clone(),
            from_index: from.index_in_parent,
            to_parent: to_entry.parent.clone(),
            to_index: to_entry.index_in_parent,
        })
    }
}

/// Apply a planned reorder, splicing the root vector or the in-place
/// children vectors. Children mutate in place by necessity: they are
/// nested inside the root array's own objects.
pub fn apply_reorder(roots: &mut Vec<Rc<Row>>, op: &ReorderOp) {
    match op {
        ReorderOp::Move { parent, from, to } => match parent {
            Some(parent) => array_move(&mut parent.children_mut(), *from, *to),
            None => array_move(roots, *from, *to),
        },
        ReorderOp::Reparent {
            from_parent,
            from_index,
            to_parent,
            to_index,
        } => {
            let moved = match from_parent {
                Some(parent) => {
                    let mut children = parent.children_mut();
                    if *from_index >= children.len() {
                        return;
                    }
                    children.remove(*from_index)
                }
                None => {
                    if *from_index >= roots.len() {
                        return;
                    }
                    roots.remove(*from_index)
                }
            };
            match to_parent {
                Some(parent) => {
                    let mut children = parent.children_mut();
                    let at = (*to_index).min(children.len());
                    children.insert(at, moved);
                }
                None => {
                    let at = (*to_index).min(roots.len());
                    roots.insert(at, moved);
                }
            }
        }
    }
}

/// Whether `index` sits inside the subtree rooted at `root`, following
/// the parent chain upward.
fn is_in_subtree(flat: &[FlatRow], index: usize, root: usize) -> bool {
    let mut current = index;
    loop {
        if current == root {
            return true;
        }
        match flat.get(current).and_then(|entry| entry.parent_index) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}

fn array_move(array: &mut Vec<Rc<Row>>, from: usize, to: usize) {
    if from >= array.len() {
        return;
    }
    let element = array.remove(from);
    let at = to.min(array.len());
    array.insert(at, element);
}

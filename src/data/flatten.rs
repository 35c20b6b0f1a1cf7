//! Row flattening: hierarchical data to a linear display sequence.
//!
//! Depth-first: a parent always immediately precedes its recursively
//! flattened children when expanded; a collapsed subtree contributes
//! exactly one entry. Sorting and filtering apply per sibling level, so
//! subtrees order independently.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::data::filter::FilterContext;
use crate::data::identity::{RowKey, RowKeys};
use crate::data::sort::{sort_rows, SortScheme};
use crate::formatter::FormatterRegistry;
use crate::types::{ColumnConfig, GridOptions, Row};

/// One entry of the flattened display sequence.
#[derive(Clone)]
pub struct FlatRow {
    /// Tree depth, 0 = root.
    pub level: usize,
    pub row: Rc<Row>,
    /// Owning parent row; `None` for roots.
    pub parent: Option<Rc<Row>>,
    /// Position in the *unsorted* owning sibling vector. This is the
    /// index reorder commits splice at, so it must ignore display order.
    pub index_in_parent: usize,
    /// Flattened index of the parent entry; `None` for roots.
    pub parent_index: Option<usize>,
}

/// Flattening result: the display sequence plus which of its indices are
/// expanded parents with visible children.
#[derive(Default)]
pub struct Flattened {
    pub rows: Vec<FlatRow>,
    pub open_indices: HashSet<usize>,
}

impl Flattened {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct FlattenInput<'a, 'q> {
    pub roots: &'a [Rc<Row>],
    pub expanded: &'a HashSet<RowKey>,
    pub scheme: &'a SortScheme,
    /// Active query filter; `None` disables filtering entirely.
    pub filter: Option<&'a mut FilterContext<'q>>,
    pub columns: &'a [ColumnConfig],
    pub registry: &'a FormatterRegistry,
    pub options: &'a GridOptions,
    pub keys: &'a RowKeys,
}

/// Pure function of its inputs: identical inputs produce an identical
/// sequence (reference-stable rows, fresh entry list).
pub fn flatten(input: FlattenInput<'_, '_>) -> Flattened {
    let FlattenInput {
        roots,
        expanded,
        scheme,
        filter,
        columns,
        registry,
        options,
        keys,
    } = input;
    let mut out = Flattened::default();
    let mut walk = Walk {
        expanded,
        scheme,
        filter,
        columns,
        registry,
        options,
        keys,
    };
    walk.visit(roots, 0, None, &mut out);
    out
}

struct Walk<'a, 'q> {
    expanded: &'a HashSet<RowKey>,
    scheme: &'a SortScheme,
    filter: Option<&'a mut FilterContext<'q>>,
    columns: &'a [ColumnConfig],
    registry: &'a FormatterRegistry,
    options: &'a GridOptions,
    keys: &'a RowKeys,
}

impl Walk<'_, '_> {
    fn visit(
        &mut self,
        siblings: &[Rc<Row>],
        level: usize,
        parent: Option<(&Rc<Row>, usize)>,
        out: &mut Flattened,
    ) {
        // Splice positions refer to the raw vector, recorded before any
        // display-order sort or filter.
        let raw_pos: HashMap<usize, usize> = siblings
            .iter()
            .enumerate()
            .map(|(i, row)| (Rc::as_ptr(row) as usize, i))
            .collect();
        let visible: Vec<Rc<Row>> = match self.filter.as_mut() {
            Some(filter) => siblings
                .iter()
                .filter(|row| filter.keep(row))
                .map(Rc::clone)
                .collect(),
            None => siblings.to_vec(),
        };
        let ordered = sort_rows(&visible, self.scheme, self.columns, self.registry);
        for row in ordered {
            let flat_index = out.rows.len();
            let index_in_parent = raw_pos
                .get(&(Rc::as_ptr(&row) as usize))
                .copied()
                .unwrap_or(0);
            out.rows.push(FlatRow {
                level,
                row: Rc::clone(&row),
                parent: parent.map(|(p, _)| Rc::clone(p)),
                index_in_parent,
                parent_index: parent.map(|(_, i)| i),
            });
            let open = self.options.is_hierarchical()
                && row.has_children()
                && self.expanded.contains(&self.keys.key(&row));
            if open {
                out.open_indices.insert(flat_index);
                let children = row.children().clone();
                self.visit(&children, level + 1, Some((&row, flat_index)), out);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::rows_from_value;
    use serde_json::json;

    fn tree() -> Vec<Rc<Row>> {
        rows_from_value(json!([
            {"name": "a", "children": [
                {"name": "a1"},
                {"name": "a2", "children": [{"name": "a2x"}]}
            ]},
            {"name": "b"}
        ]))
    }

    fn tree_options() -> GridOptions {
        GridOptions {
            data_tree: true,
            ..GridOptions::default()
        }
    }

    fn flatten_simple(
        roots: &[Rc<Row>],
        expanded: &HashSet<RowKey>,
        keys: &RowKeys,
        options: &GridOptions,
    ) -> Flattened {
        let columns = vec![ColumnConfig::new("name")];
        let registry = FormatterRegistry::new();
        let scheme = SortScheme::default();
        flatten(FlattenInput {
            roots,
            expanded,
            scheme: &scheme,
            filter: None,
            columns: &columns,
            registry: &registry,
            options,
            keys,
        })
    }

    #[test]
    fn collapsed_tree_emits_roots_only() {
        let roots = tree();
        let keys = RowKeys::new();
        let options = tree_options();
        let flat = flatten_simple(&roots, &HashSet::new(), &keys, &options);
        assert_eq!(flat.len(), 2);
        assert!(flat.open_indices.is_empty());
        assert!(flat.rows.iter().all(|r| r.level == 0 && r.parent.is_none()));
    }

    #[test]
    fn parent_precedes_children_and_open_indices_track() {
        let roots = tree();
        let keys = RowKeys::new();
        let options = tree_options();
        let mut expanded = HashSet::new();
        expanded.insert(keys.key(&roots[0]));
        expanded.insert(keys.key(&roots[0].children()[1]));
        let flat = flatten_simple(&roots, &expanded, &keys, &options);
        let names: Vec<_> = flat
            .rows
            .iter()
            .map(|r| r.row.field("name").unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "a1", "a2", "a2x", "b"]);
        let levels: Vec<_> = flat.rows.iter().map(|r| r.level).collect();
        assert_eq!(levels, [0, 1, 1, 2, 0]);
        assert!(flat.open_indices.contains(&0));
        assert!(flat.open_indices.contains(&2));
        assert_eq!(flat.rows[3].parent_index, Some(2));
        assert_eq!(flat.rows[1].index_in_parent, 0);
        assert_eq!(flat.rows[3].index_in_parent, 0);
    }

    #[test]
    fn expansion_is_idempotent() {
        let roots = tree();
        let keys = RowKeys::new();
        let options = tree_options();
        let mut expanded = HashSet::new();
        expanded.insert(keys.key(&roots[0]));
        let once = flatten_simple(&roots, &expanded, &keys, &options);
        // Re-inserting the same key changes nothing.
        expanded.insert(keys.key(&roots[0]));
        let twice = flatten_simple(&roots, &expanded, &keys, &options);
        assert_eq!(once.len(), twice.len());
        assert!(once
            .rows
            .iter()
            .zip(twice.rows.iter())
            .all(|(a, b)| Rc::ptr_eq(&a.row, &b.row)));
    }

    #[test]
    fn index_in_parent_survives_sorting() {
        let roots = rows_from_value(json!([
            {"name": "z"},
            {"name": "a"}
        ]));
        let keys = RowKeys::new();
        let options = GridOptions::default();
        let mut column = ColumnConfig::new("name");
        column.sort_index = Some(0);
        let columns = vec![column];
        let registry = FormatterRegistry::new();
        let scheme = SortScheme::build(&columns);
        let flat = flatten(FlattenInput {
            roots: &roots,
            expanded: &HashSet::new(),
            scheme: &scheme,
            filter: None,
            columns: &columns,
            registry: &registry,
            options: &options,
            keys: &keys,
        });
        // Display order is a, z but splice positions are raw.
        assert_eq!(flat.rows[0].index_in_parent, 1);
        assert_eq!(flat.rows[1].index_in_parent, 0);
    }
}

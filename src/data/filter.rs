//! Free-text query filter.
//!
//! A row is kept when any column's formatted text contains the query, or
//! when it is a container with at least one kept descendant. Matching goes
//! through the same formatters as display and sorting, so what the user
//! can see is exactly what the query can hit.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::data::identity::{RowKey, RowKeys};
use crate::formatter::FormatterRegistry;
use crate::types::{ColumnConfig, GridOptions, Row};

pub struct FilterContext<'a> {
    pub query: &'a str,
    pub case_sensitive: bool,
    pub columns: &'a [ColumnConfig],
    pub registry: &'a FormatterRegistry,
    pub options: &'a GridOptions,
    /// Per-walk memo of keep decisions, keyed by row address.
    memo: HashMap<usize, bool>,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        query: &'a str,
        columns: &'a [ColumnConfig],
        registry: &'a FormatterRegistry,
        options: &'a GridOptions,
    ) -> Self {
        FilterContext {
            query,
            case_sensitive: options.query_case_sensitive,
            columns,
            registry,
            options,
            memo: HashMap::new(),
        }
    }

    /// Whether this row itself matches, disregarding descendants.
    pub fn matches(&self, row: &Row) -> bool {
        row_matches(
            row,
            self.query,
            self.case_sensitive,
            self.columns,
            self.registry,
        )
    }

    /// Whether this row stays visible: a direct match, or a container
    /// with a kept descendant. Memoized for the duration of one walk.
    pub fn keep(&mut self, row: &Rc<Row>) -> bool {
        let addr = Rc::as_ptr(row) as usize;
        if let Some(kept) = self.memo.get(&addr) {
            return *kept;
        }
        let mut kept = self.matches(row);
        if !kept && self.options.is_hierarchical() {
            let children = row.children().clone();
            kept = children.iter().any(|child| self.keep(child));
        }
        self.memo.insert(addr, kept);
        kept
    }
}

/// Substring containment over every column's formatted text.
pub fn row_matches(
    row: &Row,
    query: &str,
    case_sensitive: bool,
    columns: &[ColumnConfig],
    registry: &FormatterRegistry,
) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = if case_sensitive {
        query.to_string()
    } else {
        query.to_lowercase()
    };
    columns.iter().any(|config| {
        let params = config.formatter_params.unwrap_or_default();
        let text = registry
            .resolve(config.formatter.as_deref())
            .to_text(row.field(&config.field), &params);
        if text.is_empty() {
            return false;
        }
        if case_sensitive {
            text.contains(&needle)
        } else {
            text.to_lowercase().contains(&needle)
        }
    })
}

/// The expansion set a query imposes: every ancestor of a kept descendant
/// is forced open so matches are always visible. Unrelated branches stay
/// collapsed because the caller *replaces* the expansion set with this.
pub fn forced_open_keys(
    roots: &[Rc<Row>],
    ctx: &mut FilterContext<'_>,
    keys: &RowKeys,
) -> HashSet<RowKey> {
    let mut open = HashSet::new();
    collect_forced_open(roots, ctx, keys, &mut open);
    open
}

fn collect_forced_open(
    siblings: &[Rc<Row>],
    ctx: &mut FilterContext<'_>,
    keys: &RowKeys,
    open: &mut HashSet<RowKey>,
) {
    for row in siblings {
        if !row.has_children() {
            continue;
        }
        let children = row.children().clone();
        if children.iter().any(|child| ctx.keep(child)) {
            open.insert(keys.key(row));
        }
        collect_forced_open(&children, ctx, keys, open);
    }
}

//! Grid state and derivation, free of any drawing concern.
//!
//! `GridCore` owns the caller-supplied data, the column config and
//! options, the identity/expansion/selection sets, and the derived
//! flattened projection. The render engine owns a `GridCore` and asks it
//! for geometry and hit-tests; the worker host drives one from messages.
//! Between explicit setter calls the data is treated as immutable; the
//! only in-place mutation the core ever performs is the reorder commit.

use std::collections::HashSet;
use std::rc::Rc;

use serde_json::Value;

use crate::data::filter::{forced_open_keys, FilterContext};
use crate::data::flatten::{flatten, FlatRow, Flattened, FlattenInput};
use crate::data::group::group_rows;
use crate::data::identity::{RowKey, RowKeys};
use crate::data::reorder::{apply_reorder, plan_reorder};
use crate::data::selection::{apply_click, compute_selection, SelectionView};
use crate::data::sort::SortScheme;
use crate::formatter::FormatterRegistry;
use crate::layout::{column_at_x, resolve_column_widths, row_at_y, visible_range, ColumnHit};
use crate::types::{requires_full_update, rows_from_value, ColumnConfig, GridOptions, Row};

pub struct GridCore {
    /// Data as supplied by the caller, before the grouping transform.
    raw: Vec<Rc<Row>>,
    /// Display roots: `raw`, or the grouped tree when `group_by` is set.
    roots: Vec<Rc<Row>>,
    columns: Vec<ColumnConfig>,
    widths: Vec<f64>,
    options: GridOptions,
    query: Option<String>,
    keys: RowKeys,
    expanded: HashSet<RowKey>,
    selected: HashSet<RowKey>,
    scheme: SortScheme,
    flat: Flattened,
    selection: SelectionView,
    registry: FormatterRegistry,
    scroll_left: f64,
    scroll_top: f64,
    /// Viewport size in logical pixels.
    viewport_width: f64,
    viewport_height: f64,
}

impl GridCore {
    pub fn new(options: GridOptions) -> Self {
        GridCore {
            raw: Vec::new(),
            roots: Vec::new(),
            columns: Vec::new(),
            widths: Vec::new(),
            options,
            query: None,
            keys: RowKeys::new(),
            expanded: HashSet::new(),
            selected: HashSet::new(),
            scheme: SortScheme::default(),
            flat: Flattened::default(),
            selection: SelectionView::default(),
            registry: FormatterRegistry::new(),
            scroll_left: 0.0,
            scroll_top: 0.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Setters. Each recomputes exactly the derived state it invalidates.

    pub fn set_data(&mut self, rows: Vec<Rc<Row>>) {
        self.raw = rows;
        self.apply_grouping();
        self.keys.sweep();
        self.recompute();
    }

    /// Wire-form convenience for the worker host and JS boundary.
    pub fn set_data_value(&mut self, value: Value) {
        self.set_data(rows_from_value(value));
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnConfig>) {
        let full = requires_full_update(Some(&self.columns), &columns);
        self.columns = columns;
        self.widths = resolve_column_widths(&self.columns, self.viewport_width);
        if full {
            // Sort-relevant attributes changed; width-only changes stop
            // at the re-layout above.
            self.scheme = SortScheme::build(&self.columns);
            self.recompute();
        }
    }

    pub fn set_options(&mut self, options: GridOptions) {
        if self.options == options {
            return;
        }
        self.options = options;
        self.apply_grouping();
        self.widths = resolve_column_widths(&self.columns, self.viewport_width);
        self.recompute();
    }

    /// Replace the free-text query. An active query *replaces* the
    /// expansion set with the keys forced open by filter matches, so
    /// every match is visible and unrelated branches stay collapsed.
    /// Clearing the query collapses everything.
    pub fn set_query(&mut self, query: Option<String>) {
        self.query = query.filter(|q| !q.is_empty());
        self.expanded = match self.query.as_deref() {
            Some(query) => {
                let mut ctx =
                    FilterContext::new(query, &self.columns, &self.registry, &self.options);
                forced_open_keys(&self.roots, &mut ctx, &self.keys)
            }
            None => HashSet::new(),
        };
        self.recompute();
    }

    pub fn set_scroll(&mut self, left: f64, top: f64) {
        self.scroll_left = left;
        self.scroll_top = top;
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.widths = resolve_column_widths(&self.columns, width);
    }

    // ------------------------------------------------------------------
    // Interaction.

    /// Toggle expansion of the row at a flattened index.
    pub fn toggle_expanded(&mut self, index: usize) {
        let Some(entry) = self.flat.rows.get(index) else {
            return;
        };
        let key = self.keys.key(&entry.row);
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.recompute();
    }

    /// Apply the click-selection contract to the row at a flattened index.
    pub fn click_select(&mut self, index: usize, shift: bool) {
        let Some(entry) = self.flat.rows.get(index) else {
            return;
        };
        let key = self.keys.key(&entry.row);
        apply_click(&mut self.selected, key, shift);
        self.selection = compute_selection(&self.flat.rows, &self.selected, &self.keys);
    }

    /// Commit a finished drag. Returns the new root vector for the
    /// owner's data-change notification, or `None` when the drag was a
    /// no-op.
    pub fn commit_reorder(&mut self, source: usize, insertion: usize) -> Option<&[Rc<Row>]> {
        let op = plan_reorder(
            &self.flat.rows,
            source,
            insertion,
            self.options.is_hierarchical(),
        )?;
        apply_reorder(&mut self.roots, &op);
        if self.options.group_fields().is_empty() {
            self.raw = self.roots.clone();
        }
        self.recompute();
        Some(&self.roots)
    }

    // ------------------------------------------------------------------
    // Derived state.

    pub fn flat_rows(&self) -> &[FlatRow] {
        &self.flat.rows
    }

    pub fn row_count(&self) -> usize {
        self.flat.len()
    }

    /// Whether the row at a flattened index is an expanded parent.
    pub fn is_open(&self, index: usize) -> bool {
        self.flat.open_indices.contains(&index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.indices.contains(&index)
    }

    pub fn selection(&self) -> &SelectionView {
        &self.selection
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn registry(&self) -> &FormatterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.registry
    }

    pub fn roots(&self) -> &[Rc<Row>] {
        &self.roots
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn row_height(&self) -> f64 {
        self.options.row_height()
    }

    pub fn content_height(&self) -> f64 {
        self.flat.len() as f64 * self.row_height()
    }

    /// Total width of the pinned band, logical pixels.
    pub fn pinned_width(&self) -> f64 {
        self.columns
            .iter()
            .zip(self.widths.iter())
            .filter(|(c, _)| c.pinned)
            .map(|(_, w)| *w)
            .sum()
    }

    // ------------------------------------------------------------------
    // Geometry, shared by paint and input.

    pub fn visible_range(&self) -> (usize, usize) {
        visible_range(
            self.scroll_top,
            self.viewport_height,
            self.row_height(),
            self.flat.len(),
        )
    }

    pub fn row_at(&self, y: f64) -> Option<usize> {
        row_at_y(y, self.scroll_top, self.row_height(), self.flat.len())
    }

    pub fn column_at(&self, x: f64) -> Option<ColumnHit> {
        column_at_x(x, self.scroll_left, &self.columns, &self.widths)
    }

    // ------------------------------------------------------------------

    fn apply_grouping(&mut self) {
        let fields = self.options.group_fields();
        self.roots = if fields.is_empty() {
            self.raw.clone()
        } else {
            group_rows(&self.raw, fields)
        };
    }

    fn recompute(&mut self) {
        let flat = match self.query.as_deref() {
            Some(query) => {
                let mut ctx =
                    FilterContext::new(query, &self.columns, &self.registry, &self.options);
                flatten(FlattenInput {
                    roots: &self.roots,
                    expanded: &self.expanded,
                    scheme: &self.scheme,
                    filter: Some(&mut ctx),
                    columns: &self.columns,
                    registry: &self.registry,
                    options: &self.options,
                    keys: &self.keys,
                })
            }
            None => flatten(FlattenInput {
                roots: &self.roots,
                expanded: &self.expanded,
                scheme: &self.scheme,
                filter: None,
                columns: &self.columns,
                registry: &self.registry,
                options: &self.options,
                keys: &self.keys,
            }),
        };
        self.flat = flat;
        self.selection = compute_selection(&self.flat.rows, &self.selected, &self.keys);
    }
}

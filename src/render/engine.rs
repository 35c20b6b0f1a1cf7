//! The single-threaded render engine.
//!
//! `Grid` owns a drawing surface and a [`GridCore`], paints the visible
//! window of the flattened rows, and translates pointer input back into
//! core mutations. Construction succeeds once a 2d context is acquired;
//! from then on every state mutation schedules a synchronous repaint
//! unless `block_redraw` batches it.

use serde_json::Value;
use web_sys::CanvasRenderingContext2d;

use crate::data::{FlatRow, GridCore};
use crate::error::Result;
use crate::layout::{in_tree_control, TREE_BRANCH_WIDTH, TREE_CONTROL_WIDTH};
use crate::formatter::{draw_text_in_cell, Align, FormatterContext};
use crate::render::surface::GridSurface;
use crate::types::{
    rows_to_value, ColumnConfig, GridEventKind, GridOptions, Listeners, RowClickEvent,
    SubscriptionId,
};

type HeightCallback = Box<dyn Fn(f64)>;
type DataCallback = Box<dyn Fn(&Value)>;

pub struct Grid {
    surface: GridSurface,
    ctx: CanvasRenderingContext2d,
    core: GridCore,
    listeners: Listeners,
    block_redraw: bool,
    dragged_row: Option<usize>,
    drag_insertion: Option<usize>,
    dpr: f64,
    last_height: f64,
    on_height_change: Option<HeightCallback>,
    on_data_change: Option<DataCallback>,
}

impl Grid {
    pub fn new(surface: GridSurface, options: GridOptions) -> Result<Grid> {
        let ctx = surface.context_2d()?;
        Ok(Grid {
            surface,
            ctx,
            core: GridCore::new(options),
            listeners: Listeners::new(),
            block_redraw: false,
            dragged_row: None,
            drag_insertion: None,
            dpr: 1.0,
            last_height: 0.0,
            on_height_change: None,
            on_data_change: None,
        })
    }

    pub fn core(&self) -> &GridCore {
        &self.core
    }

    // ------------------------------------------------------------------
    // Setters. Each mutation repaints unless redraw is blocked.

    pub fn set_data(&mut self, rows: Value) {
        self.core.set_data_value(rows);
        self.fire_height_change();
        self.redraw();
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnConfig>) {
        self.core.set_columns(columns);
        self.redraw();
    }

    pub fn set_options(&mut self, options: GridOptions) {
        self.core.set_options(options);
        self.fire_height_change();
        self.redraw();
    }

    pub fn set_query(&mut self, query: Option<String>) {
        self.core.set_query(query);
        self.fire_height_change();
        self.redraw();
    }

    pub fn set_scroll(&mut self, left: f64, top: f64) {
        self.core.set_scroll(left, top);
        self.redraw();
    }

    /// Resize the viewport. `width`/`height` are logical pixels; the
    /// backing store scales by the device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_size(&mut self, width: f64, height: f64, dpr: f64) {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.surface.set_size(
            (width * self.dpr).round().max(1.0) as u32,
            (height * self.dpr).round().max(1.0) as u32,
        );
        self.core.set_viewport(width, height);
        self.redraw();
    }

    /// While set, mutations update state but skip painting; clearing it
    /// triggers exactly one catch-up paint.
    pub fn set_block_redraw(&mut self, block: bool) {
        self.block_redraw = block;
        if !block {
            self.redraw();
        }
    }

    // ------------------------------------------------------------------
    // Events.

    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        callback: impl Fn(&RowClickEvent) + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(kind, callback)
    }

    pub fn unsubscribe(&mut self, kind: GridEventKind, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(kind, id)
    }

    pub fn set_on_height_change(&mut self, callback: impl Fn(f64) + 'static) {
        self.on_height_change = Some(Box::new(callback));
    }

    pub fn set_on_data_change(&mut self, callback: impl Fn(&Value) + 'static) {
        self.on_data_change = Some(Box::new(callback));
    }

    pub fn content_height(&self) -> f64 {
        self.core.content_height()
    }

    fn fire_height_change(&mut self) {
        let height = self.core.content_height();
        if (height - self.last_height).abs() < f64::EPSILON {
            return;
        }
        self.last_height = height;
        if let Some(callback) = &self.on_height_change {
            callback(height);
        }
    }

    // ------------------------------------------------------------------
    // Pointer input. Coordinates are viewport-relative logical pixels.

    pub fn handle_click(&mut self, x: f64, y: f64, shift: bool) {
        let Some(row_index) = self.core.row_at(y) else {
            return;
        };
        let Some(entry) = self.core.flat_rows().get(row_index).cloned() else {
            return;
        };
        let expandable = self.core.options().is_hierarchical()
            && (entry.row.has_children() || entry.row.is_group());
        let pinned = self.core.pinned_width();
        let content_x = if x >= pinned {
            x + self.core.scroll_left() - pinned
        } else {
            x
        };
        if in_tree_control(content_x, entry.level, expandable) {
            self.core.toggle_expanded(row_index);
            self.fire_height_change();
            self.redraw();
            return;
        }
        let hit = self.core.column_at(x);
        let event = RowClickEvent {
            row_data: entry.row.to_value(),
            row_index,
            column: hit.and_then(|h| self.core.columns().get(h.index).cloned()),
            column_index: hit.map(|h| h.index),
            left: x,
            top: y,
        };
        self.listeners.fire(GridEventKind::RowClick, &event);
        self.core.click_select(row_index, shift);
        self.redraw();
    }

    pub fn handle_context_menu(&mut self, x: f64, y: f64) {
        let Some(row_index) = self.core.row_at(y) else {
            return;
        };
        let Some(entry) = self.core.flat_rows().get(row_index) else {
            return;
        };
        let hit = self.core.column_at(x);
        let event = RowClickEvent {
            row_data: entry.row.to_value(),
            row_index,
            column: hit.and_then(|h| self.core.columns().get(h.index).cloned()),
            column_index: hit.map(|h| h.index),
            left: x,
            top: y,
        };
        self.listeners.fire(GridEventKind::RowContextMenu, &event);
    }

    pub fn start_drag(&mut self, y: f64) {
        if !self.core.options().moveable_rows {
            return;
        }
        self.dragged_row = self.core.row_at(y);
    }

    pub fn drag_to(&mut self, y: f64) {
        if self.dragged_row.is_none() {
            return;
        }
        let last = self.core.row_count().saturating_sub(1);
        self.drag_insertion = Some(self.core.row_at(y).unwrap_or(last));
        self.redraw();
    }

    pub fn end_drag(&mut self) {
        let (Some(source), Some(insertion)) = (self.dragged_row.take(), self.drag_insertion.take())
        else {
            self.dragged_row = None;
            self.drag_insertion = None;
            return;
        };
        self.block_redraw = true;
        let committed = self.core.commit_reorder(source, insertion).is_some();
        if committed {
            let roots = rows_to_value(self.core.roots());
            if let Some(callback) = &self.on_data_change {
                callback(&roots);
            }
        }
        self.fire_height_change();
        self.set_block_redraw(false);
    }

    // ------------------------------------------------------------------
    // Painting.

    pub fn redraw(&self) {
        if self.block_redraw {
            return;
        }
        let width = self.core.viewport_width();
        let height = self.core.viewport_height();
        // Half-pixel offset keeps 1px lines crisp.
        self.ctx
            .set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.5, 0.5)
            .ok();
        self.ctx.set_line_width(1.0);
        self.ctx.clear_rect(-32.0, -32.0, width + 64.0, height + 64.0);

        let (first, count) = self.core.visible_range();
        let row_height = self.core.row_height();
        let offset_top = self.core.scroll_top() % row_height;
        let palette = &self.core.options().theme.palette;

        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&palette.line_color);
        for i in 0..=count {
            let y = (i as f64 * row_height - offset_top).floor();
            self.ctx.move_to(0.0, y);
            self.ctx.line_to(width, y);
        }
        self.ctx.stroke();

        for i in 0..count {
            let index = first + i;
            // The dragged row is lifted out of the flow; rows between the
            // source and the insertion point shift to show the gap.
            if self.dragged_row == Some(index) {
                continue;
            }
            let mut offset = 0.0;
            if self.dragged_row.is_some_and(|d| d < index) {
                offset -= row_height;
            }
            if self.drag_insertion.is_some_and(|d| d < index) {
                offset += row_height;
            }
            let y = (i as f64 * row_height - offset_top).floor() + offset;
            self.draw_row(index, y);
        }

        let pinned = self.core.pinned_width();
        if pinned > 0.0 {
            self.ctx.begin_path();
            self.ctx.set_stroke_style_str(&palette.line_color);
            self.ctx.move_to(pinned, 0.0);
            self.ctx.line_to(pinned, height);
            self.ctx.stroke();
        }
    }

    /// Paint the row under viewport `y` at the top of another surface.
    /// Used by hosts to build a drag ghost image.
    pub fn draw_row_ghost(&self, y: f64) {
        if let Some(index) = self.core.row_at(y) {
            self.draw_row(index, 0.0);
        }
    }

    fn draw_row(&self, index: usize, y: f64) {
        let Some(entry) = self.core.flat_rows().get(index) else {
            return;
        };
        let options = self.core.options();
        let theme = &options.theme;
        let row_height = self.core.row_height();
        let width = self.core.viewport_width();
        let is_group = entry.row.is_group();

        let background = if self.core.is_selected(index) {
            &theme.palette.background_color_selected
        } else {
            &theme.palette.background_color
        };
        self.ctx.set_fill_style_str(background);
        self.ctx.fill_rect(0.0, y, width, row_height);
        if is_group {
            self.ctx
                .set_fill_style_str(&theme.palette.group_header_background_color);
            self.ctx.fill_rect(0.0, y, width, row_height);
        }

        let foreground = if is_group {
            &theme.palette.group_header_text_color
        } else {
            &theme.palette.text_color
        };
        self.ctx.set_fill_style_str(foreground);
        self.ctx.set_stroke_style_str(foreground);

        let level = entry.level;
        let has_children = entry.row.has_children();
        let hierarchical = options.is_hierarchical();
        let pinned = self.core.pinned_width();
        let scroll_left = self.core.scroll_left();
        let tree_origin = pinned - scroll_left + level as f64 * TREE_CONTROL_WIDTH;

        if hierarchical && (has_children || is_group) {
            self.draw_tree_control(
                self.core.is_open(index),
                tree_origin + theme.spacing.cell_padding_left,
                y,
                row_height,
            );
        }
        if hierarchical && level > 0 && !is_group {
            self.draw_tree_branch(tree_origin - 12.0, y, row_height);
        }

        // Indent applied to the first column's cell.
        let offset_left = if hierarchical && (has_children || is_group) {
            (level + 1) as f64 * TREE_CONTROL_WIDTH
        } else {
            level as f64 * TREE_BRANCH_WIDTH
        };

        self.ctx.set_font(&theme.font.to_css());
        if is_group {
            self.draw_group_header(entry, y, row_height, options);
            return;
        }
        self.draw_pinned_cells(entry, y, offset_left, row_height, options);
        self.draw_scrolled_cells(entry, y, offset_left, row_height, options);
    }

    /// Pinned columns paint at fixed positions, ignoring scroll.
    fn draw_pinned_cells(
        &self,
        entry: &FlatRow,
        y: f64,
        offset_left: f64,
        row_height: f64,
        options: &GridOptions,
    ) {
        let mut x = 0.0;
        for (index, (column, cell_width)) in self
            .core
            .columns()
            .iter()
            .zip(self.core.widths().iter())
            .enumerate()
        {
            if !column.pinned {
                continue;
            }
            let indent = if index == 0 { offset_left } else { 0.0 };
            self.draw_cell_clipped(
                entry,
                column,
                x + indent,
                y,
                cell_width - indent,
                row_height,
                x + indent,
                options,
            );
            x += cell_width;
        }
    }

    /// Non-pinned columns paint offset by horizontal scroll, clipped so
    /// they never show underneath the pinned band.
    fn draw_scrolled_cells(
        &self,
        entry: &FlatRow,
        y: f64,
        offset_left: f64,
        row_height: f64,
        options: &GridOptions,
    ) {
        let pinned = self.core.pinned_width();
        let viewport = self.core.viewport_width();
        let mut x = pinned - self.core.scroll_left();
        for (index, (column, cell_width)) in self
            .core
            .columns()
            .iter()
            .zip(self.core.widths().iter())
            .enumerate()
        {
            if column.pinned {
                continue;
            }
            let indent = if index == 0 { offset_left } else { 0.0 };
            if x + cell_width >= pinned && x <= viewport {
                let clip_x = (x + indent).max(pinned);
                self.draw_cell_clipped(
                    entry,
                    column,
                    x + indent,
                    y,
                    cell_width - indent,
                    row_height,
                    clip_x,
                    options,
                );
            }
            x += cell_width;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cell_clipped(
        &self,
        entry: &FlatRow,
        column: &ColumnConfig,
        x: f64,
        y: f64,
        cell_width: f64,
        row_height: f64,
        clip_x: f64,
        options: &GridOptions,
    ) {
        if cell_width <= 0.0 {
            return;
        }
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(clip_x, y, cell_width - (clip_x - x), row_height);
        self.ctx.clip();
        let formatter = self
            .core
            .registry()
            .resolve(column.formatter.as_deref());
        let params = column.formatter_params.unwrap_or_default();
        let context = FormatterContext {
            options,
            query: self.core.query(),
        };
        formatter.paint_cell(
            &self.ctx,
            entry.row.field(&column.field),
            y,
            x,
            cell_width - options.theme.spacing.cell_padding_right,
            row_height,
            &params,
            &context,
        );
        self.ctx.restore();
    }

    fn draw_group_header(&self, entry: &FlatRow, y: f64, row_height: f64, options: &GridOptions) {
        let label = format!(
            "{} ({})",
            entry.row.group_value().unwrap_or_default(),
            entry.row.child_count()
        );
        let x = entry.level as f64 * TREE_CONTROL_WIDTH + TREE_CONTROL_WIDTH;
        draw_text_in_cell(
            &self.ctx,
            &label,
            x,
            y,
            self.core.viewport_width() - x,
            row_height,
            Align::Left,
            &options.theme.spacing,
        );
    }

    fn draw_tree_control(&self, open: bool, x: f64, y: f64, row_height: f64) {
        let center = (y + row_height / 2.0).floor();
        self.ctx.begin_path();
        if open {
            self.ctx.move_to(x, center);
            self.ctx.line_to(x + 10.0, center);
            self.ctx.line_to(x + 5.0, center + 5.0);
        } else {
            self.ctx.move_to(x, center - 5.0);
            self.ctx.line_to(x + 5.0, center);
            self.ctx.line_to(x, center + 5.0);
        }
        self.ctx.fill();
    }

    fn draw_tree_branch(&self, x: f64, y: f64, row_height: f64) {
        let bottom = y + row_height / 2.0;
        self.ctx.begin_path();
        self.ctx.set_line_width(1.0);
        self.ctx.move_to(x, y + 5.0);
        self.ctx.line_to(x, bottom);
        self.ctx.line_to(x + 5.0, bottom);
        self.ctx.stroke();
    }
}

//! Shared canvas text helpers used by the formatters.

use web_sys::CanvasRenderingContext2d;

use super::Align;
use crate::types::Spacing;

const ELLIPSIS: &str = "\u{2026}";

/// Measured advance width of `text` under the context's current font.
pub fn measure_text(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

/// Truncate `text` with a trailing ellipsis so it fits in `max_width`
/// logical pixels. Truncation walks back whole chars, never bytes.
pub fn fit_text(ctx: &CanvasRenderingContext2d, text: &str, max_width: f64) -> String {
    if measure_text(ctx, text) <= max_width {
        return text.to_string();
    }
    let ellipsis_width = measure_text(ctx, ELLIPSIS);
    let mut truncated: String = text.to_string();
    while truncated.pop().is_some() {
        if truncated.is_empty() {
            break;
        }
        if measure_text(ctx, &truncated) + ellipsis_width <= max_width {
            truncated.push_str(ELLIPSIS);
            return truncated;
        }
    }
    ELLIPSIS.to_string()
}

/// Draw a single line of text inside a cell rectangle, ellipsis-truncated
/// and vertically centred. Alignment applies within the padded area.
#[allow(clippy::too_many_arguments)]
pub fn draw_text_in_cell(
    ctx: &CanvasRenderingContext2d,
    text: &str,
    x: f64,
    top: f64,
    width: f64,
    row_height: f64,
    align: Align,
    spacing: &Spacing,
) {
    let inner_width = width - spacing.cell_padding_left - spacing.cell_padding_right;
    if inner_width <= 0.0 {
        return;
    }
    let fitted = fit_text(ctx, text, inner_width);
    let text_width = measure_text(ctx, &fitted);
    let left = x + spacing.cell_padding_left;
    let text_x = match align {
        Align::Left => left,
        Align::Center => left + (inner_width - text_width) / 2.0,
        Align::Right => left + inner_width - text_width,
    };
    ctx.set_text_baseline("middle");
    ctx.fill_text(&fitted, text_x, top + row_height / 2.0).ok();
}

//! Default string formatter with query-match highlighting.

use serde_json::Value;
use web_sys::CanvasRenderingContext2d;

use super::text::{draw_text_in_cell, measure_text};
use super::{value_text, Formatter, FormatterContext, FormatterParams};

pub struct StringFormatter;

impl StringFormatter {
    /// Paint a highlight rectangle behind the first query occurrence.
    /// Left-aligned cells only: once the text is centred or truncated the
    /// measured prefix no longer lines up with the glyphs on screen.
    fn paint_query_marker(
        ctx: &CanvasRenderingContext2d,
        text: &str,
        top: f64,
        x: f64,
        row_height: f64,
        context: &FormatterContext<'_>,
    ) {
        let Some(query) = context.query.filter(|q| !q.is_empty()) else {
            return;
        };
        let haystack;
        let needle;
        if context.options.query_case_sensitive {
            haystack = text.to_string();
            needle = query.to_string();
        } else {
            haystack = text.to_lowercase();
            needle = query.to_lowercase();
        }
        let Some(byte_start) = haystack.find(&needle) else {
            return;
        };
        let prefix = text.get(..byte_start).unwrap_or_default();
        let matched = text.get(byte_start..byte_start + needle.len()).unwrap_or_default();
        let prefix_width = measure_text(ctx, prefix);
        let match_width = measure_text(ctx, matched);
        let theme = &context.options.theme;
        let marker_height = theme.font.size + 4.0;
        let marker_top = top + (row_height - marker_height) / 2.0;
        ctx.save();
        ctx.set_fill_style_str(&theme.palette.query_marker_color);
        ctx.fill_rect(
            x + theme.spacing.cell_padding_left + prefix_width,
            marker_top,
            match_width,
            marker_height,
        );
        ctx.restore();
    }
}

impl Formatter for StringFormatter {
    fn to_text(&self, value: Option<&Value>, _params: &FormatterParams) -> String {
        value_text(value)
    }

    fn paint_cell(
        &self,
        ctx: &CanvasRenderingContext2d,
        value: Option<&Value>,
        top: f64,
        x: f64,
        width: f64,
        row_height: f64,
        params: &FormatterParams,
        context: &FormatterContext<'_>,
    ) {
        let text = value_text(value);
        if text.is_empty() {
            return;
        }
        if params.align_horizontal == super::Align::Left {
            Self::paint_query_marker(ctx, &text, top, x, row_height, context);
        }
        draw_text_in_cell(
            ctx,
            &text,
            x,
            top,
            width,
            row_height,
            params.align_horizontal,
            &context.options.theme.spacing,
        );
    }
}

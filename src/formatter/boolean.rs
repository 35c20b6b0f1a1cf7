//! Checkbox formatter for boolean fields.

use serde_json::Value;
use web_sys::CanvasRenderingContext2d;

use super::{Formatter, FormatterContext, FormatterParams};

const BOX_SIZE: f64 = 24.0;
const INSET: f64 = 5.0;

pub struct BooleanFormatter;

fn truthy(value: Option<&Value>) -> Option<bool> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => Some(!s.is_empty()),
        Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Some(_) => Some(true),
    }
}

impl Formatter for BooleanFormatter {
    fn to_text(&self, value: Option<&Value>, _params: &FormatterParams) -> String {
        match truthy(value) {
            Some(b) => b.to_string(),
            None => String::new(),
        }
    }

    fn paint_cell(
        &self,
        ctx: &CanvasRenderingContext2d,
        value: Option<&Value>,
        top: f64,
        x: f64,
        width: f64,
        row_height: f64,
        _params: &FormatterParams,
        context: &FormatterContext<'_>,
    ) {
        let Some(checked) = truthy(value) else {
            return;
        };
        let theme = &context.options.theme;
        let box_left = x + theme.spacing.cell_padding_left;
        if box_left + BOX_SIZE > x + width {
            return;
        }
        let box_top = top + ((row_height - BOX_SIZE) / 2.0).floor();
        ctx.save();
        ctx.set_stroke_style_str(&theme.palette.text_color);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(box_left + 1.0, box_top + 1.0, BOX_SIZE - 2.0, BOX_SIZE - 2.0);
        if checked {
            ctx.begin_path();
            ctx.move_to(box_left + INSET, box_top + BOX_SIZE / 2.0);
            ctx.line_to(box_left + BOX_SIZE * 0.42, box_top + BOX_SIZE - INSET - 2.0);
            ctx.line_to(box_left + BOX_SIZE - INSET, box_top + INSET + 1.0);
            ctx.stroke();
        }
        ctx.restore();
    }
}

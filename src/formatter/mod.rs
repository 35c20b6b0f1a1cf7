//! Cell formatters.
//!
//! A formatter owns two concerns for a column: deriving the plain text used
//! by sorting and filtering (`to_text`), and painting the cell onto the
//! canvas (`paint_cell`). Both sides of the worker boundary must resolve
//! the same formatter name to the same implementation, which is why the
//! registry is value-free configuration: columns carry a formatter *name*,
//! never a formatter object.

mod boolean;
mod string;
mod text;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_sys::CanvasRenderingContext2d;

use crate::types::GridOptions;

pub use boolean::BooleanFormatter;
pub use string::StringFormatter;
pub use text::{draw_text_in_cell, fit_text, measure_text};

/// Horizontal alignment of a cell's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Per-column formatter tuning, carried on the column config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatterParams {
    pub align_horizontal: Align,
}

/// Read-only grid state a formatter may consult while painting.
pub struct FormatterContext<'a> {
    pub options: &'a GridOptions,
    pub query: Option<&'a str>,
}

/// A cell formatter. Implementations must be pure with respect to grid
/// state: everything they need arrives through the arguments.
pub trait Formatter {
    /// Plain-text rendition of a value. This is the text sorting and
    /// filtering operate on, so it must be total: absent and null values
    /// yield the empty string.
    fn to_text(&self, value: Option<&Value>, params: &FormatterParams) -> String;

    /// Paint a single cell. `x` and `top` are the cell's logical origin,
    /// `width` and `row_height` its logical extent.
    #[allow(clippy::too_many_arguments)]
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
    );
}

/// Name-keyed formatter registry. Unknown and absent names resolve to the
/// default string formatter so a misconfigured column degrades to plain
/// text instead of failing.
pub struct FormatterRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
    default: Box<dyn Formatter>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        let mut registry = FormatterRegistry {
            formatters: HashMap::new(),
            default: Box::new(StringFormatter),
        };
        registry.register("string", StringFormatter);
        registry.register("boolean", BooleanFormatter);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, formatter: impl Formatter + 'static) {
        self.formatters.insert(name.into(), Box::new(formatter));
    }

    pub fn resolve(&self, name: Option<&str>) -> &dyn Formatter {
        name.and_then(|n| self.formatters.get(n))
            .map_or(self.default.as_ref(), Box::as_ref)
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        FormatterRegistry::new()
    }
}

/// Render a JSON value as display text without JSON punctuation: strings
/// lose their quotes, scalars print plainly, null is empty.
pub(crate) fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

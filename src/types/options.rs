//! Grid options and theme.
//!
//! The options bag is immutable per render: owners replace it wholesale and
//! every replacement forces a full recomputation of the flattened rows.

use serde::{Deserialize, Serialize};

/// Fallback row height in logical pixels when the options omit one.
pub const DEFAULT_ROW_HEIGHT: f64 = 32.0;

/// Leading-throttle interval for scroll propagation to workers (ms).
pub const DEFAULT_SCROLL_FRAMERATE_MS: f64 = 16.0;

/// Trailing settle delay after scrolling stops (ms). Guarantees the final
/// resting scroll position is always rendered exactly.
pub const SCROLL_SETTLE_DELAY_MS: f64 = 64.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub style: String,
    pub variant: String,
    pub weight: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family: "sans-serif".to_string(),
            size: 14.0,
            style: "normal".to_string(),
            variant: "normal".to_string(),
            weight: "normal".to_string(),
        }
    }
}

impl FontSpec {
    /// CSS font shorthand for `CanvasRenderingContext2d::set_font`.
    pub fn to_css(&self) -> String {
        format!(
            "{} {} {} {}px {}",
            self.style, self.variant, self.weight, self.size, self.family
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palette {
    pub text_color: String,
    pub text_color_selected: String,
    pub background_color: String,
    pub background_color_selected: String,
    pub header_background_color: String,
    pub header_background_color_dragging: String,
    pub header_text_color: String,
    pub header_text_color_dragging: String,
    pub group_header_background_color: String,
    pub group_header_text_color: String,
    pub line_color: String,
    pub query_marker_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            text_color: "#212121".to_string(),
            text_color_selected: "#212121".to_string(),
            background_color: "#fff".to_string(),
            background_color_selected: "#eee".to_string(),
            header_background_color: "#fff".to_string(),
            header_background_color_dragging: "#eee".to_string(),
            header_text_color: "#212121".to_string(),
            header_text_color_dragging: "#212121".to_string(),
            group_header_background_color: "#333333".to_string(),
            group_header_text_color: "#fff".to_string(),
            line_color: "#212121".to_string(),
            query_marker_color: "#fff9a8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    pub cell_padding_left: f64,
    pub cell_padding_right: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            cell_padding_left: 8.0,
            cell_padding_right: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridTheme {
    pub font: FontSpec,
    pub palette: Palette,
    pub spacing: Spacing,
}

/// The per-grid configuration bag. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Treat `children` vectors as a displayable tree.
    pub data_tree: bool,
    pub theme: GridTheme,
    /// Row height in logical pixels; `None` falls back to 32.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_height: Option<f64>,
    /// Field list to group flat data by (synthetic group header rows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Vec<String>>,
    /// Whether rows may be drag-reordered.
    pub moveable_rows: bool,
    /// Leading-throttle interval for scroll messages, in ms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_framerate: Option<f64>,
    /// Whether the free-text query filter matches case-sensitively.
    pub query_case_sensitive: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            data_tree: false,
            theme: GridTheme::default(),
            row_height: None,
            group_by: None,
            moveable_rows: false,
            scroll_framerate: None,
            query_case_sensitive: true,
        }
    }
}

impl GridOptions {
    pub fn row_height(&self) -> f64 {
        self.row_height.unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    pub fn scroll_framerate(&self) -> f64 {
        self.scroll_framerate.unwrap_or(DEFAULT_SCROLL_FRAMERATE_MS)
    }

    /// Grouping is only active when at least one field is configured.
    pub fn group_fields(&self) -> &[String] {
        self.group_by.as_deref().unwrap_or(&[])
    }

    /// Tree affordances apply to explicit trees and to grouped data.
    pub fn is_hierarchical(&self) -> bool {
        self.data_tree || !self.group_fields().is_empty()
    }
}

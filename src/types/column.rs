//! Column configuration.
//!
//! Columns are an ordered sequence of descriptors. The wire form
//! (worker boundary, JS boundary) uses camelCase field names.

use serde::{Deserialize, Serialize};

use crate::formatter::FormatterParams;

/// Sort direction for a column taking part in the sort scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Asc
    }
}

/// A single column descriptor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnConfig {
    /// Dotted-path lookup into a row (`"address.city"`).
    pub field: String,
    /// Formatter name; `None` resolves to the default string formatter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    /// Fixed width in logical pixels; `None` takes a share of the
    /// remaining flexible space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter_params: Option<FormatterParams>,
    /// Multi-column sort precedence; lower = higher precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    /// Pinned columns render at a fixed left position, immune to
    /// horizontal scroll, and are excluded from the flexible-width pool.
    pub pinned: bool,
}

impl ColumnConfig {
    /// Shorthand used pervasively in tests and demos.
    pub fn new(field: impl Into<String>) -> Self {
        ColumnConfig {
            field: field.into(),
            ..ColumnConfig::default()
        }
    }

    pub fn direction(&self) -> SortDirection {
        self.sort_direction.unwrap_or_default()
    }
}

/// True when the new column config changes anything sort-relevant and the
/// flattened projection must be rebuilt. Width-only changes (drag-resize)
/// must NOT force a re-sort, only a re-layout.
pub fn requires_full_update(old: Option<&[ColumnConfig]>, new: &[ColumnConfig]) -> bool {
    let Some(old) = old else {
        return true;
    };
    if old.len() != new.len() {
        return true;
    }
    old.iter().zip(new.iter()).any(|(a, b)| {
        a.sort_index != b.sort_index
            || a.sort_direction != b.sort_direction
            || a.field != b.field
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn width_only_change_is_not_full_update() {
        let mut a = ColumnConfig::new("name");
        a.width = Some(100.0);
        let mut b = a.clone();
        b.width = Some(180.0);
        assert!(!requires_full_update(Some(&[a]), &[b]));
    }

    #[test]
    fn sort_change_is_full_update() {
        let a = ColumnConfig::new("name");
        let mut b = a.clone();
        b.sort_index = Some(0);
        assert!(requires_full_update(Some(&[a.clone()]), &[b]));
        assert!(requires_full_update(None, &[a]));
    }

    #[test]
    fn camel_case_wire_form() {
        let mut col = ColumnConfig::new("age");
        col.sort_index = Some(1);
        col.sort_direction = Some(SortDirection::Desc);
        let json = serde_json::to_value(&col).unwrap();
        assert_eq!(json["sortIndex"], 1);
        assert_eq!(json["sortDirection"], "desc");
    }
}

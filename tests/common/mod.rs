//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use gridview::data::GridCore;
use gridview::types::{ColumnConfig, GridOptions, SortDirection};
use serde_json::{json, Value};

/// Flat dataset of `count` rows: `{name: "item{i}", rank: i, active: bool}`.
pub fn flat_rows(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| json!({"name": format!("item{i}"), "rank": i, "active": i % 2 == 0}))
            .collect(),
    )
}

/// Three-level tree with one deep match for the query "abc".
pub fn deep_tree() -> Value {
    json!([
        {"name": "root-1", "children": [
            {"name": "mid-1", "children": [
                {"name": "leaf-abc-1"},
                {"name": "leaf-plain"}
            ]},
            {"name": "mid-2", "children": [{"name": "leaf-x"}]}
        ]},
        {"name": "root-2", "children": [
            {"name": "mid-3", "children": [{"name": "leaf-y"}]}
        ]}
    ])
}

pub fn name_column() -> ColumnConfig {
    ColumnConfig::new("name")
}

pub fn sorted_name_column(direction: SortDirection) -> ColumnConfig {
    let mut col = ColumnConfig::new("name");
    col.sort_index = Some(0);
    col.sort_direction = Some(direction);
    col
}

pub fn tree_options() -> GridOptions {
    GridOptions {
        data_tree: true,
        ..GridOptions::default()
    }
}

/// A core with a viewport, columns, and data already applied.
pub fn core_with(options: GridOptions, columns: Vec<ColumnConfig>, data: Value) -> GridCore {
    let mut core = GridCore::new(options);
    core.set_viewport(500.0, 500.0);
    core.set_columns(columns);
    core.set_data_value(data);
    core
}

pub fn flat_names(core: &GridCore) -> Vec<String> {
    core.flat_rows()
        .iter()
        .map(|entry| {
            entry
                .row
                .field("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

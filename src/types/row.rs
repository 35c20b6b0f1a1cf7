//! Row records.
//!
//! Rows are externally-owned, opaque objects: a bag of JSON fields plus an
//! optional ordered `children` vector forming a tree, and an optional
//! synthetic group-header marker produced by the grouping transform. The
//! core holds `Rc` handles and never copies row contents; `children` is
//! interior-mutable because reorder commits splice child vectors in place.
//!
//! Wire form (worker and JS boundary): a JSON object whose `children`,
//! `__isGroup` and `__groupValue` keys carry the structure, all remaining
//! keys being data fields.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde_json::{Map, Value};

const CHILDREN_KEY: &str = "children";
const GROUP_MARKER_KEY: &str = "__isGroup";
const GROUP_VALUE_KEY: &str = "__groupValue";

pub struct Row {
    fields: Map<String, Value>,
    children: RefCell<Vec<Rc<Row>>>,
    is_group: bool,
    group_value: Option<String>,
}

impl Row {
    /// A plain data row without children.
    pub fn new(fields: Map<String, Value>) -> Rc<Row> {
        Rc::new(Row {
            fields,
            children: RefCell::new(Vec::new()),
            is_group: false,
            group_value: None,
        })
    }

    /// A data row with children (tree data).
    pub fn with_children(fields: Map<String, Value>, children: Vec<Rc<Row>>) -> Rc<Row> {
        Rc::new(Row {
            fields,
            children: RefCell::new(children),
            is_group: false,
            group_value: None,
        })
    }

    /// A synthetic group-header row.
    pub fn group(value: impl Into<String>, children: Vec<Rc<Row>>) -> Rc<Row> {
        Rc::new(Row {
            fields: Map::new(),
            children: RefCell::new(children),
            is_group: true,
            group_value: Some(value.into()),
        })
    }

    /// Build a row from its wire form. Non-object values yield a row with
    /// no fields rather than an error: rows are opaque to the core.
    pub fn from_value(value: Value) -> Rc<Row> {
        let mut fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let children = match fields.remove(CHILDREN_KEY) {
            Some(Value::Array(items)) => items.into_iter().map(Row::from_value).collect(),
            _ => Vec::new(),
        };
        let is_group = fields
            .remove(GROUP_MARKER_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let group_value = fields.remove(GROUP_VALUE_KEY).map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Rc::new(Row {
            fields,
            children: RefCell::new(children),
            is_group,
            group_value,
        })
    }

    /// Serialize back to the wire form, re-embedding children and markers.
    pub fn to_value(&self) -> Value {
        let mut map = self.fields.clone();
        if self.is_group {
            map.insert(GROUP_MARKER_KEY.to_string(), Value::Bool(true));
        }
        if let Some(group_value) = &self.group_value {
            map.insert(
                GROUP_VALUE_KEY.to_string(),
                Value::String(group_value.clone()),
            );
        }
        let children = self.children.borrow();
        if !children.is_empty() {
            map.insert(
                CHILDREN_KEY.to_string(),
                Value::Array(children.iter().map(|c| c.to_value()).collect()),
            );
        }
        Value::Object(map)
    }

    /// Dotted-path field lookup (`"address.city"`).
    pub fn field(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.fields.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn children(&self) -> Ref<'_, Vec<Rc<Row>>> {
        self.children.borrow()
    }

    pub fn children_mut(&self) -> RefMut<'_, Vec<Rc<Row>>> {
        self.children.borrow_mut()
    }

    pub fn has_children(&self) -> bool {
        !self.children.borrow().is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    pub fn is_group(&self) -> bool {
        self.is_group
    }

    pub fn group_value(&self) -> Option<&str> {
        self.group_value.as_deref()
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("fields", &self.fields)
            .field("children", &self.children.borrow().len())
            .field("is_group", &self.is_group)
            .finish()
    }
}

/// Parse a wire-form array into a root row vector. Anything other than an
/// array yields an empty dataset.
pub fn rows_from_value(value: Value) -> Vec<Rc<Row>> {
    match value {
        Value::Array(items) => items.into_iter().map(Row::from_value).collect(),
        _ => Vec::new(),
    }
}

/// Serialize a root row vector to its wire form.
pub fn rows_to_value(rows: &[Rc<Row>]) -> Value {
    Value::Array(rows.iter().map(|r| r.to_value()).collect())
}

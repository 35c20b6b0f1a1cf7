//! User-interaction events and the typed subscription registry.
//!
//! Event kinds are a closed enumeration: there is no string-keyed bus, and
//! dispatch over the worker boundary is exhaustively matched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::ColumnConfig;

/// The closed set of user events a grid emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridEventKind {
    RowClick,
    RowContextMenu,
}

/// Payload for row click and context-menu events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowClickEvent {
    /// The clicked row's data in wire form.
    pub row_data: Value,
    /// Index into the flattened row sequence.
    pub row_index: usize,
    /// Resolved column descriptor, when the click landed inside one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_index: Option<usize>,
    /// Click position relative to the drawing surface origin.
    pub left: f64,
    pub top: f64,
}

/// Opaque handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        SubscriptionId(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

type Callback = Box<dyn Fn(&RowClickEvent)>;

/// Per-grid listener registry. Multiple independent subscribers are
/// supported per event kind.
#[derive(Default)]
pub struct Listeners {
    map: HashMap<GridEventKind, Vec<(SubscriptionId, Callback)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Listeners::default()
    }

    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        callback: impl Fn(&RowClickEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.map
            .entry(kind)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Returns true when a subscription was removed.
    pub fn unsubscribe(&mut self, kind: GridEventKind, id: SubscriptionId) -> bool {
        let Some(entries) = self.map.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn fire(&self, kind: GridEventKind, event: &RowClickEvent) {
        if let Some(entries) = self.map.get(&kind) {
            for (_, callback) in entries {
                callback(event);
            }
        }
    }
}

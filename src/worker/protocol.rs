//! Wire protocol between the render delegate and its workers.
//!
//! A closed tagged union, exhaustively matched at the receiving boundary.
//! Every request carries a monotonic version so a receiver can drop a
//! message that arrives after a newer one has been processed; replies are
//! unversioned fire-and-forget.
//!
//! The init message is the one exception to pure serde traffic: it must
//! carry the transferred `OffscreenCanvas`, which cannot be serialized,
//! so it travels as a plain JS object `{kind: "init", canvas, payload}`
//! with only `payload` going through serde.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ColumnConfig, GridEventKind, GridOptions, RowClickEvent};

/// Marker kind of the hand-built init message.
pub const INIT_KIND: &str = "init";

/// Delegate-to-worker traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridRequest {
    SetData {
        version: u64,
        rows: Value,
    },
    SetColumns {
        version: u64,
        columns: Vec<ColumnConfig>,
    },
    SetOptions {
        version: u64,
        options: GridOptions,
    },
    SetQuery {
        version: u64,
        query: Option<String>,
    },
    SetScroll {
        version: u64,
        left: f64,
        top: f64,
    },
    SetViewport {
        version: u64,
        width: f64,
        height: f64,
        dpr: f64,
    },
    Click {
        version: u64,
        left: f64,
        top: f64,
        shift: bool,
    },
    ContextMenu {
        version: u64,
        left: f64,
        top: f64,
    },
    Redraw {
        version: u64,
    },
}

impl GridRequest {
    pub fn version(&self) -> u64 {
        match self {
            GridRequest::SetData { version, .. }
            | GridRequest::SetColumns { version, .. }
            | GridRequest::SetOptions { version, .. }
            | GridRequest::SetQuery { version, .. }
            | GridRequest::SetScroll { version, .. }
            | GridRequest::SetViewport { version, .. }
            | GridRequest::Click { version, .. }
            | GridRequest::ContextMenu { version, .. }
            | GridRequest::Redraw { version } => *version,
        }
    }
}

/// Serde-carried half of the init message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitPayload {
    pub rows: Value,
    pub columns: Vec<ColumnConfig>,
    pub options: GridOptions,
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for InitPayload {
    fn default() -> Self {
        InitPayload {
            rows: Value::Array(Vec::new()),
            columns: Vec::new(),
            options: GridOptions::default(),
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        }
    }
}

/// Worker-to-delegate traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridReply {
    /// Posted once at startup; the delegate answers with init.
    Ready,
    HeightChanged {
        height: f64,
    },
    Event {
        event_kind: GridEventKind,
        event: RowClickEvent,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_tags_are_stable() {
        let json = serde_json::to_value(&GridRequest::SetScroll {
            version: 7,
            left: 1.0,
            top: 2.0,
        })
        .unwrap();
        assert_eq!(json["kind"], "setScroll");
        assert_eq!(json["version"], 7);

        let parsed: GridRequest =
            serde_json::from_value(json!({"kind": "redraw", "version": 3})).unwrap();
        assert_eq!(parsed.version(), 3);
    }

    #[test]
    fn reply_round_trip() {
        let reply = GridReply::HeightChanged { height: 320.0 };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["kind"], "heightChanged");
        let back: GridReply = serde_json::from_value(json).unwrap();
        assert!(matches!(back, GridReply::HeightChanged { .. }));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed: Result<GridRequest, _> =
            serde_json::from_value(json!({"kind": "mystery", "version": 1}));
        assert!(parsed.is_err());
    }
}

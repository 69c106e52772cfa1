//! # Lifecycle Events
//!
//! Every multi-step plugin operation is announced by a begin event, which
//! allocates a correlation id, and closed by one terminal event carrying the
//! same id. Observers group events by id only: streams of concurrent
//! operations may interleave.
//!
//! ```text
//! emit { type, action, status: running }  ──▶ id
//! emit { id, status: running | warning }      (any number)
//! emit { id, status: success | error }        (exactly once)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Opaque token grouping every event of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(u64);

impl CorrelationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Running,
    Warning,
    Success,
    Error,
}

impl EventStatus {
    /// Success and error close an operation
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Success | EventStatus::Error)
    }
}

/// Subsystem an operation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Plugin,
    Parser,
    Render,
    Metadata,
    Drawer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Init,
    Read,
    Write,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginEvent {
    /// Absent on a begin event, set by the data store when emitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CorrelationId>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EventKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EventAction>,

    pub status: EventStatus,

    /// Paths of the files the operation touches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl PluginEvent {
    /// Begin event of a new operation
    pub fn begin(kind: EventKind, action: EventAction) -> Self {
        Self {
            id: None,
            kind: Some(kind),
            action: Some(action),
            status: EventStatus::Running,
            files: Vec::new(),
            data: None,
        }
    }

    /// Event reporting `status` for an existing operation
    pub fn status(id: CorrelationId, status: EventStatus) -> Self {
        Self {
            id: Some(id),
            kind: None,
            action: None,
            status,
            files: Vec::new(),
            data: None,
        }
    }

    pub fn success(id: CorrelationId) -> Self {
        Self::status(id, EventStatus::Success)
    }

    pub fn error(id: CorrelationId) -> Self {
        Self::status(id, EventStatus::Error)
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Mark the operation as covering the whole document
    pub fn global(self) -> Self {
        self.with_data(json!({ "global": true }))
    }

    pub fn is_global(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| data.get("global"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn is_begin(&self) -> bool {
        self.id.is_none() && !self.status.is_terminal()
    }
}

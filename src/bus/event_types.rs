//! Event kinds and payloads carried by the bus.
//!
//! Single source of truth for the events the editor, search, and queue
//! modules exchange. Names match the ones the label server's web client used
//! so log lines stay greppable across both.

use serde::{Deserialize, Serialize};

use crate::model::LabelData;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const EVENT_ADD_TO_QUEUE: &str = "addToQueue";
pub const EVENT_LOAD_IN_EDITOR: &str = "loadInEditor";

// ---------------------------------------------------------------------------
// Kinds and payloads
// ---------------------------------------------------------------------------

/// Registry key. One subscriber list exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    AddToQueue,
    LoadInEditor,
}

impl EventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddToQueue => EVENT_ADD_TO_QUEUE,
            Self::LoadInEditor => EVENT_LOAD_IN_EDITOR,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum AppEvent {
    /// A label should be appended to the print queue.
    AddToQueue(LabelData),
    /// A label should replace the editor's current form contents.
    LoadInEditor(LabelData),
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::AddToQueue(_) => EventKind::AddToQueue,
            Self::LoadInEditor(_) => EventKind::LoadInEditor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn label(&self) -> &LabelData {
        match self {
            Self::AddToQueue(label) | Self::LoadInEditor(label) => label,
        }
    }
}

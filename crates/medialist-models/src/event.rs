use serde::{Deserialize, Serialize};

use crate::content::MediaKind;
use crate::status::Status;

/// Payload broadcast on the event bus when an item's status is confirmed.
///
/// Ephemeral - exists only for the duration of the broadcast. Handlers must
/// match on `(api_id, kind)` before acting; delivery order across different
/// items is not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChangeEvent {
    pub api_id: String,
    pub kind: MediaKind,
    pub status: Status,
}

impl StatusChangeEvent {
    pub fn new(api_id: impl Into<String>, kind: MediaKind, status: Status) -> Self {
        Self {
            api_id: api_id.into(),
            kind,
            status,
        }
    }

    /// True when this event refers to the given item identity.
    pub fn is_for(&self, api_id: &str, kind: MediaKind) -> bool {
        self.api_id == api_id && self.kind == kind
    }
}

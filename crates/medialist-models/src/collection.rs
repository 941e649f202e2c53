use serde::{Deserialize, Serialize};

use crate::content::ContentItem;
use crate::status::Status;

/// The user-specific relationship to a catalogue item.
///
/// `entry_id` is assigned by the remote service when the entry is first
/// created; at most one entry exists per `(user, api_id, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionEntry {
    pub entry_id: Option<i64>,
    pub status: Status,
}

/// A collection entry joined with its catalogue item - the row shape the
/// collection store caches and the query pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionItem {
    pub content: ContentItem,
    pub status: Status,
    pub entry_id: Option<i64>,
}

impl CollectionItem {
    pub fn new(content: ContentItem, status: Status, entry_id: Option<i64>) -> Self {
        Self {
            content,
            status,
            entry_id,
        }
    }
}

use async_trait::async_trait;
use medialist_models::{CollectionEntry, CollectionItem, ContentItem, MediaKind, Status};

use crate::error::RemoteError;

/// A catalogue item together with the caller's entry for it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemLookup {
    pub content: ContentItem,
    pub entry: Option<CollectionEntry>,
}

/// Operations the remote content service exposes to this client.
///
/// Search ranking and matching are entirely the service's responsibility;
/// this side only forwards the query. All operations require a bearer
/// credential - implementations return [`RemoteError::MissingCredential`]
/// without touching the network when none is available.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Full collection of the given user, entries joined with their
    /// catalogue items.
    async fn fetch_collection(&self, user_id: &str) -> Result<Vec<CollectionItem>, RemoteError>;

    /// One catalogue item by external id, plus the current user's entry for
    /// it when one exists.
    async fn fetch_item(&self, kind: MediaKind, api_id: &str)
        -> Result<ItemLookup, RemoteError>;

    /// Create a collection entry; returns the service-assigned entry id.
    /// `status` must be a marked status, never `Status::None`.
    async fn create_entry(
        &self,
        api_id: &str,
        kind: MediaKind,
        status: Status,
    ) -> Result<i64, RemoteError>;

    async fn update_entry(&self, entry_id: i64, status: Status) -> Result<(), RemoteError>;

    async fn delete_entry(&self, entry_id: i64) -> Result<(), RemoteError>;

    /// Catalogue search, optionally restricted to one kind.
    async fn search(
        &self,
        query: &str,
        kind: Option<MediaKind>,
    ) -> Result<Vec<ContentItem>, RemoteError>;
}

//! Session-scoped cache of the current user's collection.
//!
//! Loaded once per session from the remote service, manually refreshable,
//! and the source of truth for every "my collection" derived view. Readers
//! always see either the last fully loaded snapshot or that snapshot with
//! local patches applied - never a partially fetched state.

use anyhow::{anyhow, Result};
use medialist_models::{CollectionItem, MediaKind, Status};
use medialist_remote::ContentService;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Default)]
struct StoreState {
    items: Vec<CollectionItem>,
    user_id: Option<String>,
    loaded: bool,
    error: bool,
}

pub struct CollectionStore {
    service: Arc<dyn ContentService>,
    state: Mutex<StoreState>,
}

impl CollectionStore {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Fetch the user's full collection and replace the cache wholesale.
    ///
    /// A fetch failure never propagates: the cache becomes empty with the
    /// error flag set, and the caller may retry via [`refresh`](Self::refresh).
    pub async fn load(&self, user_id: &str) {
        let fetched = self.service.fetch_collection(user_id).await;
        let mut state = self.state.lock().expect("store lock poisoned");
        state.user_id = Some(user_id.to_string());
        state.loaded = true;
        match fetched {
            Ok(items) => {
                info!("Loaded {} collection item(s) for {}", items.len(), user_id);
                state.items = items;
                state.error = false;
            }
            Err(e) => {
                warn!("Collection load failed for {}: {}", user_id, e);
                state.items = Vec::new();
                state.error = true;
            }
        }
    }

    /// Re-run [`load`](Self::load) with the last known user id.
    pub async fn refresh(&self) -> Result<()> {
        let user_id = {
            let state = self.state.lock().expect("store lock poisoned");
            state
                .user_id
                .clone()
                .ok_or_else(|| anyhow!("No collection loaded yet, nothing to refresh"))?
        };
        self.load(&user_id).await;
        Ok(())
    }

    /// In-place status update of a single cached entry, no network round
    /// trip. This is the only sanctioned local write path; it keeps
    /// store-derived views consistent with optimistic updates happening in
    /// widgets that never touch the store directly.
    ///
    /// A patch to `Status::None` conceptually deletes the entry: the row is
    /// kept internally so a rollback can restore it, but [`snapshot`]
    /// (Self::snapshot) omits it. Patching an item the snapshot does not
    /// contain is a no-op; the entry shows up on the next refresh.
    pub fn apply_local_patch(&self, api_id: &str, kind: MediaKind, status: Status) {
        let mut state = self.state.lock().expect("store lock poisoned");
        match state
            .items
            .iter_mut()
            .find(|item| item.content.api_id == api_id && item.content.kind == kind)
        {
            Some(item) => {
                debug!(
                    "Local patch: {}/{} {} -> {}",
                    kind, api_id, item.status, status
                );
                item.status = status;
            }
            None => {
                debug!("Local patch skipped, {}/{} not in snapshot", kind, api_id);
            }
        }
    }

    /// Clone-out read of the current snapshot. Conceptually deleted rows
    /// (patched to `Status::None`) are omitted.
    pub fn snapshot(&self) -> Vec<CollectionItem> {
        let state = self.state.lock().expect("store lock poisoned");
        state
            .items
            .iter()
            .filter(|item| item.status.is_marked())
            .cloned()
            .collect()
    }

    /// Entry id the last load recorded for an item, if the item is cached.
    pub fn entry_id(&self, api_id: &str, kind: MediaKind) -> Option<i64> {
        let state = self.state.lock().expect("store lock poisoned");
        state
            .items
            .iter()
            .find(|item| item.content.api_id == api_id && item.content.kind == kind)
            .and_then(|item| item.entry_id)
    }

    pub fn is_loaded(&self) -> bool {
        self.state.lock().expect("store lock poisoned").loaded
    }

    /// True when the last load failed and the snapshot is the empty
    /// fallback.
    pub fn has_error(&self) -> bool {
        self.state.lock().expect("store lock poisoned").error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collection_item, MockService};

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let service = Arc::new(MockService::new());
        service.set_collection(vec![
            collection_item("tt1", MediaKind::Movie, "Alien", Status::Completed, Some(1)),
            collection_item("bk1", MediaKind::Book, "Dune", Status::Pending, Some(2)),
        ]);

        let store = CollectionStore::new(service.clone());
        store.load("user-1").await;

        assert!(store.is_loaded());
        assert!(!store.has_error());
        assert_eq!(store.snapshot().len(), 2);
        assert_eq!(store.entry_id("bk1", MediaKind::Book), Some(2));
    }

    #[tokio::test]
    async fn test_failed_load_is_empty_with_error_flag() {
        let service = Arc::new(MockService::new());
        service.fail_next_fetch_collection();

        let store = CollectionStore::new(service.clone());
        store.load("user-1").await;

        assert!(store.is_loaded());
        assert!(store.has_error());
        assert!(store.snapshot().is_empty());

        // refresh retries with the remembered user id and recovers
        service.set_collection(vec![collection_item(
            "tt1",
            MediaKind::Movie,
            "Alien",
            Status::Completed,
            Some(1),
        )]);
        store.refresh().await.unwrap();
        assert!(!store.has_error());
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(service.last_fetched_user(), Some("user-1".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_before_load_is_an_error() {
        let service = Arc::new(MockService::new());
        let store = CollectionStore::new(service);
        assert!(store.refresh().await.is_err());
    }

    #[tokio::test]
    async fn test_local_patch_updates_in_place() {
        let service = Arc::new(MockService::new());
        service.set_collection(vec![collection_item(
            "tt1",
            MediaKind::Movie,
            "Alien",
            Status::Pending,
            Some(1),
        )]);

        let store = CollectionStore::new(service);
        store.load("user-1").await;

        store.apply_local_patch("tt1", MediaKind::Movie, Status::Completed);
        assert_eq!(store.snapshot()[0].status, Status::Completed);

        // unknown item: no-op, no panic, no insertion
        store.apply_local_patch("tt9", MediaKind::Game, Status::Pending);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_patch_to_none_hides_row_until_restored() {
        let service = Arc::new(MockService::new());
        service.set_collection(vec![collection_item(
            "tt1",
            MediaKind::Movie,
            "Alien",
            Status::Pending,
            Some(1),
        )]);

        let store = CollectionStore::new(service);
        store.load("user-1").await;

        store.apply_local_patch("tt1", MediaKind::Movie, Status::None);
        assert!(store.snapshot().is_empty());

        // a rollback patches the previous status back in
        store.apply_local_patch("tt1", MediaKind::Movie, Status::Pending);
        assert_eq!(store.snapshot().len(), 1);
    }
}

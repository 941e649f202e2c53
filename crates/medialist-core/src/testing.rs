//! Shared test doubles: an in-memory `ContentService` with scriptable
//! failures, plus small fixture constructors.

use async_trait::async_trait;
use medialist_models::{CollectionEntry, CollectionItem, ContentItem, MediaKind, Status};
use medialist_remote::{ContentService, ItemLookup, RemoteError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

pub fn content_item(api_id: &str, kind: MediaKind, title: &str) -> ContentItem {
    ContentItem {
        api_id: api_id.to_string(),
        kind,
        title: title.to_string(),
        author: None,
        image: None,
        genres: vec![],
        release_date: None,
        rating: None,
    }
}

pub fn collection_item(
    api_id: &str,
    kind: MediaKind,
    title: &str,
    status: Status,
    entry_id: Option<i64>,
) -> CollectionItem {
    CollectionItem::new(content_item(api_id, kind, title), status, entry_id)
}

#[derive(Default)]
pub struct MockService {
    collection: Mutex<Vec<CollectionItem>>,
    lookups: Mutex<HashMap<(String, MediaKind), ItemLookup>>,
    search_results: Mutex<Vec<ContentItem>>,
    calls: Mutex<Vec<String>>,
    last_fetch_user: Mutex<Option<String>>,
    fail_next_fetch: AtomicBool,
    fail_mutations: AtomicBool,
    next_entry_id: AtomicI64,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            next_entry_id: AtomicI64::new(100),
            ..Self::default()
        }
    }

    pub fn set_collection(&self, items: Vec<CollectionItem>) {
        *self.collection.lock().unwrap() = items;
    }

    pub fn set_lookup(&self, api_id: &str, kind: MediaKind, lookup: ItemLookup) {
        self.lookups
            .lock()
            .unwrap()
            .insert((api_id.to_string(), kind), lookup);
    }

    pub fn lookup_without_entry(&self, api_id: &str, kind: MediaKind, title: &str) {
        self.set_lookup(
            api_id,
            kind,
            ItemLookup {
                content: content_item(api_id, kind, title),
                entry: None,
            },
        );
    }

    pub fn lookup_with_entry(
        &self,
        api_id: &str,
        kind: MediaKind,
        title: &str,
        entry_id: i64,
        status: Status,
    ) {
        self.set_lookup(
            api_id,
            kind,
            ItemLookup {
                content: content_item(api_id, kind, title),
                entry: Some(CollectionEntry {
                    entry_id: Some(entry_id),
                    status,
                }),
            },
        );
    }

    pub fn set_search_results(&self, results: Vec<ContentItem>) {
        *self.search_results.lock().unwrap() = results;
    }

    pub fn fail_next_fetch_collection(&self) {
        self.fail_next_fetch.store(true, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    /// Every mutation and probe call, in order, as "verb detail" strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                c.starts_with("create") || c.starts_with("update") || c.starts_with("delete")
            })
            .count()
    }

    pub fn last_fetched_user(&self) -> Option<String> {
        self.last_fetch_user.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_guard(&self) -> Result<(), RemoteError> {
        if self.fail_mutations.load(Ordering::SeqCst) {
            Err(RemoteError::status(500))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentService for MockService {
    async fn fetch_collection(&self, user_id: &str) -> Result<Vec<CollectionItem>, RemoteError> {
        *self.last_fetch_user.lock().unwrap() = Some(user_id.to_string());
        if self.fail_next_fetch.swap(false, Ordering::SeqCst) {
            return Err(RemoteError::status(503));
        }
        Ok(self.collection.lock().unwrap().clone())
    }

    async fn fetch_item(&self, kind: MediaKind, api_id: &str)
        -> Result<ItemLookup, RemoteError> {
        self.record(format!("fetch_item {}/{}", kind, api_id));
        self.lookups
            .lock()
            .unwrap()
            .get(&(api_id.to_string(), kind))
            .cloned()
            .ok_or(RemoteError::status(404))
    }

    async fn create_entry(
        &self,
        api_id: &str,
        kind: MediaKind,
        status: Status,
    ) -> Result<i64, RemoteError> {
        self.record(format!("create {}/{} {}", kind, api_id, status));
        self.mutation_guard()?;
        Ok(self.next_entry_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn update_entry(&self, entry_id: i64, status: Status) -> Result<(), RemoteError> {
        self.record(format!("update {} {}", entry_id, status));
        self.mutation_guard()
    }

    async fn delete_entry(&self, entry_id: i64) -> Result<(), RemoteError> {
        self.record(format!("delete {}", entry_id));
        self.mutation_guard()
    }

    async fn search(
        &self,
        query: &str,
        _kind: Option<MediaKind>,
    ) -> Result<Vec<ContentItem>, RemoteError> {
        self.record(format!("search {}", query));
        Ok(self.search_results.lock().unwrap().clone())
    }
}

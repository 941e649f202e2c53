//! Optimistic status updates with silent rollback.
//!
//! Every status-changing control (a badge, a dropdown, a detail-page widget)
//! gets one [`StatusControl`]. Selection applies the new status to the local
//! display immediately, mirrors it into the collection store, issues the
//! remote mutation, and either confirms it with a broadcast or rolls both
//! local writes back. Controls for the same item mounted elsewhere converge
//! by adopting the broadcast status verbatim.

use medialist_models::{MediaKind, Status, StatusChangeEvent};
use medialist_remote::{ContentService, RemoteError};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tracing::{debug, warn};

use crate::bus::{BusMessage, EventBus, SubscriptionId, Topic};
use crate::store::CollectionStore;

/// How long the transient success indicator stays visible.
pub const SUCCESS_INDICATOR_DURATION: Duration = Duration::from_secs(2);

/// Result of a user selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// No request was issued: the selected status was already current, or
    /// the unmark targeted an item that has no entry to delete.
    Unchanged,
    /// The service confirmed the mutation and the change was broadcast.
    Confirmed,
    /// The service rejected or failed the mutation; local state reverted
    /// to its pre-selection value and nothing was broadcast.
    RolledBack,
}

struct Display {
    status: Status,
    entry_id: Option<i64>,
    success_visible: bool,
}

/// Whether a resolved selection actually reached the service.
enum Mutation {
    /// A verb was issued; carries the entry id left behind (`None` after a
    /// delete).
    Performed(Option<i64>),
    /// Unmark with no existing entry: local no-op, nothing was sent.
    Skipped,
}

type SuccessCallback = Arc<dyn Fn(&StatusChangeEvent) + Send + Sync>;

pub struct StatusControl {
    api_id: String,
    kind: MediaKind,
    service: Arc<dyn ContentService>,
    store: Arc<CollectionStore>,
    bus: EventBus,
    display: Arc<Mutex<Display>>,
    subscription: SubscriptionId,
    on_update_success: Option<SuccessCallback>,
}

impl StatusControl {
    /// Mount a control for one `(api_id, kind)` identity.
    ///
    /// `initial_status`/`entry_id` come from whatever the widget was
    /// rendered with (a collection row, a search result with no entry yet,
    /// an item lookup). The control subscribes to `ContentStateUpdated` so
    /// that confirmed changes made by any other control for the same item
    /// override its local state; unmounting (dropping) unsubscribes.
    pub fn mount(
        bus: &EventBus,
        store: Arc<CollectionStore>,
        service: Arc<dyn ContentService>,
        api_id: impl Into<String>,
        kind: MediaKind,
        initial_status: Status,
        entry_id: Option<i64>,
    ) -> Self {
        let api_id = api_id.into();
        let display = Arc::new(Mutex::new(Display {
            status: initial_status,
            entry_id,
            success_visible: false,
        }));

        let weak: Weak<Mutex<Display>> = Arc::downgrade(&display);
        let event_api_id = api_id.clone();
        let subscription = bus.subscribe(Topic::ContentStateUpdated, move |msg| {
            let BusMessage::StatusChange(ev) = msg else {
                return;
            };
            // Each topic carries events for every item; filter by identity
            // before acting.
            if !ev.is_for(&event_api_id, kind) {
                return;
            }
            if let Some(display) = weak.upgrade() {
                let mut d = display.lock().expect("display lock poisoned");
                d.status = ev.status;
                if ev.status == Status::None {
                    d.entry_id = None;
                }
            }
        });

        Self {
            api_id,
            kind,
            service,
            store,
            bus: bus.clone(),
            display,
            subscription,
            on_update_success: None,
        }
    }

    /// Register a callback invoked once per confirmed update.
    pub fn on_update_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(&StatusChangeEvent) + Send + Sync + 'static,
    {
        self.on_update_success = Some(Arc::new(callback));
        self
    }

    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Currently displayed status (confirmed, or optimistic while a request
    /// is in flight).
    pub fn status(&self) -> Status {
        self.display.lock().expect("display lock poisoned").status
    }

    pub fn entry_id(&self) -> Option<i64> {
        self.display.lock().expect("display lock poisoned").entry_id
    }

    pub fn success_visible(&self) -> bool {
        self.display
            .lock()
            .expect("display lock poisoned")
            .success_visible
    }

    /// Handle the user selecting `new_status`.
    ///
    /// Selecting the current status closes the selector without a request.
    /// Otherwise the display and the store are patched optimistically, the
    /// mutation is issued, and failure reverts both without broadcasting -
    /// other widgets still hold the old, still-correct value.
    pub async fn select(&self, new_status: Status) -> SelectOutcome {
        let (previous, known_entry) = {
            let mut d = self.display.lock().expect("display lock poisoned");
            if d.status == new_status {
                return SelectOutcome::Unchanged;
            }
            let previous = d.status;
            d.status = new_status;
            (previous, d.entry_id)
        };
        self.store
            .apply_local_patch(&self.api_id, self.kind, new_status);

        match self.issue_mutation(new_status, known_entry).await {
            // Unmarking an item that never had an entry: the service holds
            // nothing to delete, so there is nothing to confirm or flash and
            // other widgets have nothing to adopt.
            Ok(Mutation::Skipped) => {
                let mut d = self.display.lock().expect("display lock poisoned");
                d.entry_id = None;
                SelectOutcome::Unchanged
            }
            Ok(Mutation::Performed(entry_after)) => {
                {
                    let mut d = self.display.lock().expect("display lock poisoned");
                    d.entry_id = entry_after;
                    d.success_visible = true;
                }
                self.spawn_success_clear();

                let event = StatusChangeEvent::new(self.api_id.clone(), self.kind, new_status);
                self.bus.publish(
                    Topic::ContentStateUpdated,
                    BusMessage::StatusChange(event.clone()),
                );
                if let Some(callback) = &self.on_update_success {
                    callback(&event);
                }
                SelectOutcome::Confirmed
            }
            Err(e) => {
                warn!(
                    "Status update for {}/{} failed, rolling back to {}: {}",
                    self.kind, self.api_id, previous, e
                );
                {
                    let mut d = self.display.lock().expect("display lock poisoned");
                    d.status = previous;
                }
                self.store
                    .apply_local_patch(&self.api_id, self.kind, previous);
                SelectOutcome::RolledBack
            }
        }
    }

    /// Resolve the create/update/delete decision and issue the mutation.
    ///
    /// The service keys mutations on the entry id, so a control that does
    /// not know whether an entry exists probes first. The probe-then-mutate
    /// sequence is not atomic from this side.
    async fn issue_mutation(
        &self,
        new_status: Status,
        known_entry: Option<i64>,
    ) -> Result<Mutation, RemoteError> {
        let entry_id = match known_entry {
            Some(id) => Some(id),
            None => match self.store.entry_id(&self.api_id, self.kind) {
                Some(id) => Some(id),
                None => {
                    debug!("Probing entry for {}/{}", self.kind, self.api_id);
                    let lookup = self.service.fetch_item(self.kind, &self.api_id).await?;
                    lookup.entry.and_then(|entry| entry.entry_id)
                }
            },
        };

        match (entry_id, new_status) {
            (Some(id), Status::None) => {
                self.service.delete_entry(id).await?;
                Ok(Mutation::Performed(None))
            }
            (None, Status::None) => Ok(Mutation::Skipped),
            (Some(id), status) => {
                self.service.update_entry(id, status).await?;
                Ok(Mutation::Performed(Some(id)))
            }
            (None, status) => {
                let id = self
                    .service
                    .create_entry(&self.api_id, self.kind, status)
                    .await?;
                Ok(Mutation::Performed(Some(id)))
            }
        }
    }

    fn spawn_success_clear(&self) {
        let weak = Arc::downgrade(&self.display);
        tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_INDICATOR_DURATION).await;
            // The widget may have unmounted while the timer was pending;
            // in that case there is nothing left to clear.
            if let Some(display) = weak.upgrade() {
                display.lock().expect("display lock poisoned").success_visible = false;
            }
        });
    }
}

impl Drop for StatusControl {
    fn drop(&mut self) {
        self.bus
            .unsubscribe(Topic::ContentStateUpdated, self.subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{collection_item, MockService};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mounted(
        bus: &EventBus,
        service: &Arc<MockService>,
        store: &Arc<CollectionStore>,
        api_id: &str,
        status: Status,
        entry_id: Option<i64>,
    ) -> StatusControl {
        StatusControl::mount(
            bus,
            Arc::clone(store),
            service.clone() as Arc<dyn ContentService>,
            api_id,
            MediaKind::Movie,
            status,
            entry_id,
        )
    }

    fn empty_store(service: &Arc<MockService>) -> Arc<CollectionStore> {
        Arc::new(CollectionStore::new(
            service.clone() as Arc<dyn ContentService>
        ))
    }

    #[tokio::test]
    async fn test_selecting_current_status_is_a_noop() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1));

        let outcome = control.select(Status::Pending).await;

        assert_eq!(outcome, SelectOutcome::Unchanged);
        assert_eq!(control.status(), Status::Pending);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_rolls_back_and_publishes_nothing() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        service.set_collection(vec![collection_item(
            "tt1",
            MediaKind::Movie,
            "Alien",
            Status::Pending,
            Some(1),
        )]);
        let store = empty_store(&service);
        store.load("user-1").await;
        service.fail_mutations(true);

        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = Arc::clone(&events);
        bus.subscribe(Topic::ContentStateUpdated, move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        });

        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1));
        let outcome = control.select(Status::Completed).await;

        assert_eq!(outcome, SelectOutcome::RolledBack);
        assert_eq!(control.status(), Status::Pending);
        assert_eq!(store.snapshot()[0].status, Status::Pending);
        assert_eq!(events.load(Ordering::SeqCst), 0);
        assert!(!control.success_visible());
    }

    #[tokio::test]
    async fn test_two_widgets_converge_without_second_request() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let widget_a = mounted(&bus, &service, &store, "tt123", Status::None, None);
        let widget_b = mounted(&bus, &service, &store, "tt123", Status::None, None);
        service.lookup_without_entry("tt123", MediaKind::Movie, "Arrival");

        let outcome = widget_a.select(Status::Completed).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(widget_b.status(), Status::Completed);
        // one probe plus one create, nothing issued by widget B
        assert_eq!(service.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_events_for_other_items_are_ignored() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1));

        bus.publish(
            Topic::ContentStateUpdated,
            BusMessage::StatusChange(StatusChangeEvent::new(
                "tt2",
                MediaKind::Movie,
                Status::Completed,
            )),
        );
        bus.publish(
            Topic::ContentStateUpdated,
            BusMessage::StatusChange(StatusChangeEvent::new(
                "tt1",
                MediaKind::Series,
                Status::Abandoned,
            )),
        );

        assert_eq!(control.status(), Status::Pending);
    }

    #[tokio::test]
    async fn test_create_path_probes_then_creates() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        service.lookup_without_entry("tt9", MediaKind::Movie, "Heat");

        let control = mounted(&bus, &service, &store, "tt9", Status::None, None);
        let outcome = control.select(Status::Pending).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(
            service.calls(),
            vec!["fetch_item movie/tt9", "create movie/tt9 pending"]
        );
        assert!(control.entry_id().is_some());
    }

    #[tokio::test]
    async fn test_update_path_skips_probe_when_entry_known() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(7));
        let outcome = control.select(Status::Completed).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(service.calls(), vec!["update 7 completed"]);
    }

    #[tokio::test]
    async fn test_probe_finds_existing_entry_and_updates() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        service.lookup_with_entry("tt5", MediaKind::Movie, "Ran", 33, Status::Pending);

        // a search card that rendered without entry knowledge
        let control = mounted(&bus, &service, &store, "tt5", Status::Pending, None);
        let outcome = control.select(Status::Abandoned).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(
            service.calls(),
            vec!["fetch_item movie/tt5", "update 33 abandoned"]
        );
    }

    #[tokio::test]
    async fn test_unmark_deletes_entry() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        service.set_collection(vec![collection_item(
            "tt1",
            MediaKind::Movie,
            "Alien",
            Status::Completed,
            Some(4),
        )]);
        let store = empty_store(&service);
        store.load("user-1").await;

        let control = mounted(&bus, &service, &store, "tt1", Status::Completed, Some(4));
        let outcome = control.select(Status::None).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(service.calls(), vec!["delete 4"]);
        assert_eq!(control.entry_id(), None);
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_unmark_without_entry_is_quiet_local_noop() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        service.lookup_without_entry("tt8", MediaKind::Movie, "Solaris");

        let events = Arc::new(AtomicUsize::new(0));
        let events_clone = Arc::clone(&events);
        bus.subscribe(Topic::ContentStateUpdated, move |_| {
            events_clone.fetch_add(1, Ordering::SeqCst);
        });

        // a widget rendered with a stale marked status for an item the
        // service has no entry for
        let control = mounted(&bus, &service, &store, "tt8", Status::Pending, None);
        let outcome = control.select(Status::None).await;

        assert_eq!(outcome, SelectOutcome::Unchanged);
        assert_eq!(control.status(), Status::None);
        assert_eq!(control.entry_id(), None);
        // probed, but no mutation, no broadcast, no success flash
        assert_eq!(service.calls(), vec!["fetch_item movie/tt8"]);
        assert_eq!(service.mutation_count(), 0);
        assert_eq!(events.load(Ordering::SeqCst), 0);
        assert!(!control.success_visible());
    }

    #[tokio::test]
    async fn test_search_result_card_marks_item() {
        // a card rendered from a search hit knows nothing about entries
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);
        service.set_search_results(vec![crate::testing::content_item(
            "tt10",
            MediaKind::Movie,
            "Stalker",
        )]);
        service.lookup_without_entry("tt10", MediaKind::Movie, "Stalker");

        let hits = service.search("stalker", None).await.unwrap();
        assert_eq!(hits.len(), 1);

        let control = mounted(&bus, &service, &store, &hits[0].api_id, Status::None, None);
        let outcome = control.select(Status::Pending).await;

        assert_eq!(outcome, SelectOutcome::Confirmed);
        assert_eq!(
            service.calls(),
            vec![
                "search stalker",
                "fetch_item movie/tt10",
                "create movie/tt10 pending"
            ]
        );
    }

    #[tokio::test]
    async fn test_unmounted_control_stops_listening() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1));
        assert_eq!(bus.subscriber_count(Topic::ContentStateUpdated), 1);

        drop(control);
        assert_eq!(bus.subscriber_count(Topic::ContentStateUpdated), 0);
        // publishing afterwards must not blow up
        bus.publish(
            Topic::ContentStateUpdated,
            BusMessage::StatusChange(StatusChangeEvent::new(
                "tt1",
                MediaKind::Movie,
                Status::Completed,
            )),
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_indicator_clears_after_delay() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1));
        control.select(Status::Completed).await;
        assert!(control.success_visible());

        tokio::time::sleep(SUCCESS_INDICATOR_DURATION + Duration::from_millis(100)).await;
        assert!(!control.success_visible());
    }

    #[tokio::test]
    async fn test_success_callback_invoked_once() {
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let invoked = Arc::new(AtomicUsize::new(0));
        let invoked_clone = Arc::clone(&invoked);
        let control = mounted(&bus, &service, &store, "tt1", Status::Pending, Some(1))
            .on_update_success(move |ev| {
                assert_eq!(ev.status, Status::Completed);
                invoked_clone.fetch_add(1, Ordering::SeqCst);
            });

        control.select(Status::Completed).await;
        assert_eq!(invoked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_last_broadcast_wins_across_controls() {
        // no version check: every control adopts whatever lands last
        let bus = EventBus::new();
        let service = Arc::new(MockService::new());
        let store = empty_store(&service);

        let controls: Vec<_> = (0..4)
            .map(|_| mounted(&bus, &service, &store, "tt1", Status::None, Some(9)))
            .collect();

        controls[0].select(Status::Pending).await;
        controls[1].select(Status::Completed).await;
        controls[2].select(Status::Abandoned).await;

        for control in &controls {
            assert_eq!(control.status(), Status::Abandoned);
        }
    }
}

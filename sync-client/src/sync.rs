use crate::error::Error;
use crate::mirror::{Mirror, ResourceKind};
use log::*;
use serde_json::Value;

/// Reconciliation state for one resource kind.
///
/// `Uninitialized → Syncing` on mount, `Syncing → Live` on a successful bulk
/// fetch, `Live → Syncing` on connection loss. There is no terminal state;
/// every reconnect re-enters `Syncing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Uninitialized,
    Syncing,
    Live,
}

#[derive(Debug)]
struct CollectionSync {
    state: SyncState,
    mirror: Mirror,
    last_error: Option<Error>,
}

impl CollectionSync {
    fn new(kind: ResourceKind) -> Self {
        Self {
            state: SyncState::Uninitialized,
            mirror: Mirror::new(kind),
            last_error: None,
        }
    }
}

/// The per-session reconciliation state machine: one mirror and sync state
/// per resource kind, fed by bulk fetch results and broadcast events.
///
/// Events may arrive while a fetch is in flight; applying them early is safe
/// because a completing fetch replaces the mirror wholesale.
#[derive(Debug)]
pub struct SyncEngine {
    announcements: CollectionSync,
    campus_events: CollectionSync,
    timetable_entries: CollectionSync,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self {
            announcements: CollectionSync::new(ResourceKind::Announcement),
            campus_events: CollectionSync::new(ResourceKind::CampusEvent),
            timetable_entries: CollectionSync::new(ResourceKind::TimetableEntry),
        }
    }

    fn collection(&self, kind: ResourceKind) -> &CollectionSync {
        match kind {
            ResourceKind::Announcement => &self.announcements,
            ResourceKind::CampusEvent => &self.campus_events,
            ResourceKind::TimetableEntry => &self.timetable_entries,
        }
    }

    fn collection_mut(&mut self, kind: ResourceKind) -> &mut CollectionSync {
        match kind {
            ResourceKind::Announcement => &mut self.announcements,
            ResourceKind::CampusEvent => &mut self.campus_events,
            ResourceKind::TimetableEntry => &mut self.timetable_entries,
        }
    }

    pub fn state(&self, kind: ResourceKind) -> SyncState {
        self.collection(kind).state
    }

    pub fn mirror(&self, kind: ResourceKind) -> &[Value] {
        self.collection(kind).mirror.docs()
    }

    /// The most recent fetch error for a kind, retained until the next
    /// successful fetch. Retry is caller-driven.
    pub fn last_error(&self, kind: ResourceKind) -> Option<&Error> {
        self.collection(kind).last_error.as_ref()
    }

    /// Enter `Syncing` ahead of a bulk fetch.
    pub fn begin_sync(&mut self, kind: ResourceKind) {
        self.collection_mut(kind).state = SyncState::Syncing;
    }

    /// A bulk fetch completed: discard the stale mirror, adopt the fetched
    /// collection, go `Live`.
    pub fn complete_sync(&mut self, kind: ResourceKind, docs: Vec<Value>) {
        let collection = self.collection_mut(kind);
        collection.mirror.replace_all(docs);
        collection.last_error = None;
        collection.state = SyncState::Live;
        debug!("{kind:?} sync complete, {} documents", collection.mirror.len());
    }

    /// A bulk fetch failed: stay in `Syncing` and retain the error for the
    /// presentation layer.
    pub fn fail_sync(&mut self, kind: ResourceKind, error: Error) {
        let collection = self.collection_mut(kind);
        collection.state = SyncState::Syncing;
        collection.last_error = Some(error);
    }

    /// The transport dropped: every `Live` kind must resync, since there is
    /// no way to know what was missed while disconnected.
    pub fn connection_lost(&mut self) {
        for kind in ResourceKind::all() {
            let collection = self.collection_mut(kind);
            if collection.state == SyncState::Live {
                collection.state = SyncState::Syncing;
            }
        }
    }

    /// Apply one broadcast event, identified by its SSE event name, with the
    /// decoded wire envelope (`{"type": ..., "data": {...}}`).
    ///
    /// Malformed events (unknown name, missing payload, missing id) are
    /// dropped with a diagnostic log and never touch any mirror.
    pub fn apply(&mut self, event_type: &str, envelope: &Value) {
        let Some(data) = envelope.get("data") else {
            warn!("Dropping {event_type} event without a data field");
            return;
        };

        match event_type {
            "announcement_created" | "announcement_updated" => {
                self.apply_upsert(ResourceKind::Announcement, data, "announcement", event_type)
            }
            "announcement_deleted" => {
                self.apply_delete(ResourceKind::Announcement, data, "announcement_id", event_type)
            }
            "event_created" | "event_updated" => {
                self.apply_upsert(ResourceKind::CampusEvent, data, "event", event_type)
            }
            "event_deleted" => {
                self.apply_delete(ResourceKind::CampusEvent, data, "event_id", event_type)
            }
            "timetable_entry_created" | "timetable_entry_updated" => {
                self.apply_upsert(ResourceKind::TimetableEntry, data, "entry", event_type)
            }
            "timetable_entry_deleted" => {
                self.apply_delete(ResourceKind::TimetableEntry, data, "entry_id", event_type)
            }
            unknown => {
                warn!("Dropping event with unknown type: {unknown}");
            }
        }
    }

    fn apply_upsert(&mut self, kind: ResourceKind, data: &Value, field: &str, event_type: &str) {
        let Some(doc) = data.get(field).filter(|doc| doc.is_object()) else {
            warn!("Dropping {event_type} event without a {field} payload");
            return;
        };
        if crate::mirror::doc_id(doc).is_none() {
            warn!("Dropping {event_type} event whose payload has no id");
            return;
        }
        self.collection_mut(kind).mirror.upsert(doc.clone());
    }

    fn apply_delete(&mut self, kind: ResourceKind, data: &Value, field: &str, event_type: &str) {
        let Some(id) = data.get(field).and_then(Value::as_str) else {
            warn!("Dropping {event_type} event without a {field}");
            return;
        };
        self.collection_mut(kind).mirror.remove(id);
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mirror_ids(engine: &SyncEngine, kind: ResourceKind) -> Vec<String> {
        engine
            .mirror(kind)
            .iter()
            .filter_map(|doc| doc["id"].as_str().map(str::to_owned))
            .collect()
    }

    fn created(field: &str, doc: Value) -> Value {
        json!({"type": "ignored", "data": {field: doc}})
    }

    #[test]
    fn kinds_start_uninitialized_and_go_live_after_a_fetch() {
        let mut engine = SyncEngine::new();
        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Uninitialized);

        engine.begin_sync(ResourceKind::Announcement);
        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Syncing);

        engine.complete_sync(
            ResourceKind::Announcement,
            vec![json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"})],
        );
        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Live);
        assert_eq!(mirror_ids(&engine, ResourceKind::Announcement), vec!["a1"]);
    }

    #[test]
    fn fetch_failure_stays_syncing_with_a_retrievable_error() {
        let mut engine = SyncEngine::new();
        engine.begin_sync(ResourceKind::CampusEvent);
        engine.fail_sync(
            ResourceKind::CampusEvent,
            Error::Fetch("503 Service Unavailable".to_string()),
        );

        assert_eq!(engine.state(ResourceKind::CampusEvent), SyncState::Syncing);
        assert!(engine.last_error(ResourceKind::CampusEvent).is_some());

        // A later successful fetch clears the error.
        engine.complete_sync(ResourceKind::CampusEvent, vec![]);
        assert!(engine.last_error(ResourceKind::CampusEvent).is_none());
    }

    #[test]
    fn connection_loss_returns_only_live_kinds_to_syncing() {
        let mut engine = SyncEngine::new();
        engine.begin_sync(ResourceKind::Announcement);
        engine.complete_sync(ResourceKind::Announcement, vec![]);

        engine.connection_lost();

        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Syncing);
        assert_eq!(
            engine.state(ResourceKind::TimetableEntry),
            SyncState::Uninitialized
        );
    }

    #[test]
    fn deleting_an_absent_id_is_idempotent() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(
            ResourceKind::Announcement,
            vec![json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"})],
        );

        engine.apply(
            "announcement_deleted",
            &json!({"type": "announcement_deleted", "data": {"announcement_id": "never-seen"}}),
        );

        assert_eq!(mirror_ids(&engine, ResourceKind::Announcement), vec!["a1"]);
    }

    #[test]
    fn update_for_an_unknown_id_inserts_as_if_created() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(ResourceKind::Announcement, vec![]);

        engine.apply(
            "announcement_updated",
            &created(
                "announcement",
                json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}),
            ),
        );

        assert_eq!(mirror_ids(&engine, ResourceKind::Announcement), vec!["a1"]);
    }

    #[test]
    fn duplicate_create_results_in_exactly_one_entry() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(ResourceKind::Announcement, vec![]);

        let doc = json!({"id": "a1", "title": "first", "created_at": "2025-01-01T09:00:00Z"});
        engine.apply("announcement_created", &created("announcement", doc));
        let doc = json!({"id": "a1", "title": "second", "created_at": "2025-01-01T09:00:00Z"});
        engine.apply("announcement_created", &created("announcement", doc));

        let mirror = engine.mirror(ResourceKind::Announcement);
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror[0]["title"], "second");
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(ResourceKind::Announcement, vec![]);

        engine.apply(
            "announcement_created",
            &created(
                "announcement",
                json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}),
            ),
        );
        engine.apply(
            "announcement_deleted",
            &json!({"type": "announcement_deleted", "data": {"announcement_id": "a1"}}),
        );

        // The delete observed the create's effect; had it applied first the
        // mirror would still hold a1.
        assert!(engine.mirror(ResourceKind::Announcement).is_empty());
    }

    #[test]
    fn malformed_events_are_dropped_without_corrupting_any_mirror() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(
            ResourceKind::Announcement,
            vec![json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"})],
        );
        engine.complete_sync(
            ResourceKind::CampusEvent,
            vec![json!({"id": "e1", "start_date": "2025-04-01T18:00:00Z"})],
        );

        // Unknown event name.
        engine.apply("poster_created", &json!({"type": "poster_created", "data": {}}));
        // Missing data field.
        engine.apply("announcement_created", &json!({"type": "announcement_created"}));
        // Non-object payload.
        engine.apply(
            "announcement_created",
            &json!({"type": "announcement_created", "data": {"announcement": 42}}),
        );
        // Payload without an id.
        engine.apply(
            "event_created",
            &created("event", json!({"title": "no id here"})),
        );

        assert_eq!(mirror_ids(&engine, ResourceKind::Announcement), vec!["a1"]);
        assert_eq!(mirror_ids(&engine, ResourceKind::CampusEvent), vec!["e1"]);
        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Live);
    }

    #[test]
    fn resync_replaces_the_mirror_with_the_fetched_state_exactly() {
        let mut engine = SyncEngine::new();
        engine.complete_sync(
            ResourceKind::Announcement,
            vec![
                json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}),
                json!({"id": "a2", "created_at": "2025-02-01T09:00:00Z"}),
            ],
        );

        // Events missed during an outage never reach the engine; the refetch
        // alone must converge the mirror (a1 deleted, a3 created server-side).
        engine.connection_lost();
        engine.begin_sync(ResourceKind::Announcement);
        engine.complete_sync(
            ResourceKind::Announcement,
            vec![
                json!({"id": "a2", "created_at": "2025-02-01T09:00:00Z"}),
                json!({"id": "a3", "created_at": "2025-03-01T09:00:00Z"}),
            ],
        );

        assert_eq!(
            mirror_ids(&engine, ResourceKind::Announcement),
            vec!["a3", "a2"]
        );
        assert_eq!(engine.state(ResourceKind::Announcement), SyncState::Live);
    }

    // Walks a full session: initial fetch, create, delete, reorder-exercising
    // update, then a drop-and-refetch.
    #[test]
    fn full_session_walkthrough() {
        let mut engine = SyncEngine::new();
        let kind = ResourceKind::Announcement;

        engine.begin_sync(kind);
        engine.complete_sync(kind, vec![json!({"id": "1", "created_at": "2025-01-01T09:00:00Z"})]);
        assert_eq!(engine.state(kind), SyncState::Live);
        assert_eq!(mirror_ids(&engine, kind), vec!["1"]);

        engine.apply(
            "announcement_created",
            &created("announcement", json!({"id": "2", "created_at": "2025-01-02T09:00:00Z"})),
        );
        assert_eq!(mirror_ids(&engine, kind), vec!["2", "1"]);

        engine.apply(
            "announcement_deleted",
            &json!({"type": "announcement_deleted", "data": {"announcement_id": "1"}}),
        );
        assert_eq!(mirror_ids(&engine, kind), vec!["2"]);

        // Ordering key change on the sole remaining document.
        engine.apply(
            "announcement_updated",
            &created("announcement", json!({"id": "2", "created_at": "2025-01-03T09:00:00Z"})),
        );
        assert_eq!(mirror_ids(&engine, kind), vec!["2"]);

        engine.connection_lost();
        assert_eq!(engine.state(kind), SyncState::Syncing);
        engine.complete_sync(kind, vec![json!({"id": "2", "created_at": "2025-01-03T09:00:00Z"})]);
        assert_eq!(mirror_ids(&engine, kind), vec!["2"]);
        assert_eq!(engine.state(kind), SyncState::Live);
    }
}

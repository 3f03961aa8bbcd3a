use crate::connection::{ConnectionManager, Signal};
use crate::fetch::BulkFetch;
use crate::mirror::ResourceKind;
use crate::sync::SyncEngine;
use log::*;
use serde_json::Value;

/// Transport status as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One browser session's synchronization driver: consumes transport signals,
/// runs bulk fetches through the [`BulkFetch`] boundary, and feeds the
/// reconciliation engine. The mirrors are owned here exclusively; nothing is
/// shared across sessions.
///
/// Dropping the session cancels any in-flight fetch, so a fetch that would
/// have resolved after teardown is discarded with it.
pub struct Session<F: BulkFetch> {
    engine: SyncEngine,
    fetcher: F,
    connection_state: ConnectionState,
}

impl<F: BulkFetch> Session<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            engine: SyncEngine::new(),
            fetcher,
            connection_state: ConnectionState::Disconnected,
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn mirror(&self, kind: ResourceKind) -> &[Value] {
        self.engine.mirror(kind)
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Resync one kind: enter `Syncing`, fetch, and either go `Live` or stay
    /// `Syncing` with the error retained. Also the manual-retry entry point
    /// after a fetch failure.
    pub async fn resync(&mut self, kind: ResourceKind) {
        self.engine.begin_sync(kind);
        match self.fetcher.fetch_collection(kind).await {
            Ok(docs) => self.engine.complete_sync(kind, docs),
            Err(e) => {
                warn!("Bulk fetch for {kind:?} failed: {e}");
                self.engine.fail_sync(kind, e);
            }
        }
    }

    pub async fn resync_all(&mut self) {
        for kind in ResourceKind::all() {
            self.resync(kind).await;
        }
    }

    /// Apply one transport signal. Every `Up` forces a full resync, however
    /// brief the preceding outage, since the event stream is not replayed.
    pub async fn process_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Up => {
                self.connection_state = ConnectionState::Connected;
                self.resync_all().await;
            }
            Signal::Event { event_type, data } => {
                self.engine.apply(&event_type, &data);
            }
            Signal::Down => {
                debug!("Transport dropped, mirrors back to syncing");
                self.connection_state = ConnectionState::Connecting;
                self.engine.connection_lost();
            }
        }
    }

    /// Drive the session from a live transport until it is torn down.
    pub async fn run(&mut self, connection: &mut ConnectionManager) {
        while let Some(signal) = connection.next_signal().await {
            self.process_signal(signal).await;
        }
        self.connection_state = ConnectionState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sync::SyncState;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a programmable snapshot per kind, or fails every fetch when
    /// `failing` is set.
    struct StubFetch {
        announcements: Mutex<Vec<Value>>,
        failing: AtomicBool,
        fetches: AtomicUsize,
    }

    impl StubFetch {
        fn new(announcements: Vec<Value>) -> Self {
            Self {
                announcements: Mutex::new(announcements),
                failing: AtomicBool::new(false),
                fetches: AtomicUsize::new(0),
            }
        }

        fn set_announcements(&self, docs: Vec<Value>) {
            *self.announcements.lock().unwrap() = docs;
        }
    }

    #[async_trait]
    impl BulkFetch for &StubFetch {
        async fn fetch_collection(&self, kind: ResourceKind) -> Result<Vec<Value>, Error> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(Error::Fetch("stubbed outage".to_string()));
            }
            match kind {
                ResourceKind::Announcement => Ok(self.announcements.lock().unwrap().clone()),
                _ => Ok(vec![]),
            }
        }
    }

    fn announcement_ids(session: &Session<&StubFetch>) -> Vec<String> {
        session
            .mirror(ResourceKind::Announcement)
            .iter()
            .filter_map(|doc| doc["id"].as_str().map(str::to_owned))
            .collect()
    }

    #[tokio::test]
    async fn connect_signal_syncs_every_kind_to_live() {
        let stub = StubFetch::new(vec![json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"})]);
        let mut session = Session::new(&stub);

        session.process_signal(Signal::Up).await;

        assert_eq!(session.connection_state(), ConnectionState::Connected);
        for kind in ResourceKind::all() {
            assert_eq!(session.engine().state(kind), SyncState::Live);
        }
        assert_eq!(announcement_ids(&session), vec!["a1"]);
    }

    #[tokio::test]
    async fn fetch_failure_is_retained_until_a_manual_retry_succeeds() {
        let stub = StubFetch::new(vec![json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"})]);
        stub.failing.store(true, Ordering::SeqCst);
        let mut session = Session::new(&stub);

        session.process_signal(Signal::Up).await;

        assert_eq!(
            session.engine().state(ResourceKind::Announcement),
            SyncState::Syncing
        );
        assert!(session
            .engine()
            .last_error(ResourceKind::Announcement)
            .is_some());

        // The caller decides when to retry.
        stub.failing.store(false, Ordering::SeqCst);
        session.resync(ResourceKind::Announcement).await;

        assert_eq!(
            session.engine().state(ResourceKind::Announcement),
            SyncState::Live
        );
        assert!(session
            .engine()
            .last_error(ResourceKind::Announcement)
            .is_none());
    }

    #[tokio::test]
    async fn events_flow_into_the_mirror_while_connected() {
        let stub = StubFetch::new(vec![]);
        let mut session = Session::new(&stub);
        session.process_signal(Signal::Up).await;

        session
            .process_signal(Signal::Event {
                event_type: "announcement_created".to_string(),
                data: json!({
                    "type": "announcement_created",
                    "data": {"announcement": {"id": "a1", "created_at": "2025-01-01T09:00:00Z"}}
                }),
            })
            .await;

        assert_eq!(announcement_ids(&session), vec!["a1"]);
    }

    #[tokio::test]
    async fn reconnect_refetches_and_converges_on_the_server_state() {
        let stub = StubFetch::new(vec![
            json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}),
            json!({"id": "a2", "created_at": "2025-02-01T09:00:00Z"}),
        ]);
        let mut session = Session::new(&stub);
        session.process_signal(Signal::Up).await;
        assert_eq!(announcement_ids(&session), vec!["a2", "a1"]);

        // While the session is down the server deletes a1 and creates a3;
        // those events are never delivered.
        session.process_signal(Signal::Down).await;
        assert_eq!(session.connection_state(), ConnectionState::Connecting);
        stub.set_announcements(vec![
            json!({"id": "a2", "created_at": "2025-02-01T09:00:00Z"}),
            json!({"id": "a3", "created_at": "2025-03-01T09:00:00Z"}),
        ]);

        session.process_signal(Signal::Up).await;

        assert_eq!(announcement_ids(&session), vec!["a3", "a2"]);
        assert_eq!(
            session.engine().state(ResourceKind::Announcement),
            SyncState::Live
        );
    }

    #[tokio::test]
    async fn every_reconnect_forces_a_refetch_even_after_a_brief_drop() {
        let stub = StubFetch::new(vec![]);
        let mut session = Session::new(&stub);

        session.process_signal(Signal::Up).await;
        let after_first = stub.fetches.load(Ordering::SeqCst);

        session.process_signal(Signal::Down).await;
        session.process_signal(Signal::Up).await;

        assert_eq!(stub.fetches.load(Ordering::SeqCst), after_first * 2);
    }
}

use crate::connection::{ConnectionId, ConnectionRegistry};
use crate::message::{Event as BoardEvent, EventType};
use axum::response::sse::Event;
use log::*;
use std::convert::Infallible;
use std::sync::Arc;

/// Publish point for mutation notifications. Constructed once at process
/// start and passed by handle to the web layer and the domain event handler;
/// never looked up from ambient state.
pub struct Manager {
    registry: Arc<ConnectionRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }

    /// Register a new session and return its unique ID
    pub fn register_connection(
        &self,
        sender: tokio::sync::mpsc::UnboundedSender<Result<Event, Infallible>>,
    ) -> ConnectionId {
        let connection_id = self.registry.register(sender);
        info!(
            "Registered new SSE connection ({} active)",
            self.registry.len()
        );
        connection_id
    }

    /// Unregister a session by ID
    pub fn unregister_connection(&self, connection_id: &ConnectionId) {
        info!("Unregistering SSE connection");
        self.registry.unregister(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Broadcast a board event to every connected session. Fire-and-forget:
    /// serialization or transport problems are logged, never returned, so a
    /// mutation handler cannot fail because of the notification path.
    pub fn broadcast(&self, board_event: BoardEvent) {
        let event_type = board_event.event_type();

        let event_data = match serde_json::to_string(&board_event) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                return;
            }
        };

        let event = Event::default().event(event_type).data(event_data);
        self.registry.broadcast(event);
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Event as BoardEvent;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn broadcast_reaches_every_registered_connection() {
        let manager = Manager::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();

        manager.register_connection(tx_a);
        manager.register_connection(tx_b);

        manager.broadcast(BoardEvent::AnnouncementCreated {
            announcement: json!({"id": "a1", "title": "hello"}),
        });

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn unregistered_connection_receives_nothing() {
        let manager = Manager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let connection_id = manager.register_connection(tx);
        manager.unregister_connection(&connection_id);
        assert_eq!(manager.connection_count(), 0);

        manager.broadcast(BoardEvent::AnnouncementDeleted {
            announcement_id: "a1".to_string(),
        });

        // The sender was dropped with the registry entry.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn broadcast_survives_a_dropped_receiver() {
        let manager = Manager::new();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let (tx_live, mut rx_live) = mpsc::unbounded_channel();

        manager.register_connection(tx_dead);
        manager.register_connection(tx_live);
        drop(rx_dead);

        // The dead session's failure is swallowed; the live one still gets it.
        manager.broadcast(BoardEvent::EventDeleted {
            event_id: "e1".to_string(),
        });

        assert!(rx_live.recv().await.is_some());
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order_per_connection() {
        let manager = Manager::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.register_connection(tx);

        manager.broadcast(BoardEvent::AnnouncementCreated {
            announcement: json!({"id": "a1"}),
        });
        manager.broadcast(BoardEvent::AnnouncementDeleted {
            announcement_id: "a1".to_string(),
        });

        // axum's Event has no public accessors beyond Debug, so assert on the
        // serialized form.
        let first = format!("{:?}", rx.recv().await.unwrap().unwrap());
        let second = format!("{:?}", rx.recv().await.unwrap().unwrap());
        assert!(first.contains("announcement_created"));
        assert!(second.contains("announcement_deleted"));
    }
}

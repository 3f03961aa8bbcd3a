use crate::message::Event as BoardEvent;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use std::sync::Arc;

/// Handles domain events by converting them to SSE wire events and
/// broadcasting them to every connected session.
///
/// The mutation handlers publish a `DomainEvent` exactly once per successful
/// store write; this handler is the transport end of that contract. All
/// noticeboard events are broadcast, so no routing decisions happen here.
pub struct BroadcastEventHandler {
    sse_manager: Arc<Manager>,
}

impl BroadcastEventHandler {
    pub fn new(sse_manager: Arc<Manager>) -> Self {
        Self { sse_manager }
    }
}

#[async_trait]
impl EventHandler for BroadcastEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        let board_event = match event {
            DomainEvent::AnnouncementCreated { announcement } => {
                debug!("Broadcasting announcement_created");
                BoardEvent::AnnouncementCreated {
                    announcement: announcement.clone(),
                }
            }
            DomainEvent::AnnouncementUpdated { announcement } => {
                debug!("Broadcasting announcement_updated");
                BoardEvent::AnnouncementUpdated {
                    announcement: announcement.clone(),
                }
            }
            DomainEvent::AnnouncementDeleted { announcement_id } => {
                debug!("Broadcasting announcement_deleted for {announcement_id}");
                BoardEvent::AnnouncementDeleted {
                    announcement_id: announcement_id.to_string(),
                }
            }
            DomainEvent::CampusEventCreated { event } => {
                debug!("Broadcasting event_created");
                BoardEvent::EventCreated {
                    event: event.clone(),
                }
            }
            DomainEvent::CampusEventUpdated { event } => {
                debug!("Broadcasting event_updated");
                BoardEvent::EventUpdated {
                    event: event.clone(),
                }
            }
            DomainEvent::CampusEventDeleted { event_id } => {
                debug!("Broadcasting event_deleted for {event_id}");
                BoardEvent::EventDeleted {
                    event_id: event_id.to_string(),
                }
            }
            DomainEvent::TimetableEntryCreated { entry } => {
                debug!("Broadcasting timetable_entry_created");
                BoardEvent::TimetableEntryCreated {
                    entry: entry.clone(),
                }
            }
            DomainEvent::TimetableEntryUpdated { entry } => {
                debug!("Broadcasting timetable_entry_updated");
                BoardEvent::TimetableEntryUpdated {
                    entry: entry.clone(),
                }
            }
            DomainEvent::TimetableEntryDeleted { entry_id } => {
                debug!("Broadcasting timetable_entry_deleted for {entry_id}");
                BoardEvent::TimetableEntryDeleted {
                    entry_id: entry_id.to_string(),
                }
            }
        };

        self.sse_manager.broadcast(board_event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn domain_event_is_translated_and_broadcast() {
        let manager = Arc::new(Manager::new());
        let handler = BroadcastEventHandler::new(manager.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.register_connection(tx);

        handler
            .handle(&DomainEvent::AnnouncementCreated {
                announcement: json!({"id": "a1", "title": "welcome week"}),
            })
            .await;

        let event = format!("{:?}", rx.recv().await.unwrap().unwrap());
        assert!(event.contains("announcement_created"));
        assert!(event.contains("welcome week"));
    }
}

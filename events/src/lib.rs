//! Event system infrastructure for the noticeboard backend.
//!
//! This crate provides the event system that enables loose coupling between
//! the mutation handlers in the domain layer and infrastructure concerns
//! (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON
//! values.
//!
//! Every variant corresponds to exactly one successful store mutation and is
//! published exactly once, after the write has been acknowledged. Created and
//! Updated variants carry the fully resolved record (reference fields such as
//! author name already populated) so that connected clients can apply the
//! event without a follow-up fetch. Deleted variants carry only the id.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
///
/// Entity data is carried as `serde_json::Value` to avoid dependencies on
/// the entity crate. All noticeboard events are broadcast to every connected
/// session; there is no per-user routing.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new announcement was posted. Carries the full resolved record.
    AnnouncementCreated { announcement: Value },
    /// An announcement was edited. Carries the full resolved record.
    AnnouncementUpdated { announcement: Value },
    /// An announcement was removed. Only the id survives the deletion.
    AnnouncementDeleted { announcement_id: Id },

    /// A new campus event was scheduled. Carries the full resolved record.
    CampusEventCreated { event: Value },
    /// A campus event was rescheduled or edited. Carries the full resolved record.
    CampusEventUpdated { event: Value },
    /// A campus event was cancelled and removed.
    CampusEventDeleted { event_id: Id },

    /// A timetable entry was added.
    TimetableEntryCreated { entry: Value },
    /// A timetable entry was changed (room, time, lecturer, ...).
    TimetableEntryUpdated { entry: Value },
    /// A timetable entry was removed.
    TimetableEntryDeleted { entry_id: Id },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially, so events published from a single
    /// mutation handler reach the transport in publish order.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        label: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, _event: &DomainEvent) {
            self.seen.lock().unwrap().push(self.label);
        }
    }

    #[tokio::test]
    async fn publish_invokes_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(Recorder {
                label: "first",
                seen: seen.clone(),
            }))
            .with_handler(Arc::new(Recorder {
                label: "second",
                seen: seen.clone(),
            }));

        publisher
            .publish(DomainEvent::AnnouncementDeleted {
                announcement_id: Id::new_v4(),
            })
            .await;

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn publish_with_no_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();

        publisher
            .publish(DomainEvent::TimetableEntryDeleted {
                entry_id: Id::new_v4(),
            })
            .await;
    }
}

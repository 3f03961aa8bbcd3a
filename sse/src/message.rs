use serde::Serialize;
use serde_json::Value;

/// Trait for getting the SSE event type name
pub trait EventType {
    fn event_type(&self) -> &'static str;
}

/// Wire representation of a broadcast event: one variant per resource kind
/// and operation. Created/Updated variants carry the fully resolved record;
/// Deleted variants carry only the id.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    // Announcements
    #[serde(rename = "announcement_created")]
    AnnouncementCreated { announcement: Value },
    #[serde(rename = "announcement_updated")]
    AnnouncementUpdated { announcement: Value },
    #[serde(rename = "announcement_deleted")]
    AnnouncementDeleted { announcement_id: String },

    // Campus events
    #[serde(rename = "event_created")]
    EventCreated { event: Value },
    #[serde(rename = "event_updated")]
    EventUpdated { event: Value },
    #[serde(rename = "event_deleted")]
    EventDeleted { event_id: String },

    // Timetable entries
    #[serde(rename = "timetable_entry_created")]
    TimetableEntryCreated { entry: Value },
    #[serde(rename = "timetable_entry_updated")]
    TimetableEntryUpdated { entry: Value },
    #[serde(rename = "timetable_entry_deleted")]
    TimetableEntryDeleted { entry_id: String },
}

impl EventType for Event {
    fn event_type(&self) -> &'static str {
        match self {
            Event::AnnouncementCreated { .. } => "announcement_created",
            Event::AnnouncementUpdated { .. } => "announcement_updated",
            Event::AnnouncementDeleted { .. } => "announcement_deleted",
            Event::EventCreated { .. } => "event_created",
            Event::EventUpdated { .. } => "event_updated",
            Event::EventDeleted { .. } => "event_deleted",
            Event::TimetableEntryCreated { .. } => "timetable_entry_created",
            Event::TimetableEntryUpdated { .. } => "timetable_entry_updated",
            Event::TimetableEntryDeleted { .. } => "timetable_entry_deleted",
        }
    }
}

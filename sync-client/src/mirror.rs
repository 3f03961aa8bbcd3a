use log::*;
use serde_json::Value;
use std::cmp::{Ordering, Reverse};

/// The resource collections mirrored on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Announcement,
    CampusEvent,
    TimetableEntry,
}

impl ResourceKind {
    pub fn all() -> [ResourceKind; 3] {
        [
            ResourceKind::Announcement,
            ResourceKind::CampusEvent,
            ResourceKind::TimetableEntry,
        ]
    }

    /// Path of the collection's bulk-fetch endpoint.
    pub fn collection_path(&self) -> &'static str {
        match self {
            ResourceKind::Announcement => "/announcements",
            ResourceKind::CampusEvent => "/events",
            ResourceKind::TimetableEntry => "/timetable_entries",
        }
    }
}

/// Ordering key for one document, comparable only within a kind (a mirror
/// holds a single kind, so mixed comparisons never happen).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    /// Announcements: created_at descending, newest first.
    NewestFirst(Reverse<String>),
    /// Campus events: start_date ascending.
    Chronological(String),
    /// Timetable: weekday ordinal (Monday = 0), then "HH:MM" start time.
    WeekSlot(u8, String),
}

fn sort_key(kind: ResourceKind, doc: &Value) -> SortKey {
    match kind {
        ResourceKind::Announcement => {
            SortKey::NewestFirst(Reverse(string_field(doc, "created_at")))
        }
        ResourceKind::CampusEvent => SortKey::Chronological(string_field(doc, "start_date")),
        ResourceKind::TimetableEntry => SortKey::WeekSlot(
            weekday_ordinal(&string_field(doc, "day_of_week")),
            string_field(doc, "start_time"),
        ),
    }
}

/// RFC3339 timestamps and "HH:MM" times compare correctly as strings, so
/// ordering keys stay in their wire form.
fn string_field(doc: &Value, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn weekday_ordinal(day: &str) -> u8 {
    match day {
        "Monday" => 0,
        "Tuesday" => 1,
        "Wednesday" => 2,
        "Thursday" => 3,
        "Friday" => 4,
        "Saturday" => 5,
        "Sunday" => 6,
        // Unknown days sort after the known week.
        _ => 7,
    }
}

pub(crate) fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("id").and_then(Value::as_str)
}

/// In-memory ordered copy of one resource collection, keyed by id and kept
/// sorted by the kind's ordering key with ties broken by id.
#[derive(Debug)]
pub struct Mirror {
    kind: ResourceKind,
    docs: Vec<Value>,
}

impl Mirror {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            docs: Vec::new(),
        }
    }

    pub fn docs(&self) -> &[Value] {
        &self.docs
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.iter().any(|doc| doc_id(doc) == Some(id))
    }

    /// Discard the current contents and adopt a freshly fetched collection,
    /// re-sorted locally so a misordered fetch response cannot break the
    /// sort invariant.
    pub fn replace_all(&mut self, mut docs: Vec<Value>) {
        let kind = self.kind;
        docs.sort_by(|a, b| compare_docs(kind, a, b));
        self.docs = docs;
    }

    /// Insert or replace a document, keeping sort order. Covers both the
    /// `Created` and `Updated` apply rules: a create for a known id replaces
    /// instead of duplicating, an update for an unknown id inserts
    /// (self-healing), and an update that changes the ordering key relocates
    /// the document.
    pub fn upsert(&mut self, doc: Value) {
        let Some(id) = doc_id(&doc).map(str::to_owned) else {
            warn!("Dropping document without an id field");
            return;
        };

        if let Some(existing) = self
            .docs
            .iter()
            .position(|d| doc_id(d) == Some(id.as_str()))
        {
            self.docs.remove(existing);
        }

        let at = self.insertion_point(&sort_key(self.kind, &doc), &id);
        self.docs.insert(at, doc);
    }

    /// Remove a document by id. Removing an absent id is a no-op: deletes of
    /// never-seen or already-removed documents are idempotent.
    pub fn remove(&mut self, id: &str) {
        self.docs.retain(|doc| doc_id(doc) != Some(id));
    }

    fn insertion_point(&self, key: &SortKey, id: &str) -> usize {
        let kind = self.kind;
        self.docs
            .binary_search_by(|existing| {
                match sort_key(kind, existing).cmp(key) {
                    Ordering::Equal => doc_id(existing).unwrap_or_default().cmp(id),
                    decided => decided,
                }
            })
            .unwrap_or_else(|pos| pos)
    }
}

fn compare_docs(kind: ResourceKind, a: &Value, b: &Value) -> Ordering {
    match sort_key(kind, a).cmp(&sort_key(kind, b)) {
        Ordering::Equal => doc_id(a)
            .unwrap_or_default()
            .cmp(doc_id(b).unwrap_or_default()),
        decided => decided,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(mirror: &Mirror) -> Vec<&str> {
        mirror.docs().iter().filter_map(doc_id).collect()
    }

    fn assert_sorted(mirror: &Mirror, kind: ResourceKind) {
        for pair in mirror.docs().windows(2) {
            assert_ne!(
                compare_docs(kind, &pair[0], &pair[1]),
                Ordering::Greater,
                "mirror out of order: {pair:?}"
            );
        }
    }

    #[test]
    fn announcements_are_kept_newest_first() {
        let mut mirror = Mirror::new(ResourceKind::Announcement);
        mirror.upsert(json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}));
        mirror.upsert(json!({"id": "a2", "created_at": "2025-03-01T09:00:00Z"}));
        mirror.upsert(json!({"id": "a3", "created_at": "2025-02-01T09:00:00Z"}));

        assert_eq!(ids(&mirror), vec!["a2", "a3", "a1"]);
        assert_sorted(&mirror, ResourceKind::Announcement);
    }

    #[test]
    fn campus_events_are_kept_in_start_date_order() {
        let mut mirror = Mirror::new(ResourceKind::CampusEvent);
        mirror.upsert(json!({"id": "e2", "start_date": "2025-05-10T18:00:00Z"}));
        mirror.upsert(json!({"id": "e1", "start_date": "2025-04-01T18:00:00Z"}));

        assert_eq!(ids(&mirror), vec!["e1", "e2"]);
    }

    #[test]
    fn timetable_orders_by_day_then_start_time() {
        let mut mirror = Mirror::new(ResourceKind::TimetableEntry);
        mirror.upsert(json!({"id": "t1", "day_of_week": "Friday", "start_time": "08:00"}));
        mirror.upsert(json!({"id": "t2", "day_of_week": "Monday", "start_time": "14:00"}));
        mirror.upsert(json!({"id": "t3", "day_of_week": "Monday", "start_time": "09:00"}));

        assert_eq!(ids(&mirror), vec!["t3", "t2", "t1"]);
    }

    #[test]
    fn ties_on_the_ordering_key_break_by_id() {
        let mut mirror = Mirror::new(ResourceKind::CampusEvent);
        mirror.upsert(json!({"id": "e9", "start_date": "2025-04-01T18:00:00Z"}));
        mirror.upsert(json!({"id": "e1", "start_date": "2025-04-01T18:00:00Z"}));

        assert_eq!(ids(&mirror), vec!["e1", "e9"]);
    }

    #[test]
    fn upsert_of_a_known_id_replaces_instead_of_duplicating() {
        let mut mirror = Mirror::new(ResourceKind::Announcement);
        mirror.upsert(json!({"id": "a1", "title": "old", "created_at": "2025-01-01T09:00:00Z"}));
        mirror.upsert(json!({"id": "a1", "title": "new", "created_at": "2025-01-01T09:00:00Z"}));

        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror.docs()[0]["title"], "new");
    }

    #[test]
    fn upsert_relocates_when_the_ordering_key_changes() {
        let mut mirror = Mirror::new(ResourceKind::CampusEvent);
        mirror.upsert(json!({"id": "e1", "start_date": "2025-04-01T18:00:00Z"}));
        mirror.upsert(json!({"id": "e2", "start_date": "2025-05-01T18:00:00Z"}));

        // Push e1 past e2.
        mirror.upsert(json!({"id": "e1", "start_date": "2025-06-01T18:00:00Z"}));

        assert_eq!(ids(&mirror), vec!["e2", "e1"]);
        assert_eq!(mirror.len(), 2);
    }

    #[test]
    fn remove_of_an_absent_id_is_a_no_op() {
        let mut mirror = Mirror::new(ResourceKind::Announcement);
        mirror.upsert(json!({"id": "a1", "created_at": "2025-01-01T09:00:00Z"}));

        mirror.remove("never-seen");

        assert_eq!(ids(&mirror), vec!["a1"]);
    }

    #[test]
    fn replace_all_sorts_an_unordered_fetch_response() {
        let mut mirror = Mirror::new(ResourceKind::TimetableEntry);
        mirror.replace_all(vec![
            json!({"id": "t2", "day_of_week": "Wednesday", "start_time": "10:00"}),
            json!({"id": "t1", "day_of_week": "Monday", "start_time": "10:00"}),
        ]);

        assert_eq!(ids(&mirror), vec!["t1", "t2"]);
        assert_sorted(&mirror, ResourceKind::TimetableEntry);
    }
}

use std::fmt;
use std::fmt::{Display, Formatter};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::books::dto::BookDto;
use crate::utils::date::serializer;

// ChangeType defines the kind of change applied to the shelf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ChangeType::Create => write!(f, "CREATE"),
            ChangeType::Update => write!(f, "UPDATE"),
            ChangeType::Delete => write!(f, "DELETE"),
        }
    }
}

// ChangeEvent tells downstream consumers which book changed and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub change_type: ChangeType,
    pub changed_book: BookDto,
}

impl ChangeEvent {
    pub fn created(book: &BookDto) -> Self {
        Self::new(ChangeType::Create, book.clone())
    }

    pub fn updated(book: &BookDto) -> Self {
        Self::new(ChangeType::Update, book.clone())
    }

    // deletions only carry the identifier, not the removed record
    pub fn deleted(id: i64) -> Self {
        Self::new(ChangeType::Delete, BookDto::with_id_only(id))
    }

    pub fn new(change_type: ChangeType, changed_book: BookDto) -> Self {
        Self { change_type, changed_book }
    }

    pub fn key(&self) -> String {
        self.changed_book.id.map(|id| id.to_string()).unwrap_or_default()
    }
}

// EventEnvelope wraps a serialized change event for publishers that store or route
// messages, e.g. the events table used in local development.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: String,
    pub destination: String,
    pub key: String,
    pub kind: ChangeType,
    pub json_data: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl EventEnvelope {
    pub fn wrap(destination: &str, event: &ChangeEvent) -> serde_json::Result<Self> {
        let json = serde_json::to_string(event)?;
        Ok(EventEnvelope {
            event_id: Uuid::new_v4().to_string(),
            destination: destination.to_string(),
            key: event.key(),
            kind: event.change_type,
            json_data: json,
            created_at: Utc::now().naive_utc(),
        })
    }

    pub fn unwrap_event(&self) -> serde_json::Result<ChangeEvent> {
        serde_json::from_str(self.json_data.as_str())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use crate::books::dto::BookDto;
    use crate::core::events::{ChangeEvent, ChangeType, EventEnvelope};

    fn stored_book() -> BookDto {
        let mut book = BookDto::new("title", "author", "publisher", 1978, 2);
        book.id = Some(11);
        book
    }

    #[tokio::test]
    async fn test_should_build_created() {
        let event = ChangeEvent::created(&stored_book());
        assert_eq!(ChangeType::Create, event.change_type);
        assert_eq!(stored_book(), event.changed_book);
        assert_eq!("11", event.key().as_str());
    }

    #[tokio::test]
    async fn test_should_build_updated() {
        let event = ChangeEvent::updated(&stored_book());
        assert_eq!(ChangeType::Update, event.change_type);
        assert_eq!(ChangeEvent::new(ChangeType::Update, stored_book()), event);
    }

    #[tokio::test]
    async fn test_should_build_deleted_with_id_only() {
        let event = ChangeEvent::deleted(11);
        assert_eq!(ChangeType::Delete, event.change_type);
        assert_eq!(BookDto::with_id_only(11), event.changed_book);
        assert_ne!(ChangeEvent::deleted(12), event);
    }

    #[tokio::test]
    async fn test_should_serialize_change_type() {
        let val = serde_json::to_value(ChangeEvent::deleted(3)).expect("should serialize");
        assert_eq!(json!("DELETE"), val["changeType"]);
        assert_eq!(json!(3), val["changedBook"]["id"]);
    }

    #[tokio::test]
    async fn test_should_wrap_event() {
        let event = ChangeEvent::created(&stored_book());
        let envelope = EventEnvelope::wrap("shelfChanged", &event).expect("should wrap");
        assert_eq!("shelfChanged", envelope.destination.as_str());
        assert_eq!("11", envelope.key.as_str());
        assert_eq!(ChangeType::Create, envelope.kind);
        assert_eq!(event, envelope.unwrap_event().expect("should unwrap"));
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::opt_serializer;

// BookEntity is the stored form of a shelf record. Its identifier is always
// assigned: entities handed to `create` carry a placeholder that the store
// replaces with the next value of its sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookEntity {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publish_year: i64,
    #[serde(with = "opt_serializer", default)]
    pub created_at: Option<NaiveDateTime>,
    pub count: i64,
}

impl BookEntity {
    pub fn new(title: &str, author: &str, publisher: &str, publish_year: i64, count: i64) -> Self {
        Self {
            id: 0,
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            publish_year,
            created_at: None,
            count,
        }
    }

    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> Option<i64> {
        Some(self.id)
    }
}

impl Book for BookEntity {
    fn title(&self) -> &str {
        self.title.as_str()
    }

    fn author(&self) -> &str {
        self.author.as_str()
    }

    fn publisher(&self) -> &str {
        self.publisher.as_str()
    }

    fn publish_year(&self) -> i64 {
        self.publish_year
    }

    fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    fn count(&self) -> i64 {
        self.count
    }
}

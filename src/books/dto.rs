use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::books::domain::Book;
use crate::core::domain::Identifiable;
use crate::utils::date::opt_serializer;

// BookDto is the data transfer object of the catalog API and the subject of change events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub publish_year: i64,
    #[serde(with = "opt_serializer", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub count: i64,
}

impl BookDto {
    pub fn new(title: &str, author: &str, publisher: &str, publish_year: i64, count: i64) -> BookDto {
        BookDto {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
            publisher: publisher.to_string(),
            publish_year,
            created_at: None,
            count,
        }
    }

    // a book that carries nothing but its identifier, used as the subject of deletions
    pub fn with_id_only(id: i64) -> BookDto {
        BookDto {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> BookDto {
        self.created_at = Some(created_at);
        self
    }
}

impl Identifiable for BookDto {
    fn id(&self) -> Option<i64> {
        self.id
    }
}

impl Book for BookDto {
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

use std::cmp::Ordering;
use std::collections::HashMap;
use chrono::NaiveDateTime;
use crate::books::domain::Book;
use crate::core::library::{LibraryError, LibraryResult, REASON_FILTER_INVALID, REASON_SORT_INVALID};
use crate::utils::date::parse_date;

// BookFilter is the example of a query-by-example lookup. Every attribute that is
// set constrains the result with an exact, case-sensitive equality and all of the
// constraints must hold. Unset attributes and empty text are wildcards; numeric
// zero is a real constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub publish_year: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub count: Option<i64>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn publisher(mut self, publisher: &str) -> Self {
        self.publisher = Some(publisher.to_string());
        self
    }

    pub fn publish_year(mut self, publish_year: i64) -> Self {
        self.publish_year = Some(publish_year);
        self
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    // Builds a filter from raw query parameters. Empty values are wildcards and
    // unknown parameters are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> LibraryResult<BookFilter> {
        let text = |name: &str| params.get(name).filter(|v| !v.is_empty()).cloned();
        let number = |name: &str| -> LibraryResult<Option<i64>> {
            match params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(v) => v.parse::<i64>().map(Some).map_err(|_| invalid_param(name, v)),
                None => Ok(None),
            }
        };
        let created_at = match params.get("createdAt").map(|v| v.trim()).filter(|v| !v.is_empty()) {
            Some(v) => Some(parse_date(v).ok_or_else(|| invalid_param("createdAt", v))?),
            None => None,
        };
        Ok(BookFilter {
            id: number("id")?,
            title: text("title"),
            author: text("author"),
            publisher: text("publisher"),
            publish_year: number("publishYear")?,
            created_at,
            count: number("count")?,
        })
    }

    // text constraints with empty values dropped
    pub fn text_constraints(&self) -> Vec<(&'static str, &str)> {
        [("title", &self.title), ("author", &self.author), ("publisher", &self.publisher)]
            .into_iter()
            .filter_map(|(name, val)| val.as_deref().filter(|v| !v.is_empty()).map(|v| (name, v)))
            .collect()
    }

    pub fn number_constraints(&self) -> Vec<(&'static str, i64)> {
        [("id", self.id), ("publish_year", self.publish_year), ("count", self.count)]
            .into_iter()
            .filter_map(|(name, val)| val.map(|v| (name, v)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text_constraints().is_empty() && self.number_constraints().is_empty() && self.created_at.is_none()
    }

    pub fn matches<B: Book>(&self, book: &B) -> bool {
        let text_ok = self.text_constraints().iter().all(|(name, expected)| {
            let actual = match *name {
                "title" => book.title(),
                "author" => book.author(),
                _ => book.publisher(),
            };
            actual == *expected
        });
        let number_ok = self.number_constraints().iter().all(|(name, expected)| {
            let actual = match *name {
                "id" => book.id(),
                "publish_year" => Some(book.publish_year()),
                _ => Some(book.count()),
            };
            actual == Some(*expected)
        });
        let created_ok = self.created_at.map_or(true, |expected| book.created_at() == Some(expected));
        text_ok && number_ok && created_ok
    }
}

fn invalid_param(name: &str, value: &str) -> LibraryError {
    LibraryError::validation(format!("invalid value {} for {}", value, name).as_str(), Some(REASON_FILTER_INVALID.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BookField {
    Id,
    Title,
    Author,
    Publisher,
    PublishYear,
    CreatedAt,
    Count,
}

impl BookField {
    pub fn parse(name: &str) -> Option<BookField> {
        match name {
            "id" => Some(BookField::Id),
            "title" => Some(BookField::Title),
            "author" => Some(BookField::Author),
            "publisher" => Some(BookField::Publisher),
            "publishYear" => Some(BookField::PublishYear),
            "createdAt" => Some(BookField::CreatedAt),
            "count" => Some(BookField::Count),
            _ => None,
        }
    }

    fn compare<B: Book>(&self, a: &B, b: &B) -> Ordering {
        match self {
            BookField::Id => a.id().cmp(&b.id()),
            BookField::Title => a.title().cmp(b.title()),
            BookField::Author => a.author().cmp(b.author()),
            BookField::Publisher => a.publisher().cmp(b.publisher()),
            BookField::PublishYear => a.publish_year().cmp(&b.publish_year()),
            BookField::CreatedAt => a.created_at().cmp(&b.created_at()),
            BookField::Count => a.count().cmp(&b.count()),
        }
    }
}

// BookSort is an explicit ordering requested by a caller, e.g. `id,desc`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookSort {
    pub field: BookField,
    pub descending: bool,
}

impl BookSort {
    pub fn parse(spec: &str) -> LibraryResult<BookSort> {
        let mut parts = spec.split(',').map(str::trim);
        let field = parts.next().and_then(BookField::parse).ok_or_else(|| {
            LibraryError::validation(format!("unknown sort field in {}", spec).as_str(), Some(REASON_SORT_INVALID.to_string()))
        })?;
        let descending = match parts.next() {
            None | Some("") => false,
            Some(dir) if dir.eq_ignore_ascii_case("asc") => false,
            Some(dir) if dir.eq_ignore_ascii_case("desc") => true,
            Some(dir) => {
                return Err(LibraryError::validation(format!("unknown sort direction {}", dir).as_str(),
                                                    Some(REASON_SORT_INVALID.to_string())));
            }
        };
        Ok(BookSort { field, descending })
    }

    pub fn apply<B: Book>(&self, books: &mut [B]) {
        books.sort_by(|a, b| {
            let ord = self.field.compare(a, b);
            if self.descending { ord.reverse() } else { ord }
        });
    }
}

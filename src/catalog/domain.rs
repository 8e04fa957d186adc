pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::books::filter::{BookFilter, BookSort};
use crate::core::library::LibraryResult;

// CatalogService pairs every successful mutation of the shelf with exactly one
// change event of the matching kind.
#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn remove_book(&self, id: i64) -> LibraryResult<()>;
    async fn update_book(&self, book: &BookDto) -> LibraryResult<BookDto>;
    async fn find_book_by_id(&self, id: i64) -> LibraryResult<BookDto>;
    async fn find_books(&self, sort: Option<&BookSort>) -> LibraryResult<Vec<BookDto>>;
    async fn find_books_by_example(&self, filter: &BookFilter) -> LibraryResult<Vec<BookDto>>;
}

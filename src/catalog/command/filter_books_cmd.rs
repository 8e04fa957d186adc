use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::books::filter::BookFilter;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct FilterBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl FilterBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct FilterBooksCommandRequest {
    pub(crate) filter: BookFilter,
}

impl FilterBooksCommandRequest {
    pub fn new(filter: BookFilter) -> Self {
        Self {
            filter,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct FilterBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl FilterBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<FilterBooksCommandRequest, FilterBooksCommandResponse> for FilterBooksCommand {
    async fn execute(&self, req: FilterBooksCommandRequest) -> Result<FilterBooksCommandResponse, CommandError> {
        self.catalog_service.find_books_by_example(&req.filter)
            .await.map_err(CommandError::from).map(FilterBooksCommandResponse::new)
    }
}

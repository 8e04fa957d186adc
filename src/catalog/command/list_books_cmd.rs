use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;
use crate::books::filter::BookSort;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksCommandRequest {
    #[serde(default)]
    pub(crate) sort: Option<String>,
}

impl ListBooksCommandRequest {
    pub fn new(sort: Option<&str>) -> Self {
        Self {
            sort: sort.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct ListBooksCommandResponse {
    pub books: Vec<BookDto>,
}

impl ListBooksCommandResponse {
    pub fn new(books: Vec<BookDto>) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let sort = match req.sort.as_deref().filter(|s| !s.is_empty()) {
            Some(spec) => Some(BookSort::parse(spec)?),
            None => None,
        };
        self.catalog_service.find_books(sort.as_ref())
            .await.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}

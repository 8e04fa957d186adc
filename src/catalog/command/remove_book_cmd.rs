use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) id: i64,
}

impl RemoveBookCommandRequest {
    pub fn new(id: i64) -> Self {
        Self {
            id,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {
    pub(crate) id: i64,
}

impl RemoveBookCommandResponse {
    pub fn new(id: i64) -> Self {
        Self {
            id,
        }
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.catalog_service.remove_book(req.id)
            .await.map_err(CommandError::from).map(|_| RemoveBookCommandResponse::new(req.id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::books::dto::BookDto;
    use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
    use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
    use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_run_remove_book() {
        let svc: Arc<dyn CatalogService> = Arc::from(factory::create_catalog_service(&Configuration::new("test", RepositoryStore::Memory)).await);
        let added = AddBookCommand::new(Arc::clone(&svc))
            .execute(AddBookCommandRequest::new(BookDto::new("test book", "author", "publisher", 1999, 3)))
            .await.expect("should add book");
        let id = added.book.id.expect("stored book has id");

        let res = RemoveBookCommand::new(Arc::clone(&svc)).execute(RemoveBookCommandRequest::new(id))
            .await.expect("should remove book");
        assert_eq!(id, res.id);
        // removing again is not an error
        let _ = RemoveBookCommand::new(Arc::clone(&svc)).execute(RemoveBookCommandRequest::new(id))
            .await.expect("should remove absent book");

        let err = GetBookCommand::new(svc).execute(GetBookCommandRequest::new(id))
            .await.expect_err("should not find book");
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}

use aws_sdk_dynamodb::types::ScalarAttributeType;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(config: &Configuration) -> Box<dyn BookRepository> {
    match config.store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config.store).await;
            Box::new(DDBBookRepository::new(client, &config.books_table, &config.sequences_table, config.strict_updates))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config.store).await;
            // tables may already exist from a previous run
            let _ = create_table(&client, &config.books_table, "id", ScalarAttributeType::N).await;
            let _ = create_table(&client, &config.sequences_table, "name", ScalarAttributeType::S).await;
            Box::new(DDBBookRepository::new(client, &config.books_table, &config.sequences_table, config.strict_updates))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBookRepository::new(config.strict_updates))
        }
    }
}

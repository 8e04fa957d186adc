use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::gateway::GatewayPublisherVia;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // create an entity, the store assigns its identifier and returns the persisted copy
    async fn create(&self, entity: &Entity) -> LibraryResult<Entity>;

    // overwrites an entity by its identifier
    async fn update(&self, entity: &Entity) -> LibraryResult<Entity>;

    // get an entity
    async fn get(&self, id: i64) -> LibraryResult<Entity>;

    // delete an entity, returns number of removed records
    async fn delete(&self, id: i64) -> LibraryResult<usize>;

    // all entities, one page at a time
    async fn find_all(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl RepositoryStore {
    pub fn parse(mode: &str) -> Option<RepositoryStore> {
        match mode.to_lowercase().as_str() {
            "aws" | "dynamodb" => Some(RepositoryStore::DynamoDB),
            "local" | "localdynamodb" => Some(RepositoryStore::LocalDynamoDB),
            "memory" => Some(RepositoryStore::Memory),
            _ => None,
        }
    }

    pub fn gateway_publisher(&self) -> GatewayPublisherVia {
        match self {
            RepositoryStore::DynamoDB => { GatewayPublisherVia::Sns }
            RepositoryStore::LocalDynamoDB => { GatewayPublisherVia::LocalDynamoDB }
            RepositoryStore::Memory => { GatewayPublisherVia::Log }
        }
    }
}

impl Display for RepositoryStore {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RepositoryStore::DynamoDB => write!(f, "aws"),
            RepositoryStore::LocalDynamoDB => write!(f, "local"),
            RepositoryStore::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::repository::RepositoryStore;
    use crate::gateway::GatewayPublisherVia;

    #[tokio::test]
    async fn test_should_parse_store() {
        for store in [RepositoryStore::DynamoDB, RepositoryStore::LocalDynamoDB, RepositoryStore::Memory] {
            assert_eq!(Some(store), RepositoryStore::parse(store.to_string().as_str()));
        }
        assert_eq!(None, RepositoryStore::parse("postgres"));
    }

    #[tokio::test]
    async fn test_should_pick_publisher_for_store() {
        assert_eq!(GatewayPublisherVia::Sns, RepositoryStore::DynamoDB.gateway_publisher());
        assert_eq!(GatewayPublisherVia::LocalDynamoDB, RepositoryStore::LocalDynamoDB.gateway_publisher());
        assert_eq!(GatewayPublisherVia::Log, RepositoryStore::Memory.gateway_publisher());
    }
}

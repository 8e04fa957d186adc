use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use crate::core::events::{ChangeEvent, EventEnvelope};
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;
use crate::utils::ddb::parse_item;

// DDBPublisher appends every event envelope to a table, standing in for a broker
// when running against DynamoDB Local.
#[derive(Debug)]
pub struct DDBPublisher {
    client: Client,
    table_name: String,
}

impl DDBPublisher {
    pub(crate) fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for DDBPublisher {
    async fn create_topic(&self, topic: &str) -> Result<String, LibraryError> {
        Ok(topic.to_string())
    }

    async fn get_topics(&self) -> Result<Vec<String>, LibraryError> {
        Ok(vec![])
    }

    async fn publish(&self, destination: &str, event: &ChangeEvent) -> Result<(), LibraryError> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(EventEnvelope::wrap(destination, event)?)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(event_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| ()).map_err(LibraryError::from)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use aws_sdk_dynamodb::types::ScalarAttributeType;
    use lazy_static::lazy_static;
    use crate::books::dto::BookDto;
    use crate::core::events::ChangeEvent;
    use crate::core::repository::RepositoryStore;

    use crate::gateway::ddb::publisher::DDBPublisher;
    use crate::gateway::events::EventPublisher;
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "test_events").await;
                let _ = create_table(&client, "test_events", "event_id", ScalarAttributeType::S).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_publish_to_ddb() {
        let event = ChangeEvent::created(&BookDto::new("title", "author", "publisher", 1978, 2));
        let publisher = DDBPublisher::new(CLIENT.get().await.clone(), "test_events");
        let topic = publisher.create_topic("shelfChanged").await.expect("should create topic");
        let _ = publisher.publish(topic.as_str(), &event).await.expect("should publish");
        let topics = publisher.get_topics().await.expect("should get topics");
        assert_eq!(0, topics.len());
    }
}

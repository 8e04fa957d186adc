use aws_sdk_dynamodb::types::ScalarAttributeType;
use crate::core::repository::RepositoryStore;
use crate::gateway::ddb::publisher::DDBPublisher;
use crate::gateway::events::EventPublisher;
use crate::gateway::GatewayPublisherVia;
use crate::gateway::log::publisher::LogPublisher;
use crate::gateway::sns::publisher::SNSPublisher;
use crate::utils::ddb::{build_db_client, build_sns_client, create_table};

pub(crate) async fn create_publisher(via: GatewayPublisherVia, events_table: &str) -> Box<dyn EventPublisher> {
    match via {
        GatewayPublisherVia::Sns => {
            let client = build_sns_client().await;
            Box::new(SNSPublisher::new(client))
        }
        GatewayPublisherVia::LocalDynamoDB => {
            let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
            let _ = create_table(&client, events_table, "event_id", ScalarAttributeType::S).await;
            Box::new(DDBPublisher::new(client, events_table))
        }
        GatewayPublisherVia::Log => {
            Box::new(LogPublisher::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gateway::factory::create_publisher;
    use crate::gateway::GatewayPublisherVia;

    #[tokio::test]
    async fn test_should_create_log_publisher() {
        let publisher = create_publisher(GatewayPublisherVia::Log, "events").await;
        let topic = publisher.create_topic("shelfChanged").await.expect("should create topic");
        assert_eq!("shelfChanged", topic.as_str());
        assert_eq!(vec![topic], publisher.get_topics().await.expect("should get topics"));
    }
}

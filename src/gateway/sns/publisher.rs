use std::collections::HashMap;
use std::sync::RwLock;
use aws_sdk_sns::Client;
use async_trait::async_trait;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::create_topic::CreateTopicError;
use aws_sdk_sns::operation::list_topics::ListTopicsError;
use aws_sdk_sns::operation::publish::PublishError;
use aws_sdk_sns::types::MessageAttributeValue;
use tracing::info;
use crate::core::events::ChangeEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

#[derive(Debug)]
pub struct SNSPublisher {
    client: Client,
    topics: RwLock<HashMap<String, String>>,
}

impl SNSPublisher {
    pub(crate) fn new(client: Client) -> Self {
        Self {
            client,
            topics: RwLock::new(HashMap::new()),
        }
    }

    fn topic_arn(&self, topic: &str) -> Option<String> {
        self.topics.read().ok().and_then(|topics| topics.get(topic).cloned())
    }
}

#[async_trait]
impl EventPublisher for SNSPublisher {
    // CreateTopic is idempotent in SNS, an existing topic returns its ARN
    async fn create_topic(&self, topic: &str) -> Result<String, LibraryError> {
        let resp = self.client.create_topic().name(topic).send().await?;
        let arn = resp.topic_arn().unwrap_or_default().to_string();
        if let Ok(mut topics) = self.topics.write() {
            topics.insert(topic.to_string(), arn.clone());
        }
        info!(topic, arn = arn.as_str(), "created topic");
        Ok(arn)
    }

    async fn get_topics(&self) -> Result<Vec<String>, LibraryError> {
        let mut topics = vec![];
        let resp = self.client.list_topics().send().await?;
        for topic in resp.topics().unwrap_or_default() {
            topics.push(topic.topic_arn().unwrap_or_default().to_string());
        }
        Ok(topics)
    }

    async fn publish(&self, destination: &str, event: &ChangeEvent) -> Result<(), LibraryError> {
        if let Some(arn) = self.topic_arn(destination) {
            let json = serde_json::to_string(event)?;
            let change_type = MessageAttributeValue::builder()
                .data_type("String")
                .string_value(event.change_type.to_string())
                .build();
            self.client.publish()
                .topic_arn(arn)
                .message(json)
                .message_attributes("changeType", change_type)
                .send().await?;
            Ok(())
        } else {
            Err(LibraryError::runtime(format!("topic is not found {}", destination).as_str(), None))
        }
    }
}

impl From<SdkError<CreateTopicError>> for LibraryError {
    fn from(err: SdkError<CreateTopicError>) -> Self {
        LibraryError::runtime(format!("{:?}", err).as_str(), None)
    }
}

impl From<SdkError<ListTopicsError>> for LibraryError {
    fn from(err: SdkError<ListTopicsError>) -> Self {
        LibraryError::runtime(format!("{:?}", err).as_str(), None)
    }
}

impl From<SdkError<PublishError>> for LibraryError {
    fn from(err: SdkError<PublishError>) -> Self {
        LibraryError::runtime(format!("{:?}", err).as_str(), None)
    }
}

use std::collections::BTreeSet;
use std::sync::RwLock;
use async_trait::async_trait;
use tracing::info;
use crate::core::events::ChangeEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

// LogPublisher writes each event to the log and keeps nothing once it is emitted.
// It is the notifier of the in-memory mode where no broker is available.
#[derive(Debug, Default)]
pub struct LogPublisher {
    topics: RwLock<BTreeSet<String>>,
}

impl LogPublisher {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn create_topic(&self, topic: &str) -> Result<String, LibraryError> {
        let mut topics = self.topics.write().map_err(|_| LibraryError::runtime("log topics lock poisoned", None))?;
        topics.insert(topic.to_string());
        Ok(topic.to_string())
    }

    async fn get_topics(&self) -> Result<Vec<String>, LibraryError> {
        let topics = self.topics.read().map_err(|_| LibraryError::runtime("log topics lock poisoned", None))?;
        Ok(topics.iter().cloned().collect())
    }

    async fn publish(&self, destination: &str, event: &ChangeEvent) -> Result<(), LibraryError> {
        let known = self.topics.read().map(|topics| topics.contains(destination)).unwrap_or_default();
        if !known {
            return Err(LibraryError::runtime(format!("topic is not found {}", destination).as_str(), None));
        }
        let json = serde_json::to_string(event)?;
        info!(destination, change_type = %event.change_type, book_id = event.key().as_str(),
            event = json.as_str(), "published change event");
        Ok(())
    }
}

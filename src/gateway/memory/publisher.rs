use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use crate::core::events::ChangeEvent;
use crate::core::library::LibraryError;
use crate::gateway::events::EventPublisher;

#[derive(Debug, Default)]
struct Outbox {
    topics: BTreeSet<String>,
    published: Vec<(String, ChangeEvent)>,
}

// MemoryPublisher records every published event so tests can inspect what a
// service emitted. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    outbox: Arc<Mutex<Outbox>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, ChangeEvent)> {
        self.outbox.lock().map(|outbox| outbox.published.clone()).unwrap_or_default()
    }

    pub fn events(&self) -> Vec<ChangeEvent> {
        self.published().into_iter().map(|(_, event)| event).collect()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn create_topic(&self, topic: &str) -> Result<String, LibraryError> {
        let mut outbox = self.outbox.lock().map_err(|_| LibraryError::runtime("memory outbox lock poisoned", None))?;
        outbox.topics.insert(topic.to_string());
        Ok(topic.to_string())
    }

    async fn get_topics(&self) -> Result<Vec<String>, LibraryError> {
        let outbox = self.outbox.lock().map_err(|_| LibraryError::runtime("memory outbox lock poisoned", None))?;
        Ok(outbox.topics.iter().cloned().collect())
    }

    async fn publish(&self, destination: &str, event: &ChangeEvent) -> Result<(), LibraryError> {
        let mut outbox = self.outbox.lock().map_err(|_| LibraryError::runtime("memory outbox lock poisoned", None))?;
        if !outbox.topics.contains(destination) {
            return Err(LibraryError::runtime(format!("topic is not found {}", destination).as_str(), None));
        }
        outbox.published.push((destination.to_string(), event.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::events::ChangeEvent;
    use crate::gateway::events::EventPublisher;
    use crate::gateway::memory::publisher::MemoryPublisher;

    #[tokio::test]
    async fn test_should_publish_to_memory() {
        let publisher = MemoryPublisher::new();
        let handle = publisher.clone();
        let _ = publisher.create_topic("shelfChanged").await.expect("should create topic");
        let _ = publisher.publish("shelfChanged", &ChangeEvent::deleted(1)).await.expect("should publish");

        assert_eq!(vec!["shelfChanged".to_string()], publisher.get_topics().await.expect("should get topics"));
        assert_eq!(vec![("shelfChanged".to_string(), ChangeEvent::deleted(1))], handle.published());
    }

    #[tokio::test]
    async fn test_should_reject_unknown_topic() {
        let publisher = MemoryPublisher::new();
        let res = publisher.publish("elsewhere", &ChangeEvent::deleted(1)).await;
        assert!(res.is_err());
        assert!(publisher.events().is_empty());
    }
}

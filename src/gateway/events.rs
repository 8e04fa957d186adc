use async_trait::async_trait;
use crate::core::events::ChangeEvent;
use crate::core::library::LibraryError;

// EventPublisher hands change events to a delivery channel. It keeps no state
// about published events between calls.
#[async_trait]
pub trait EventPublisher: Sync + Send {
    // prepares a destination and returns its transport address
    async fn create_topic(&self, topic: &str) -> Result<String, LibraryError>;
    async fn get_topics(&self) -> Result<Vec<String>, LibraryError>;
    async fn publish(&self, destination: &str, event: &ChangeEvent) -> Result<(), LibraryError>;
}

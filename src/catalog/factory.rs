use tracing::warn;
use crate::books::factory;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::gateway::factory::create_publisher;

pub async fn create_catalog_service(config: &Configuration) -> Box<dyn CatalogService> {
    let book_repo = factory::create_book_repository(config).await;
    let publisher = create_publisher(config.store.gateway_publisher(), &config.events_table).await;
    // without the topic every publish fails and is dropped, the catalog still serves requests
    if let Err(err) = publisher.create_topic(&config.destination).await {
        warn!(destination = config.destination.as_str(), error = %err, "failed to create destination");
    }
    Box::new(CatalogServiceImpl::new(config, book_repo, publisher))
}

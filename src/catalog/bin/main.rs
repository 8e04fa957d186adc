use std::net::SocketAddr;
use std::sync::Arc;
use lambda_http::{run, Error};
use tracing::info;
use shelf::catalog::controller::app;
use shelf::catalog::factory::create_catalog_service;
use shelf::core::controller::AppState;
use shelf::core::domain::Configuration;
use shelf::core::repository::RepositoryStore;
use shelf::utils::ddb::setup_tracing;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let config = Configuration::from_env();
    let catalog = create_catalog_service(&config).await;
    let state = AppState::new(config, Arc::from(catalog));
    info!(branch = state.config.branch_id.as_str(), store = %state.config.store,
        destination = state.config.destination.as_str(), "starting catalog");

    match state.config.store {
        RepositoryStore::DynamoDB => {
            run(app::<lambda_http::Body>(state)).await
        }
        RepositoryStore::LocalDynamoDB | RepositoryStore::Memory => {
            let addr: SocketAddr = state.config.listen_addr.parse()?;
            info!(%addr, "listening");
            axum::Server::bind(&addr)
                .serve(app::<axum::body::Body>(state).into_make_service())
                .await?;
            Ok(())
        }
    }
}

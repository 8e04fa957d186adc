use std::sync::Arc;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

// AppState is shared by every request, the catalog service is built once on startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Configuration,
    pub catalog: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(config: Configuration, catalog: Arc<dyn CatalogService>) -> AppState {
        AppState {
            config,
            catalog,
        }
    }
}

pub type ServerError = (StatusCode, Json<Value>);

fn error_body(message: &str, reason_code: Option<&str>) -> Json<Value> {
    Json(json!({"message": message, "reason": reason_code}))
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, error_body(format!("{}", err).as_str(), None))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::Serialization { .. } => StatusCode::BAD_REQUEST,
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, error_body(err.message(), err.reason_code()))
    }
}

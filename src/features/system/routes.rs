use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::system::handlers;
use crate::features::system::services::SystemService;

pub fn routes(service: Arc<SystemService>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/instance", get(handlers::get_instance))
        .with_state(service)
}

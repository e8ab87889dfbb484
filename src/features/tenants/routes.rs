use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::tenants::handlers;
use crate::features::tenants::services::TenantService;

/// Create routes for the tenants feature
///
/// Note: authentication is owned by the signup flow that calls this hook.
pub fn routes(service: Arc<TenantService>) -> Router {
    Router::new()
        .route("/api/tenants/bootstrap", post(handlers::bootstrap_tenant))
        .with_state(service)
}

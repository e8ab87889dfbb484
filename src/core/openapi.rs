use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::features::system::{dtos as system_dtos, handlers as system_handlers};
use crate::features::tenants::{dtos as tenants_dtos, handlers as tenants_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        system_handlers::health,
        system_handlers::get_instance,
        // Tenants
        tenants_handlers::bootstrap_tenant,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // System
            system_dtos::HealthDto,
            system_dtos::InstanceDto,
            ApiResponse<system_dtos::HealthDto>,
            ApiResponse<system_dtos::InstanceDto>,
            // Tenants
            tenants_dtos::BootstrapTenantDto,
            tenants_dtos::TenantResponseDto,
            ApiResponse<tenants_dtos::TenantResponseDto>,
        )
    ),
    tags(
        (name = "system", description = "Deployment health and identity"),
        (name = "tenants", description = "Tenant provisioning for new users"),
    ),
    info(
        title = "Importer Admin API",
        version = "0.1.0",
        description = "Administration API for the file-import service",
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub fn routes() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

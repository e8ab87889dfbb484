use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::system::dtos::{HealthDto, InstanceDto};
use crate::features::system::services::SystemService;
use crate::shared::types::ApiResponse;

/// Liveness check including database connectivity
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database are reachable", body = ApiResponse<HealthDto>),
        (status = 503, description = "Database unreachable")
    ),
    tag = "system"
)]
pub async fn health(
    State(service): State<Arc<SystemService>>,
) -> Result<Json<ApiResponse<HealthDto>>> {
    service.check_database().await?;
    Ok(Json(ApiResponse::success(Some(HealthDto::ok()), None, None)))
}

/// Get the id of this deployment
#[utoipa::path(
    get,
    path = "/api/instance",
    responses(
        (status = 200, description = "Instance id", body = ApiResponse<InstanceDto>),
        (status = 404, description = "Schema not initialized")
    ),
    tag = "system"
)]
pub async fn get_instance(
    State(service): State<Arc<SystemService>>,
) -> Result<Json<ApiResponse<InstanceDto>>> {
    let instance_id = service.instance_id().await?;
    Ok(Json(ApiResponse::success(
        Some(InstanceDto { instance_id }),
        None,
        None,
    )))
}

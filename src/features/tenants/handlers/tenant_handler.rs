use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::tenants::dtos::{BootstrapTenantDto, TenantResponseDto};
use crate::features::tenants::services::{TenantService, UserIdentity};
use crate::shared::types::ApiResponse;

/// Bootstrap the default tenant for a newly signed-up user
///
/// Called by the signup flow once the user identity exists. Creates one
/// organization, workspace, importer and template with three example columns,
/// and links the user to the organization and workspace.
#[utoipa::path(
    post,
    path = "/api/tenants/bootstrap",
    request_body = BootstrapTenantDto,
    responses(
        (status = 201, description = "Tenant created", body = ApiResponse<TenantResponseDto>),
        (status = 400, description = "Invalid request body"),
        (status = 409, description = "Conflicting tenant data"),
        (status = 500, description = "Tenant could not be created")
    ),
    tag = "tenants"
)]
pub async fn bootstrap_tenant(
    State(service): State<Arc<TenantService>>,
    AppJson(dto): AppJson<BootstrapTenantDto>,
) -> Result<(StatusCode, Json<ApiResponse<TenantResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let ids = service.bootstrap(UserIdentity { id: dto.user_id }).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ids.into()),
            Some("Tenant created".to_string()),
            None,
        )),
    ))
}

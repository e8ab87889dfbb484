use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::tenants::services::TenantIds;

/// Request DTO for bootstrapping the default tenant of a new user
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapTenantDto {
    /// Identity of the user that just signed up
    #[validate(custom(function = "validate_not_nil"))]
    pub user_id: Uuid,
}

fn validate_not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::new("nil_uuid")
            .with_message(Cow::Borrowed("userId must not be the nil UUID")));
    }
    Ok(())
}

/// Response DTO with the identifiers of the created tenant
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponseDto {
    pub workspace_id: Uuid,
    pub organization_id: Uuid,
}

impl From<TenantIds> for TenantResponseDto {
    fn from(ids: TenantIds) -> Self {
        Self {
            workspace_id: ids.workspace_id,
            organization_id: ids.organization_id,
        }
    }
}

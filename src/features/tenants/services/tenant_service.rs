use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::tenants::services::bootstrap::{
    bootstrap_tenant, BootstrapError, TenantIds, UserIdentity,
};

/// Service for tenant provisioning
pub struct TenantService {
    pool: PgPool,
}

impl TenantService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the default tenant for a newly signed-up user
    pub async fn bootstrap(&self, user: UserIdentity) -> Result<TenantIds> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection for tenant bootstrap: {:?}", e);
            AppError::Database(e)
        })?;

        bootstrap_tenant(&mut *conn, &user).await.map_err(|e| {
            tracing::error!(user_id = %user.id, "Tenant bootstrap failed: {}", e);
            AppError::from(e)
        })
    }
}

impl From<BootstrapError> for AppError {
    fn from(err: BootstrapError) -> Self {
        if err.is_unique_violation() {
            return AppError::Conflict(err.to_string());
        }
        match err {
            BootstrapError::Begin(e) | BootstrapError::Commit(e) => AppError::Database(e),
            BootstrapError::Persist { source, .. } => AppError::Database(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tenants::services::bootstrap::BootstrapEntity;

    #[test]
    fn test_bootstrap_error_maps_to_database_error() {
        let err = BootstrapError::Persist {
            entity: BootstrapEntity::Importer,
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(matches!(
            AppError::from(err),
            AppError::Database(sqlx::Error::PoolTimedOut)
        ));

        let err = BootstrapError::Commit(sqlx::Error::PoolClosed);
        assert!(matches!(
            AppError::from(err),
            AppError::Database(sqlx::Error::PoolClosed)
        ));
    }
}

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::database;
use crate::core::error::{AppError, Result};

/// Read the deployment's singleton instance id, if the schema has one yet
pub async fn instance_id(conn: &mut PgConnection) -> std::result::Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM instance_id WHERE initialized LIMIT 1")
        .fetch_optional(conn)
        .await
}

/// Service for deployment-level information
pub struct SystemService {
    pool: PgPool,
}

impl SystemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check database connectivity
    pub async fn check_database(&self) -> Result<()> {
        database::ping(&self.pool).await.map_err(|e| {
            tracing::warn!("Health check failed: {:?}", e);
            AppError::ServiceUnavailable("Database unreachable".to_string())
        })
    }

    /// Get the instance id created by schema evolution
    pub async fn instance_id(&self) -> Result<Uuid> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            tracing::error!("Failed to acquire connection for instance id: {:?}", e);
            AppError::Database(e)
        })?;

        instance_id(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read instance id: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("Instance id has not been initialized".to_string()))
    }
}

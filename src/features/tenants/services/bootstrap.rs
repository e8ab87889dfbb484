//! Default tenant hierarchy created for every new user.
//!
//! All identifiers are generated up front by [`TenantSeed::for_user`] so child
//! rows can reference their parents before anything is written. Persistence
//! happens in dependency order inside a single transaction; the first failing
//! insert aborts the whole bootstrap and nothing is left behind.

use std::fmt;

use chrono::{DateTime, Utc};
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::features::tenants::models::TemplateColumnDataType;
use crate::shared::constants::{
    DEFAULT_IMPORTER_NAME, DEFAULT_ORGANIZATION_NAME, DEFAULT_TEMPLATE_NAME,
    DEFAULT_WORKSPACE_NAME,
};

/// The signed-up user the tenant is created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: Uuid,
}

/// Identifiers handed back to the signup flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantIds {
    pub workspace_id: Uuid,
    pub organization_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapEntity {
    Organization,
    Workspace,
    OrganizationUser,
    WorkspaceUser,
    Importer,
    Template,
    TemplateColumns,
}

impl fmt::Display for BootstrapEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapEntity::Organization => "organization",
            BootstrapEntity::Workspace => "workspace",
            BootstrapEntity::OrganizationUser => "organization membership",
            BootstrapEntity::WorkspaceUser => "workspace membership",
            BootstrapEntity::Importer => "importer",
            BootstrapEntity::Template => "template",
            BootstrapEntity::TemplateColumns => "template columns",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to start tenant bootstrap transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("Failed to create {entity}: {source}")]
    Persist {
        entity: BootstrapEntity,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to commit tenant bootstrap: {0}")]
    Commit(#[source] sqlx::Error),
}

impl BootstrapError {
    /// The underlying database error
    pub fn database_error(&self) -> &sqlx::Error {
        match self {
            BootstrapError::Begin(e) | BootstrapError::Commit(e) => e,
            BootstrapError::Persist { source, .. } => source,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.database_error()
            .as_database_error()
            .is_some_and(|e| e.is_unique_violation())
    }
}

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewImporter {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub allowed_domains: Vec<String>,
    pub webhooks_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub importer_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewTemplateColumn {
    pub id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub key: String,
    pub description: String,
    pub required: bool,
    pub data_type: TemplateColumnDataType,
    pub index: i32,
    pub suggested_mappings: Vec<String>,
}

/// Everything written for one new user
#[derive(Debug, Clone)]
pub struct TenantSeed {
    pub user_id: Uuid,
    pub now: DateTime<Utc>,
    pub organization: NewOrganization,
    pub workspace: NewWorkspace,
    pub importer: NewImporter,
    pub template: NewTemplate,
    pub columns: Vec<NewTemplateColumn>,
}

impl TenantSeed {
    pub fn for_user(user: &UserIdentity) -> Self {
        let organization = NewOrganization {
            id: Uuid::new_v4(),
            name: DEFAULT_ORGANIZATION_NAME.to_string(),
        };
        let workspace = NewWorkspace {
            id: Uuid::new_v4(),
            organization_id: organization.id,
            name: DEFAULT_WORKSPACE_NAME.to_string(),
        };
        let importer = NewImporter {
            id: Uuid::new_v4(),
            workspace_id: workspace.id,
            name: DEFAULT_IMPORTER_NAME.to_string(),
            allowed_domains: Vec::new(),
            webhooks_enabled: false,
        };
        let template = NewTemplate {
            id: Uuid::new_v4(),
            workspace_id: workspace.id,
            importer_id: importer.id,
            name: DEFAULT_TEMPLATE_NAME.to_string(),
        };

        let column = |index: i32,
                      name: &str,
                      key: &str,
                      description: &str,
                      required: bool,
                      mappings: &[&str]| NewTemplateColumn {
            id: Uuid::new_v4(),
            template_id: template.id,
            name: name.to_string(),
            key: key.to_string(),
            description: description.to_string(),
            required,
            data_type: TemplateColumnDataType::String,
            index,
            suggested_mappings: mappings.iter().map(|m| m.to_string()).collect(),
        };
        let columns = vec![
            column(
                0,
                "First Name",
                "first_name",
                "The user's first name",
                false,
                &["first"],
            ),
            column(
                1,
                "Last Name",
                "last_name",
                "The user's last name",
                false,
                &["last"],
            ),
            column(2, "Email", "email", "The email of the user", true, &[]),
        ];

        Self {
            user_id: user.id,
            now: Utc::now(),
            organization,
            workspace,
            importer,
            template,
            columns,
        }
    }

    pub fn ids(&self) -> TenantIds {
        TenantIds {
            workspace_id: self.workspace.id,
            organization_id: self.organization.id,
        }
    }
}

/// Create the default organization, workspace, memberships, importer,
/// template and template columns for `user`.
pub async fn bootstrap_tenant(
    conn: &mut PgConnection,
    user: &UserIdentity,
) -> Result<TenantIds, BootstrapError> {
    let seed = TenantSeed::for_user(user);
    persist_seed(conn, &seed).await?;
    Ok(seed.ids())
}

/// Write a prepared seed atomically
pub async fn persist_seed(conn: &mut PgConnection, seed: &TenantSeed) -> Result<(), BootstrapError> {
    let mut tx = conn.begin().await.map_err(BootstrapError::Begin)?;

    let user_id = seed.user_id;
    let organization_id = seed.organization.id;
    let workspace_id = seed.workspace.id;

    // Dropping `tx` on an early return rolls back every earlier insert
    sqlx::query(
        r#"
        INSERT INTO organizations (id, name, created_by, created_at, updated_by, updated_at)
        VALUES ($1, $2, $3, $4, $3, $4)
        "#,
    )
    .bind(organization_id)
    .bind(&seed.organization.name)
    .bind(user_id)
    .bind(seed.now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(%user_id, %organization_id, "Error creating organization after sign up: {:?}", e);
        persist_error(BootstrapEntity::Organization, e)
    })?;

    sqlx::query(
        r#"
        INSERT INTO workspaces (id, organization_id, name, created_by, created_at, updated_by, updated_at)
        VALUES ($1, $2, $3, $4, $5, $4, $5)
        "#,
    )
    .bind(workspace_id)
    .bind(organization_id)
    .bind(&seed.workspace.name)
    .bind(user_id)
    .bind(seed.now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(%user_id, %workspace_id, "Error creating workspace after sign up: {:?}", e);
        persist_error(BootstrapEntity::Workspace, e)
    })?;

    sqlx::query("INSERT INTO organization_users (organization_id, user_id) VALUES ($1, $2)")
        .bind(organization_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(%user_id, %organization_id, "Error adding user to organization after sign up: {:?}", e);
            persist_error(BootstrapEntity::OrganizationUser, e)
        })?;

    sqlx::query("INSERT INTO workspace_users (workspace_id, user_id) VALUES ($1, $2)")
        .bind(workspace_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(%user_id, %workspace_id, "Error adding user to workspace after sign up: {:?}", e);
            persist_error(BootstrapEntity::WorkspaceUser, e)
        })?;

    sqlx::query(
        r#"
        INSERT INTO importers (id, workspace_id, name, allowed_domains, webhooks_enabled,
                               created_by, created_at, updated_by, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $7)
        "#,
    )
    .bind(seed.importer.id)
    .bind(workspace_id)
    .bind(&seed.importer.name)
    .bind(&seed.importer.allowed_domains)
    .bind(seed.importer.webhooks_enabled)
    .bind(user_id)
    .bind(seed.now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(%user_id, %workspace_id, "Error creating importer after sign up: {:?}", e);
        persist_error(BootstrapEntity::Importer, e)
    })?;

    sqlx::query(
        r#"
        INSERT INTO templates (id, workspace_id, importer_id, name, created_by, created_at, updated_by, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $5, $6)
        "#,
    )
    .bind(seed.template.id)
    .bind(workspace_id)
    .bind(seed.template.importer_id)
    .bind(&seed.template.name)
    .bind(user_id)
    .bind(seed.now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(%user_id, %workspace_id, "Error creating template after sign up: {:?}", e);
        persist_error(BootstrapEntity::Template, e)
    })?;

    let mut columns: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO template_columns (id, template_id, name, key, description, required, \
         data_type, index, suggested_mappings, created_by, created_at, updated_by, updated_at) ",
    );
    columns.push_values(&seed.columns, |mut row, column| {
        row.push_bind(column.id)
            .push_bind(column.template_id)
            .push_bind(&column.name)
            .push_bind(&column.key)
            .push_bind(&column.description)
            .push_bind(column.required)
            .push_bind(column.data_type.as_str())
            .push_bind(column.index)
            .push_bind(&column.suggested_mappings)
            .push_bind(user_id)
            .push_bind(seed.now)
            .push_bind(user_id)
            .push_bind(seed.now);
    });
    columns.build().execute(&mut *tx).await.map_err(|e| {
        tracing::error!(%user_id, %workspace_id, "Error creating template columns after sign up: {:?}", e);
        persist_error(BootstrapEntity::TemplateColumns, e)
    })?;

    tx.commit().await.map_err(BootstrapError::Commit)?;

    tracing::info!(%user_id, %organization_id, %workspace_id, "Tenant bootstrapped");
    Ok(())
}

fn persist_error(entity: BootstrapEntity, source: sqlx::Error) -> BootstrapError {
    BootstrapError::Persist { entity, source }
}

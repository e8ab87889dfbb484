use std::collections::{BTreeMap, BTreeSet};

use sqlx::{FromRow, PgConnection};

/// Whether `table.column` exists in the connection's current schema
pub async fn column_exists(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = $1
              AND column_name = $2
        )
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_one(conn)
    .await
}

/// Whether `table.column` exists and is declared nullable
pub async fn column_is_nullable(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = $1
              AND column_name = $2
              AND is_nullable = 'YES'
        )
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_one(conn)
    .await
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, FromRow)]
pub struct ColumnShape {
    pub table_name: String,
    pub column_name: String,
    pub udt_name: String,
    pub is_nullable: String,
    pub column_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, FromRow)]
pub struct ConstraintShape {
    pub table_name: String,
    pub constraint_name: String,
    pub constraint_type: String,
}

/// Structural view of the current schema, independent of column order and
/// of the schema's own name, so two databases can be compared directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub columns: BTreeSet<ColumnShape>,
    pub indexes: BTreeMap<String, String>,
    pub constraints: BTreeSet<ConstraintShape>,
}

impl SchemaSnapshot {
    pub async fn capture(conn: &mut PgConnection) -> Result<Self, sqlx::Error> {
        let schema: String = sqlx::query_scalar("SELECT current_schema()")
            .fetch_one(&mut *conn)
            .await?;

        let columns = sqlx::query_as::<_, ColumnShape>(
            r#"
            SELECT table_name::text, column_name::text, udt_name::text,
                   is_nullable::text, column_default::text
            FROM information_schema.columns
            WHERE table_schema = current_schema()
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let indexes: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT indexname::text, indexdef
            FROM pg_indexes
            WHERE schemaname = current_schema()
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        // NOT NULL constraints carry generated names and are already covered
        // by ColumnShape::is_nullable
        let constraints = sqlx::query_as::<_, ConstraintShape>(
            r#"
            SELECT table_name::text, constraint_name::text, constraint_type::text
            FROM information_schema.table_constraints
            WHERE table_schema = current_schema()
              AND constraint_name NOT LIKE '%not_null'
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let qualifier = format!("{}.", schema);
        Ok(Self {
            columns: columns.into_iter().collect(),
            indexes: indexes
                .into_iter()
                .map(|(name, def)| (name, def.replace(&qualifier, "")))
                .collect(),
            constraints: constraints.into_iter().collect(),
        })
    }

    pub fn tables(&self) -> BTreeSet<&str> {
        self.columns.iter().map(|c| c.table_name.as_str()).collect()
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnShape> {
        self.columns
            .iter()
            .find(|c| c.table_name == table && c.column_name == column)
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(table: &str, column: &str) -> ColumnShape {
        ColumnShape {
            table_name: table.to_string(),
            column_name: column.to_string(),
            udt_name: "uuid".to_string(),
            is_nullable: "NO".to_string(),
            column_default: None,
        }
    }

    #[test]
    fn test_snapshot_lookups() {
        let mut snapshot = SchemaSnapshot::default();
        snapshot.columns.insert(shape("workspaces", "id"));
        snapshot.columns.insert(shape("workspaces", "organization_id"));
        snapshot.columns.insert(shape("organizations", "id"));
        snapshot.indexes.insert(
            "workspaces_api_key_idx".to_string(),
            "CREATE UNIQUE INDEX workspaces_api_key_idx ON workspaces USING btree (api_key)"
                .to_string(),
        );

        assert_eq!(
            snapshot.tables().into_iter().collect::<Vec<_>>(),
            vec!["organizations", "workspaces"]
        );
        assert!(snapshot.column("workspaces", "organization_id").is_some());
        assert!(snapshot.column("organizations", "organization_id").is_none());
        assert!(snapshot.has_index("workspaces_api_key_idx"));
        assert!(!snapshot.has_index("missing_idx"));
    }

    #[test]
    fn test_snapshot_equality_ignores_insertion_order() {
        let mut a = SchemaSnapshot::default();
        a.columns.insert(shape("t", "a"));
        a.columns.insert(shape("t", "b"));
        let mut b = SchemaSnapshot::default();
        b.columns.insert(shape("t", "b"));
        b.columns.insert(shape("t", "a"));
        assert_eq!(a, b);
    }
}

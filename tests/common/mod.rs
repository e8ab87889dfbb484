#![allow(dead_code)]

use anyhow::{Context, Result};
use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use importer_admin::core::schema::{evolve_schema, EvolveReport, SchemaSnapshot};

/// A connection whose search_path points at throwaway schemas, so tests can
/// share one database without seeing each other's tables.
pub struct TestDb {
    pub conn: PgConnection,
    schemas: Vec<String>,
}

impl TestDb {
    /// Connect to `TEST_DATABASE_URL`. Returns `None` when it is unset so
    /// database tests pass trivially on machines without Postgres.
    pub async fn connect() -> Result<Option<Self>> {
        let _ = dotenvy::dotenv();
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return Ok(None);
        };

        let conn = PgConnection::connect(&url)
            .await
            .context("failed to connect to TEST_DATABASE_URL")?;

        let mut db = Self {
            conn,
            schemas: Vec::new(),
        };
        db.fresh_schema().await?;
        Ok(Some(db))
    }

    /// Create an empty schema and make it the current one
    pub async fn fresh_schema(&mut self) -> Result<String> {
        let schema = format!("evolve_test_{}", Uuid::new_v4().simple());
        sqlx::raw_sql(&format!("CREATE SCHEMA {}", schema))
            .execute(&mut self.conn)
            .await?;
        self.schemas.push(schema.clone());
        self.use_schema(&schema).await?;
        Ok(schema)
    }

    pub async fn use_schema(&mut self, schema: &str) -> Result<()> {
        sqlx::raw_sql(&format!("SET search_path TO {}", schema))
            .execute(&mut self.conn)
            .await?;
        Ok(())
    }

    pub async fn evolve(&mut self) -> Result<EvolveReport> {
        Ok(evolve_schema(&mut self.conn).await?)
    }

    pub async fn snapshot(&mut self) -> Result<SchemaSnapshot> {
        Ok(SchemaSnapshot::capture(&mut self.conn).await?)
    }

    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql).execute(&mut self.conn).await?;
        Ok(())
    }

    /// Drop every schema this handle created
    pub async fn cleanup(mut self) -> Result<()> {
        for schema in std::mem::take(&mut self.schemas) {
            sqlx::raw_sql(&format!("DROP SCHEMA IF EXISTS {} CASCADE", schema))
                .execute(&mut self.conn)
                .await?;
        }
        self.conn.close().await?;
        Ok(())
    }
}

/// Connect and evolve a fresh schema, or bail out of the test when no
/// database is configured.
macro_rules! evolved_db_or_skip {
    () => {
        match common::TestDb::connect().await? {
            Some(mut db) => {
                db.evolve().await?;
                db
            }
            None => return Ok(()),
        }
    };
}

macro_rules! db_or_skip {
    () => {
        match common::TestDb::connect().await? {
            Some(db) => db,
            None => return Ok(()),
        }
    };
}

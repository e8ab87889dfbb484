//! Idempotent schema evolution.
//!
//! [`evolve_schema`] walks [`steps::STEPS`] in order. Each step checks its
//! precondition and applies its effect inside one transaction, so a step is
//! either fully applied or not at all. Running the sequence again from any
//! earlier state converges on the same schema. The first failure aborts the
//! run; steps committed before it stay committed.

pub mod base;
pub mod inspect;
pub mod steps;

use sqlx::{Connection, PgConnection};
use thiserror::Error;

pub use inspect::SchemaSnapshot;
pub use steps::{find_step, MigrationStep, Precondition, STEPS};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl SchemaError {
    pub fn step(&self) -> &'static str {
        match self {
            SchemaError::Step { step, .. } => *step,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Self-guarding SQL ran unconditionally
    Executed,
    /// The precondition held and the effect ran
    Applied,
    /// The precondition did not hold
    Skipped,
}

#[derive(Debug, Default, Clone)]
pub struct EvolveReport {
    pub steps: Vec<(&'static str, StepOutcome)>,
}

impl EvolveReport {
    pub fn count(&self, outcome: StepOutcome) -> usize {
        self.steps.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn outcome_of(&self, name: &str) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|(step, _)| *step == name)
            .map(|(_, outcome)| *outcome)
    }
}

/// Bring the schema reachable through `conn` up to date.
pub async fn evolve_schema(conn: &mut PgConnection) -> Result<EvolveReport, SchemaError> {
    let mut report = EvolveReport::default();

    for step in STEPS {
        let outcome = apply_step(conn, step).await.map_err(|e| {
            tracing::error!(step = step.name, "Schema evolution failed: {:?}", e);
            e
        })?;
        report.steps.push((step.name, outcome));
    }

    tracing::info!(
        "Schema evolution finished: steps={}, applied={}, skipped={}",
        report.steps.len(),
        report.count(StepOutcome::Applied),
        report.count(StepOutcome::Skipped)
    );

    Ok(report)
}

/// Apply one step in its own transaction
pub async fn apply_step(
    conn: &mut PgConnection,
    step: &MigrationStep,
) -> Result<StepOutcome, SchemaError> {
    let fail = |source: sqlx::Error| SchemaError::Step {
        step: step.name,
        source,
    };

    let mut tx = conn.begin().await.map_err(fail)?;

    let holds = match step.precondition {
        Precondition::SelfGuarding => None,
        Precondition::ColumnMissing { table, column } => Some(
            !inspect::column_exists(&mut *tx, table, column)
                .await
                .map_err(fail)?,
        ),
        Precondition::ColumnPresent { table, column } => Some(
            inspect::column_exists(&mut *tx, table, column)
                .await
                .map_err(fail)?,
        ),
        Precondition::ColumnNullable { table, column } => Some(
            inspect::column_is_nullable(&mut *tx, table, column)
                .await
                .map_err(fail)?,
        ),
    };

    let outcome = match holds {
        None => StepOutcome::Executed,
        Some(true) => StepOutcome::Applied,
        Some(false) => StepOutcome::Skipped,
    };

    if outcome != StepOutcome::Skipped {
        sqlx::raw_sql(step.sql)
            .execute(&mut *tx)
            .await
            .map_err(fail)?;
    }

    tx.commit().await.map_err(fail)?;

    tracing::debug!(step = step.name, ?outcome, "Schema step done");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let report = EvolveReport {
            steps: vec![
                ("a", StepOutcome::Executed),
                ("b", StepOutcome::Applied),
                ("c", StepOutcome::Skipped),
                ("d", StepOutcome::Skipped),
            ],
        };
        assert_eq!(report.count(StepOutcome::Executed), 1);
        assert_eq!(report.count(StepOutcome::Applied), 1);
        assert_eq!(report.count(StepOutcome::Skipped), 2);
        assert_eq!(report.outcome_of("b"), Some(StepOutcome::Applied));
        assert_eq!(report.outcome_of("z"), None);
    }

    #[test]
    fn test_error_names_step() {
        let err = SchemaError::Step {
            step: "create_workspaces",
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(err.step(), "create_workspaces");
        assert!(err.to_string().contains("create_workspaces"));
    }
}

use super::base::*;

/// Guard evaluated against the live schema before a step's effect runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The SQL guards itself (`IF NOT EXISTS` / `IF EXISTS`) and always runs
    SelfGuarding,
    /// Run only while `table.column` is absent
    ColumnMissing {
        table: &'static str,
        column: &'static str,
    },
    /// Run only while `table.column` is present
    ColumnPresent {
        table: &'static str,
        column: &'static str,
    },
    /// Run only while `table.column` exists and accepts NULL
    ColumnNullable {
        table: &'static str,
        column: &'static str,
    },
}

/// One named, forward-only schema change.
#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    pub name: &'static str,
    pub precondition: Precondition,
    pub sql: &'static str,
}

impl MigrationStep {
    const fn guarded(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            precondition: Precondition::SelfGuarding,
            sql,
        }
    }

    const fn when_missing(
        name: &'static str,
        table: &'static str,
        column: &'static str,
        sql: &'static str,
    ) -> Self {
        Self {
            name,
            precondition: Precondition::ColumnMissing { table, column },
            sql,
        }
    }

    const fn when_present(
        name: &'static str,
        table: &'static str,
        column: &'static str,
        sql: &'static str,
    ) -> Self {
        Self {
            name,
            precondition: Precondition::ColumnPresent { table, column },
            sql,
        }
    }

    const fn when_nullable(
        name: &'static str,
        table: &'static str,
        column: &'static str,
        sql: &'static str,
    ) -> Self {
        Self {
            name,
            precondition: Precondition::ColumnNullable { table, column },
            sql,
        }
    }
}

// Add nullable, copy created_at into existing rows, then constrain.
const BACKFILL_UPLOADS_UPDATED_AT_SQL: &str = r#"
ALTER TABLE uploads ADD COLUMN updated_at timestamptz;
UPDATE uploads SET updated_at = created_at WHERE updated_at IS NULL;
ALTER TABLE uploads ALTER COLUMN updated_at SET DEFAULT now();
ALTER TABLE uploads ALTER COLUMN updated_at SET NOT NULL;
"#;

const BACKFILL_IMPORTS_UPDATED_AT_SQL: &str = r#"
ALTER TABLE imports ADD COLUMN updated_at timestamptz;
UPDATE imports SET updated_at = created_at WHERE updated_at IS NULL;
ALTER TABLE imports ALTER COLUMN updated_at SET DEFAULT now();
ALTER TABLE imports ALTER COLUMN updated_at SET NOT NULL;
"#;

// Positions restart at 0 per template, ordered by creation. Soft-deleted rows
// are numbered in their own sequence so active positions stay contiguous.
const BACKFILL_TEMPLATE_COLUMNS_INDEX_SQL: &str = r#"
ALTER TABLE template_columns ADD COLUMN index integer;
UPDATE template_columns
SET index = ranked.position
FROM (
    SELECT id,
           row_number() OVER (
               PARTITION BY template_id, (deleted_at IS NULL)
               ORDER BY created_at, id
           ) - 1 AS position
    FROM template_columns
) AS ranked
WHERE template_columns.id = ranked.id;
ALTER TABLE template_columns ALTER COLUMN index SET NOT NULL;
"#;

// Older backfills left `index` nullable and only numbered active rows. Rows
// still missing a position are appended after the highest position in their
// sequence.
const CONSTRAIN_TEMPLATE_COLUMNS_INDEX_SQL: &str = r#"
UPDATE template_columns
SET index = ranked.position
FROM (
    SELECT c.id,
           coalesce(
               (SELECT max(t.index)
                FROM template_columns t
                WHERE t.template_id = c.template_id
                  AND (t.deleted_at IS NULL) = (c.deleted_at IS NULL)),
               -1
           ) + row_number() OVER (
               PARTITION BY c.template_id, (c.deleted_at IS NULL)
               ORDER BY c.created_at, c.id
           ) AS position
    FROM template_columns c
    WHERE c.index IS NULL
) AS ranked
WHERE template_columns.id = ranked.id;
ALTER TABLE template_columns ALTER COLUMN index SET NOT NULL;
"#;

/// The full evolution sequence, oldest change last. Order matters: later
/// steps may rely on tables or columns produced by earlier ones.
pub const STEPS: &[MigrationStep] = &[
    // Tables in their current shape
    MigrationStep::guarded("create_instance_id", CREATE_INSTANCE_ID_SQL),
    MigrationStep::guarded("create_organizations", CREATE_ORGANIZATIONS_SQL),
    MigrationStep::guarded("create_workspaces", CREATE_WORKSPACES_SQL),
    MigrationStep::guarded("create_organization_users", CREATE_ORGANIZATION_USERS_SQL),
    MigrationStep::guarded("create_workspace_users", CREATE_WORKSPACE_USERS_SQL),
    MigrationStep::guarded("create_importers", CREATE_IMPORTERS_SQL),
    MigrationStep::guarded("create_templates", CREATE_TEMPLATES_SQL),
    MigrationStep::guarded("create_template_columns", CREATE_TEMPLATE_COLUMNS_SQL),
    MigrationStep::guarded("create_uploads", CREATE_UPLOADS_SQL),
    MigrationStep::guarded("create_upload_columns", CREATE_UPLOAD_COLUMNS_SQL),
    MigrationStep::guarded("create_imports", CREATE_IMPORTS_SQL),
    MigrationStep::guarded("create_validations", CREATE_VALIDATIONS_SQL),
    // Alterations carried forward from earlier generations
    MigrationStep::guarded(
        "drop_uploads_storage_bucket",
        "ALTER TABLE uploads DROP COLUMN IF EXISTS storage_bucket;",
    ),
    MigrationStep::guarded(
        "drop_imports_file_metadata",
        r#"
        ALTER TABLE imports DROP COLUMN IF EXISTS file_type;
        ALTER TABLE imports DROP COLUMN IF EXISTS file_extension;
        ALTER TABLE imports DROP COLUMN IF EXISTS file_size;
        ALTER TABLE imports DROP COLUMN IF EXISTS storage_bucket;
        "#,
    ),
    MigrationStep::guarded(
        "add_importers_webhooks_enabled",
        "ALTER TABLE importers ADD COLUMN IF NOT EXISTS webhooks_enabled bool NOT NULL DEFAULT false;",
    ),
    // Older tables declared the column without a default
    MigrationStep::guarded(
        "default_importers_webhooks_enabled",
        "ALTER TABLE importers ALTER COLUMN webhooks_enabled SET DEFAULT false;",
    ),
    MigrationStep::guarded(
        "drop_importers_webhook_url",
        "ALTER TABLE importers DROP COLUMN IF EXISTS webhook_url;",
    ),
    MigrationStep::guarded(
        "add_template_columns_description",
        "ALTER TABLE template_columns ADD COLUMN IF NOT EXISTS description text;",
    ),
    MigrationStep::guarded(
        "drop_uploads_is_parsed",
        "ALTER TABLE uploads DROP COLUMN IF EXISTS is_parsed;",
    ),
    MigrationStep::guarded(
        "add_uploads_header_row_index",
        "ALTER TABLE uploads ADD COLUMN IF NOT EXISTS header_row_index integer;",
    ),
    MigrationStep::guarded(
        "add_importers_skip_header_row_selection",
        "ALTER TABLE importers ADD COLUMN IF NOT EXISTS skip_header_row_selection bool NOT NULL DEFAULT false;",
    ),
    MigrationStep::guarded(
        "add_uploads_template",
        "ALTER TABLE uploads ADD COLUMN IF NOT EXISTS template jsonb;",
    ),
    MigrationStep::guarded(
        "drop_upload_columns_template_column_fk",
        "ALTER TABLE upload_columns DROP CONSTRAINT IF EXISTS fk_template_column_id;",
    ),
    MigrationStep::guarded(
        "add_uploads_schemaless",
        "ALTER TABLE uploads ADD COLUMN IF NOT EXISTS schemaless bool NOT NULL DEFAULT false;",
    ),
    MigrationStep::guarded(
        "add_imports_row_counts",
        r#"
        ALTER TABLE imports ADD COLUMN IF NOT EXISTS num_error_rows integer;
        ALTER TABLE imports ADD COLUMN IF NOT EXISTS num_valid_rows integer;
        "#,
    ),
    MigrationStep::guarded(
        "add_template_columns_suggested_mappings",
        "ALTER TABLE template_columns ADD COLUMN IF NOT EXISTS suggested_mappings text[] NOT NULL DEFAULT '{}';",
    ),
    MigrationStep::guarded(
        "add_imports_is_complete",
        "ALTER TABLE imports ADD COLUMN IF NOT EXISTS is_complete boolean NOT NULL DEFAULT false;",
    ),
    MigrationStep::guarded(
        "add_imports_deleted_at",
        "ALTER TABLE imports ADD COLUMN IF NOT EXISTS deleted_at timestamp with time zone;",
    ),
    MigrationStep::guarded(
        "replace_imports_upload_id_unique_index",
        r#"
        DROP INDEX IF EXISTS imports_upload_id_idx;
        CREATE INDEX IF NOT EXISTS imports_upload_id_non_unique_idx ON imports (upload_id);
        CREATE UNIQUE INDEX IF NOT EXISTS imports_upload_id_deleted_at_idx ON imports (upload_id) WHERE (deleted_at IS NULL);
        "#,
    ),
    MigrationStep::guarded(
        "add_template_columns_data_type",
        "ALTER TABLE template_columns ADD COLUMN IF NOT EXISTS data_type text NOT NULL DEFAULT 'string';",
    ),
    MigrationStep::guarded(
        "add_imports_data_types",
        "ALTER TABLE imports ADD COLUMN IF NOT EXISTS data_types jsonb;",
    ),
    MigrationStep::when_present(
        "rename_validations_type_to_validate",
        "validations",
        "type",
        "ALTER TABLE validations RENAME COLUMN type TO validate;",
    ),
    MigrationStep::when_present(
        "rename_validations_value_to_options",
        "validations",
        "value",
        "ALTER TABLE validations RENAME COLUMN value TO options;",
    ),
    MigrationStep::guarded(
        "drop_validations_options_not_null",
        "ALTER TABLE validations ALTER COLUMN options DROP NOT NULL;",
    ),
    MigrationStep::guarded(
        "add_uploads_sheet_list",
        "ALTER TABLE uploads ADD COLUMN IF NOT EXISTS sheet_list text[];",
    ),
    MigrationStep::when_missing(
        "backfill_uploads_updated_at",
        "uploads",
        "updated_at",
        BACKFILL_UPLOADS_UPDATED_AT_SQL,
    ),
    MigrationStep::when_missing(
        "backfill_imports_updated_at",
        "imports",
        "updated_at",
        BACKFILL_IMPORTS_UPDATED_AT_SQL,
    ),
    MigrationStep::guarded(
        "add_uploads_matched_header_row_index",
        "ALTER TABLE uploads ADD COLUMN IF NOT EXISTS matched_header_row_index integer;",
    ),
    MigrationStep::when_missing(
        "backfill_template_columns_index",
        "template_columns",
        "index",
        BACKFILL_TEMPLATE_COLUMNS_INDEX_SQL,
    ),
    MigrationStep::when_nullable(
        "constrain_template_columns_index",
        "template_columns",
        "index",
        CONSTRAIN_TEMPLATE_COLUMNS_INDEX_SQL,
    ),
];

/// Look up a step by name
pub fn find_step(name: &str) -> Option<&'static MigrationStep> {
    STEPS.iter().find(|step| step.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_step_names_are_unique() {
        let mut seen = HashSet::new();
        for step in STEPS {
            assert!(seen.insert(step.name), "duplicate step name {}", step.name);
        }
    }

    #[test]
    fn test_self_guarding_steps_only_use_guarded_ddl() {
        for step in STEPS
            .iter()
            .filter(|s| s.precondition == Precondition::SelfGuarding)
        {
            let sql = step.sql.to_ascii_uppercase();
            for statement in sql.split(';').map(str::trim).filter(|s| !s.is_empty()) {
                let guarded = statement.contains("IF NOT EXISTS")
                    || statement.contains("IF EXISTS")
                    || statement.contains("ON CONFLICT DO NOTHING")
                    || statement.contains("DROP NOT NULL")
                    || statement.contains("SET DEFAULT");
                assert!(
                    guarded,
                    "step {} has an unguarded statement: {}",
                    step.name, statement
                );
            }
        }
    }

    #[test]
    fn test_tables_created_before_alterations() {
        let last_create = STEPS
            .iter()
            .rposition(|s| s.name.starts_with("create_"))
            .unwrap();
        let first_alter = STEPS
            .iter()
            .position(|s| !s.name.starts_with("create_"))
            .unwrap();
        assert!(last_create < first_alter);
        assert_eq!(STEPS[0].name, "create_instance_id");
    }

    #[test]
    fn test_parents_created_before_children() {
        let position = |name: &str| STEPS.iter().position(|s| s.name == name).unwrap();
        assert!(position("create_organizations") < position("create_workspaces"));
        assert!(position("create_workspaces") < position("create_importers"));
        assert!(position("create_importers") < position("create_templates"));
        assert!(position("create_templates") < position("create_template_columns"));
        assert!(position("create_uploads") < position("create_imports"));
        assert!(position("create_template_columns") < position("create_validations"));
    }

    #[test]
    fn test_validation_renames_are_guarded_by_presence() {
        let rename = find_step("rename_validations_type_to_validate").unwrap();
        assert_eq!(
            rename.precondition,
            Precondition::ColumnPresent {
                table: "validations",
                column: "type"
            }
        );
        let rename = find_step("rename_validations_value_to_options").unwrap();
        assert_eq!(
            rename.precondition,
            Precondition::ColumnPresent {
                table: "validations",
                column: "value"
            }
        );
        // options must be nullable only after the rename has had a chance to run
        let position = |name: &str| STEPS.iter().position(|s| s.name == name).unwrap();
        assert!(
            position("rename_validations_value_to_options")
                < position("drop_validations_options_not_null")
        );
    }

    #[test]
    fn test_backfills_constrain_after_populating() {
        for name in [
            "backfill_uploads_updated_at",
            "backfill_imports_updated_at",
            "backfill_template_columns_index",
        ] {
            let step = find_step(name).unwrap();
            assert!(matches!(step.precondition, Precondition::ColumnMissing { .. }));

            let sql = step.sql.to_ascii_uppercase();
            let add = sql.find("ADD COLUMN").unwrap();
            let update = sql.find("UPDATE ").unwrap();
            let not_null = sql.find("SET NOT NULL").unwrap();
            assert!(add < update && update < not_null, "bad ordering in {}", name);
            assert!(!sql.contains("ADD COLUMN IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_updated_at_backfills_copy_created_at() {
        for name in ["backfill_uploads_updated_at", "backfill_imports_updated_at"] {
            let sql = find_step(name).unwrap().sql;
            assert!(sql.contains("SET updated_at = created_at WHERE updated_at IS NULL"));
            assert!(sql.contains("SET DEFAULT now()"));
        }
    }

    #[test]
    fn test_imports_upload_uniqueness_is_partial() {
        let sql = find_step("replace_imports_upload_id_unique_index").unwrap().sql;
        assert!(sql.contains("DROP INDEX IF EXISTS imports_upload_id_idx"));
        assert!(sql.contains("imports_upload_id_deleted_at_idx ON imports (upload_id) WHERE (deleted_at IS NULL)"));
    }

    #[test]
    fn test_webhooks_default_follows_column_add() {
        let position = |name: &str| STEPS.iter().position(|s| s.name == name).unwrap();
        assert_eq!(
            position("default_importers_webhooks_enabled"),
            position("add_importers_webhooks_enabled") + 1
        );
        let step = find_step("default_importers_webhooks_enabled").unwrap();
        assert_eq!(step.precondition, Precondition::SelfGuarding);
        assert!(step.sql.contains("SET DEFAULT false"));
    }

    #[test]
    fn test_nullable_index_is_constrained_last() {
        let step = STEPS.last().unwrap();
        assert_eq!(step.name, "constrain_template_columns_index");
        assert_eq!(
            step.precondition,
            Precondition::ColumnNullable {
                table: "template_columns",
                column: "index"
            }
        );

        let sql = step.sql;
        let fill = sql.find("WHERE c.index IS NULL").unwrap();
        let not_null = sql.find("SET NOT NULL").unwrap();
        assert!(fill < not_null);
        assert!(sql.contains("PARTITION BY c.template_id, (c.deleted_at IS NULL)"));
    }

    #[test]
    fn test_find_step_unknown() {
        assert!(find_step("does_not_exist").is_none());
    }
}

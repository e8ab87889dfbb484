//! Table definitions in their current shape.
//!
//! Every statement is create-if-absent. Tables that already exist from an
//! earlier generation are left untouched here and brought forward by the
//! guarded alterations in `steps`.

pub const CREATE_INSTANCE_ID_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS instance_id (
    id          uuid PRIMARY KEY NOT NULL,
    initialized bool UNIQUE      NOT NULL DEFAULT true,
    CONSTRAINT initialized CHECK (initialized)
);
INSERT INTO instance_id (id) VALUES (gen_random_uuid()) ON CONFLICT DO NOTHING;
"#;

pub const CREATE_ORGANIZATIONS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS organizations (
    id         uuid PRIMARY KEY         NOT NULL DEFAULT gen_random_uuid(),
    name       text                     NOT NULL,
    created_by uuid                     NOT NULL,
    created_at timestamp with time zone NOT NULL,
    updated_by uuid                     NOT NULL,
    updated_at timestamp with time zone NOT NULL,
    deleted_by uuid,
    deleted_at timestamp with time zone
);
"#;

pub const CREATE_WORKSPACES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS workspaces (
    id              uuid PRIMARY KEY         NOT NULL DEFAULT gen_random_uuid(),
    organization_id uuid                     NOT NULL,
    name            text                     NOT NULL,
    api_key         text                     NOT NULL DEFAULT concat('tf_', replace(gen_random_uuid()::text, '-', '')),
    created_by      uuid                     NOT NULL,
    created_at      timestamp with time zone NOT NULL,
    updated_by      uuid                     NOT NULL,
    updated_at      timestamp with time zone NOT NULL,
    deleted_by      uuid,
    deleted_at      timestamp with time zone,
    CONSTRAINT fk_organization_id
        FOREIGN KEY (organization_id)
            REFERENCES organizations (id)
);
CREATE INDEX IF NOT EXISTS workspaces_organization_id_idx ON workspaces (organization_id);
CREATE UNIQUE INDEX IF NOT EXISTS workspaces_api_key_idx ON workspaces (api_key);
"#;

pub const CREATE_ORGANIZATION_USERS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS organization_users (
    organization_id uuid NOT NULL,
    user_id         uuid NOT NULL,
    PRIMARY KEY (organization_id, user_id),
    CONSTRAINT fk_organization_id
        FOREIGN KEY (organization_id)
            REFERENCES organizations (id)
            ON DELETE CASCADE
            ON UPDATE NO ACTION
);
CREATE INDEX IF NOT EXISTS organization_users_organization_id_idx ON organization_users (organization_id);
CREATE INDEX IF NOT EXISTS organization_users_user_id_idx ON organization_users (user_id);
"#;

pub const CREATE_WORKSPACE_USERS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS workspace_users (
    workspace_id uuid NOT NULL,
    user_id      uuid NOT NULL,
    PRIMARY KEY (workspace_id, user_id),
    CONSTRAINT fk_workspace_id
        FOREIGN KEY (workspace_id)
            REFERENCES workspaces (id)
            ON DELETE CASCADE
            ON UPDATE NO ACTION
);
CREATE INDEX IF NOT EXISTS workspace_users_workspace_id_idx ON workspace_users (workspace_id);
CREATE INDEX IF NOT EXISTS workspace_users_user_id_idx ON workspace_users (user_id);
"#;

pub const CREATE_IMPORTERS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS importers (
    id               uuid PRIMARY KEY         NOT NULL DEFAULT gen_random_uuid(),
    workspace_id     uuid                     NOT NULL,
    name             text                     NOT NULL,
    allowed_domains  text[]                   NOT NULL,
    webhooks_enabled bool                     NOT NULL DEFAULT false,
    created_by       uuid                     NOT NULL,
    created_at       timestamp with time zone NOT NULL,
    updated_by       uuid                     NOT NULL,
    updated_at       timestamp with time zone NOT NULL,
    deleted_by       uuid,
    deleted_at       timestamp with time zone,
    CONSTRAINT fk_workspace_id
        FOREIGN KEY (workspace_id)
            REFERENCES workspaces (id)
);
CREATE INDEX IF NOT EXISTS importers_workspace_id_created_at_idx ON importers (workspace_id, created_at);
"#;

pub const CREATE_TEMPLATES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS templates (
    id           uuid PRIMARY KEY         NOT NULL DEFAULT gen_random_uuid(),
    workspace_id uuid                     NOT NULL,
    importer_id  uuid                     NOT NULL,
    name         text                     NOT NULL,
    created_by   uuid                     NOT NULL,
    created_at   timestamp with time zone NOT NULL,
    updated_by   uuid                     NOT NULL,
    updated_at   timestamp with time zone NOT NULL,
    deleted_by   uuid,
    deleted_at   timestamp with time zone,
    CONSTRAINT fk_workspace_id
        FOREIGN KEY (workspace_id)
            REFERENCES workspaces (id),
    CONSTRAINT fk_importer_id_id
        FOREIGN KEY (importer_id)
            REFERENCES importers (id)
);
CREATE INDEX IF NOT EXISTS templates_workspace_id_created_at_idx ON templates (workspace_id, created_at);
CREATE UNIQUE INDEX IF NOT EXISTS templates_importer_id_idx ON templates (importer_id) WHERE (deleted_at IS NULL);
"#;

pub const CREATE_TEMPLATE_COLUMNS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS template_columns (
    id          uuid PRIMARY KEY         NOT NULL DEFAULT gen_random_uuid(),
    template_id uuid                     NOT NULL,
    name        text                     NOT NULL,
    key         text                     NOT NULL,
    required    bool                     NOT NULL DEFAULT false,
    index       integer                  NOT NULL, -- 0-based position within the template
    created_by  uuid                     NOT NULL,
    created_at  timestamp with time zone NOT NULL,
    updated_by  uuid                     NOT NULL,
    updated_at  timestamp with time zone NOT NULL,
    deleted_by  uuid,
    deleted_at  timestamp with time zone,
    CONSTRAINT fk_template_id
        FOREIGN KEY (template_id)
            REFERENCES templates (id)
);
CREATE UNIQUE INDEX IF NOT EXISTS template_columns_template_id_key_idx ON template_columns (template_id, key) WHERE (deleted_at IS NULL);
CREATE INDEX IF NOT EXISTS template_columns_template_id_idx ON template_columns (template_id);
"#;

pub const CREATE_UPLOADS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS uploads (
    id             uuid PRIMARY KEY NOT NULL DEFAULT gen_random_uuid(),
    tus_id         varchar(32)      NOT NULL,
    importer_id    uuid             NOT NULL,
    workspace_id   uuid             NOT NULL,
    file_name      text,
    file_type      text,
    file_extension text,
    file_size      bigint,
    num_rows       integer,
    num_columns    integer,
    metadata       jsonb            NOT NULL DEFAULT '{}'::jsonb, -- caller-supplied opaque data
    is_stored      bool             NOT NULL DEFAULT false,
    error          text,
    created_at     timestamptz      NOT NULL DEFAULT now(),
    updated_at     timestamptz      NOT NULL DEFAULT now(),
    CONSTRAINT fk_importer_id
        FOREIGN KEY (importer_id)
            REFERENCES importers (id),
    CONSTRAINT fk_workspace_id
        FOREIGN KEY (workspace_id)
            REFERENCES workspaces (id)
);
CREATE UNIQUE INDEX IF NOT EXISTS uploads_tus_id_idx ON uploads (tus_id);
CREATE INDEX IF NOT EXISTS uploads_workspace_id_created_at_idx ON uploads (workspace_id, created_at);
CREATE INDEX IF NOT EXISTS uploads_importer_id_idx ON uploads (importer_id);
"#;

pub const CREATE_UPLOAD_COLUMNS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS upload_columns (
    id                 uuid PRIMARY KEY NOT NULL DEFAULT gen_random_uuid(),
    upload_id          uuid             NOT NULL,
    name               text             NOT NULL,
    index              integer          NOT NULL, -- 0-based position within the file
    sample_data        text[]           NOT NULL,
    template_column_id uuid,
    UNIQUE (upload_id, index),
    CONSTRAINT fk_upload_id
        FOREIGN KEY (upload_id)
            REFERENCES uploads (id)
);
CREATE INDEX IF NOT EXISTS upload_columns_upload_id_idx ON upload_columns (upload_id);
"#;

pub const CREATE_IMPORTS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS imports (
    id                   uuid PRIMARY KEY NOT NULL DEFAULT gen_random_uuid(),
    upload_id            uuid             NOT NULL,
    importer_id          uuid             NOT NULL,
    workspace_id         uuid             NOT NULL,
    num_rows             integer,
    num_columns          integer,
    num_processed_values integer,
    metadata             jsonb            NOT NULL DEFAULT '{}'::jsonb, -- caller-supplied opaque data
    is_stored            bool             NOT NULL DEFAULT false,
    created_at           timestamptz      NOT NULL DEFAULT now(),
    updated_at           timestamptz      NOT NULL DEFAULT now(),
    CONSTRAINT fk_upload_id
        FOREIGN KEY (upload_id)
            REFERENCES uploads (id),
    CONSTRAINT fk_importer_id
        FOREIGN KEY (importer_id)
            REFERENCES importers (id),
    CONSTRAINT fk_workspace_id
        FOREIGN KEY (workspace_id)
            REFERENCES workspaces (id)
);
CREATE INDEX IF NOT EXISTS imports_workspace_id_created_at_idx ON imports (workspace_id, created_at);
CREATE INDEX IF NOT EXISTS imports_importer_id_idx ON imports (importer_id);
"#;

pub const CREATE_VALIDATIONS_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS validations (
    id                 serial PRIMARY KEY,
    template_column_id uuid NOT NULL,
    validate           text NOT NULL,
    options            jsonb,
    message            text,
    severity           text NOT NULL DEFAULT 'error',
    deleted_at         timestamp with time zone,
    CONSTRAINT fk_template_column_id
        FOREIGN KEY (template_column_id)
            REFERENCES template_columns (id)
);
CREATE INDEX IF NOT EXISTS validations_template_column_id_idx ON validations (template_column_id);
"#;

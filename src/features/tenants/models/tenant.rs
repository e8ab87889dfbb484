use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{API_KEY_LENGTH, API_KEY_PREFIX};

/// Database model for organization
#[derive(Debug, Clone, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Database model for workspace
#[derive(Debug, Clone, FromRow)]
pub struct Workspace {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub api_key: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Workspace {
    /// Check the key matches the generated `tf_<32 hex>` shape
    pub fn has_generated_api_key(&self) -> bool {
        is_generated_api_key(&self.api_key)
    }
}

pub fn is_generated_api_key(key: &str) -> bool {
    key.len() == API_KEY_LENGTH
        && key
            .strip_prefix(API_KEY_PREFIX)
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Database model for importer
#[derive(Debug, Clone, FromRow)]
pub struct Importer {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub allowed_domains: Vec<String>,
    pub webhooks_enabled: bool,
    pub skip_header_row_selection: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Database model for template
#[derive(Debug, Clone, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub importer_id: Uuid,
    pub name: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Database model for template column
#[derive(Debug, Clone, FromRow)]
pub struct TemplateColumn {
    pub id: Uuid,
    pub template_id: Uuid,
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    pub required: bool,
    pub data_type: String,
    pub index: i32,
    pub suggested_mappings: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub deleted_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Value type expected in a template column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TemplateColumnDataType {
    #[default]
    String,
    Number,
    Boolean,
    Date,
}

impl TemplateColumnDataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateColumnDataType::String => "string",
            TemplateColumnDataType::Number => "number",
            TemplateColumnDataType::Boolean => "boolean",
            TemplateColumnDataType::Date => "date",
        }
    }
}

impl std::str::FromStr for TemplateColumnDataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(TemplateColumnDataType::String),
            "number" => Ok(TemplateColumnDataType::Number),
            "boolean" => Ok(TemplateColumnDataType::Boolean),
            "date" => Ok(TemplateColumnDataType::Date),
            other => Err(format!("Unknown template column data type: {}", other)),
        }
    }
}

impl TemplateColumn {
    pub fn data_type(&self) -> Result<TemplateColumnDataType, String> {
        self.data_type.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_round_trip_names() {
        for data_type in [
            TemplateColumnDataType::String,
            TemplateColumnDataType::Number,
            TemplateColumnDataType::Boolean,
            TemplateColumnDataType::Date,
        ] {
            assert_eq!(data_type.as_str().parse::<TemplateColumnDataType>(), Ok(data_type));
        }
        assert!("text".parse::<TemplateColumnDataType>().is_err());
        assert_eq!(TemplateColumnDataType::default().as_str(), "string");
    }

    #[test]
    fn test_generated_api_key_shape() {
        let key = format!("tf_{}", Uuid::new_v4().simple());
        assert!(is_generated_api_key(&key));
        assert!(!is_generated_api_key("tf_short"));
        assert!(!is_generated_api_key(&format!("xx_{}", Uuid::new_v4().simple())));
        assert!(!is_generated_api_key(&format!("tf_{}", Uuid::new_v4())));
    }
}

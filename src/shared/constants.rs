// =============================================================================
// TENANT BOOTSTRAP DEFAULTS
// =============================================================================

pub const DEFAULT_ORGANIZATION_NAME: &str = "My Organization";

pub const DEFAULT_WORKSPACE_NAME: &str = "My Workspace";

pub const DEFAULT_IMPORTER_NAME: &str = "Example Importer";

pub const DEFAULT_TEMPLATE_NAME: &str = "Default Template";

// =============================================================================
// WORKSPACE API KEYS
// =============================================================================

/// Prefix of every generated workspace API key (`tf_` + 32 hex chars)
pub const API_KEY_PREFIX: &str = "tf_";

/// Length of a generated workspace API key
pub const API_KEY_LENGTH: usize = 35;

mod tenant_handler;

pub use tenant_handler::{__path_bootstrap_tenant, bootstrap_tenant};

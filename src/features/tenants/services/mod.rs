pub mod bootstrap;
mod tenant_service;

pub use bootstrap::{
    bootstrap_tenant, persist_seed, BootstrapEntity, BootstrapError, TenantIds, TenantSeed,
    UserIdentity,
};
pub use tenant_service::TenantService;

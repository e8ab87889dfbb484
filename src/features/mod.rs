pub mod system;
pub mod tenants;

//! Tenant provisioning.
//!
//! Every new user gets a default organization and workspace, an example
//! importer and a template with three columns. The whole hierarchy is written
//! in one transaction.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/tenants/bootstrap` | Create the default tenant for a new user |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::TenantService;

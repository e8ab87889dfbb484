//! Persistence core of the file-import admin service.
//!
//! Two operations carry the weight here:
//! - [`core::schema::evolve_schema`] brings the Postgres schema up to date on
//!   every start, idempotently.
//! - [`features::tenants::services::bootstrap_tenant`] creates the default
//!   tenant hierarchy for a newly signed-up user in one transaction.
//!
//! Both take an explicit connection; the caller owns its lifecycle.

pub mod app;
pub mod core;
pub mod features;
pub mod shared;

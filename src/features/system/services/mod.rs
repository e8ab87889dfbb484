mod system_service;

pub use system_service::{instance_id, SystemService};

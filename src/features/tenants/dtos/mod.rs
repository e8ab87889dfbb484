mod tenant_dto;

pub use tenant_dto::*;

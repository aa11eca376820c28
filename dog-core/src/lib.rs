//! dog-core: framework-agnostic core for DogRS.
//!
//! Tenant identity, structured errors and configuration shared by the
//! auth, blob, tenancy and axum crates.

pub mod config;
pub mod errors;
pub mod tenant;

pub use config::{DogConfig, DogConfigSnapshot};
pub use errors::{DogError, DogResult, ErrorKind};
pub use tenant::{InvalidTenantId, TenantContext, TenantId};

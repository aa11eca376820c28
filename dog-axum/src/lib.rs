//! dog-axum: Axum adapter for DogRS tenancy.
//!
//! Puts [`dog_tenancy`] in front of an Axum router: every tenant route gets
//! its tenant resolved and provisioned by middleware, and handlers pick the
//! result up through the [`Tenant`] and [`ScopedSession`] extractors.
//! Failures are rendered as Feathers-style JSON errors.

pub mod app;
pub mod state;
pub mod tenant;
mod error;
pub use error::DogAxumError;
pub use state::TenancyState;
pub use tenant::{resolve_tenant, ScopedSession, Tenant};

pub use app::TenantRouter;

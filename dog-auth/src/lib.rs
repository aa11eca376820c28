//! dog-auth: tenant claims from bearer tokens.
//!
//! Reads the authorization header of a request and extracts the tenant the
//! token was issued for. Tokens are decoded, never verified; signature and
//! expiry checks belong to whatever sits in front of DogRS.

pub mod error;
pub mod header;
pub mod token;

pub use error::{TokenError, TokenResult};
pub use header::{AuthorizationSource, BearerOptions};
pub use token::{decode_segment, resolve_tenant_claim, TenantClaim};

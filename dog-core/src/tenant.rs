//! Core multi-tenant types for DogRS.
//!
//! A tenant id doubles as the name of the tenant's database schema and its
//! object-storage bucket, so it is validated once, here, before anything
//! derives a storage name from it.

use std::fmt;

/// Longest id accepted. Matches the PostgreSQL identifier limit and the
/// S3 bucket name limit.
pub const MAX_TENANT_ID_LEN: usize = 63;

/// Shortest id accepted (S3 bucket names need at least three characters).
pub const MIN_TENANT_ID_LEN: usize = 3;

/// Why a raw tenant claim was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTenantId {
    pub tenant_id: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tenant id '{}': {}", self.tenant_id, self.reason)
    }
}

impl std::error::Error for InvalidTenantId {}

/// A validated tenant identifier.
///
/// Accepted ids are 3 to 63 characters of lowercase ASCII letters, digits
/// and `-`, starting and ending with a letter or digit: the intersection of
/// PostgreSQL schema names and S3 bucket names, so an accepted id can always
/// be provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    /// Validate a raw claim and turn it into a tenant id.
    ///
    /// Ids are never case-folded: an issuer ending in `/tenantX` is refused
    /// rather than mapped onto the storage of `tenantx`.
    ///
    /// ```rust
    /// use dog_core::TenantId;
    ///
    /// assert!(TenantId::parse("acme").is_ok());
    /// assert!(TenantId::parse("Acme").is_err());
    /// assert!(TenantId::parse("tenant_x").is_err());
    /// assert!(TenantId::parse("../etc").is_err());
    /// ```
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidTenantId> {
        let raw = raw.into();
        let reject = |reason| {
            Err(InvalidTenantId {
                tenant_id: raw.clone(),
                reason,
            })
        };

        if raw.len() < MIN_TENANT_ID_LEN {
            return reject("shorter than 3 characters");
        }
        if raw.len() > MAX_TENANT_ID_LEN {
            return reject("longer than 63 characters");
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return reject("only lowercase letters, digits and '-' are allowed");
        }

        let bytes = raw.as_bytes();
        let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
            return reject("must start and end with a letter or digit");
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Context carried with every tenant-scoped operation.
///
/// Passed explicitly into anything that touches tenant storage instead of
/// relying on whatever schema a connection happens to have active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    /// Validate a raw claim and build a context from it.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidTenantId> {
        TenantId::parse(raw).map(Self::new)
    }

    /// Name of the tenant's database schema.
    pub fn schema_name(&self) -> &str {
        self.tenant_id.as_str()
    }

    /// Name of the tenant's object-storage bucket.
    pub fn bucket_name(&self) -> &str {
        self.tenant_id.as_str()
    }
}

//! dog-tenancy: per-request tenant bootstrap for DogRS.
//!
//! For every request:
//!
//! 1. read the bearer token from the `authorization` header,
//! 2. decode the tenant it names (see [`dog_auth`]),
//! 3. make sure the tenant's PostgreSQL schema exists, creating it and its
//!    tables on first sight, and switch the session to it,
//! 4. make sure the tenant's bucket exists (see [`dog_blob`]),
//! 5. hand the caller a [`TenantContext`] to pass into tenant-scoped work.
//!
//! ```rust,no_run
//! use dog_blob::MemoryBucketStore;
//! use dog_tenancy::{init_tenant_context, PgSettings, PgTenantPool, SessionFactory, TenantMigration};
//! use http::HeaderMap;
//!
//! # async fn handle(headers: HeaderMap) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let pool = PgTenantPool::new(&PgSettings::new("postgres://localhost/app"), TenantMigration::empty())?;
//! let buckets = MemoryBucketStore::new();
//!
//! let mut session = pool.open().await?;
//! let tenant = init_tenant_context(&headers, &mut session, &buckets).await?;
//! let client = session.scoped(&tenant).await?;
//! client.execute("INSERT INTO files (name) VALUES ($1)", &[&"report.pdf"]).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod provision;
pub mod session;

pub use config::{PgSettings, TenancyConfig};
pub use context::{init_tenant_context, TenantResolver};
pub use error::{TenancyError, TenancyResult};
pub use memory::{MemoryCatalog, MemorySession, SessionCall};
pub use migration::TenantMigration;
pub use postgres::{PgTenantPool, PgTenantSession};
pub use provision::{provision_tenant, Provisioned, SchemaStatus};
pub use session::{SchemaCreation, SessionError, SessionFactory, SessionResult, TenantSession};

pub use dog_core::{TenantContext, TenantId};

//! The database seam used by provisioning.
//!
//! A session is one isolated connection, owned by exactly one request. Its
//! active schema is never trusted: every tenant-scoped caller passes the
//! [`TenantContext`] it wants and the session switches to it.

use async_trait::async_trait;
use dog_core::TenantContext;

/// Errors raised by a session implementation, passed through unchanged.
pub type SessionError = Box<dyn std::error::Error + Send + Sync>;

pub type SessionResult<T> = Result<T, SessionError>;

/// What happened when a tenant schema was created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCreation {
    /// Schema and table set were committed together by this call.
    Created,
    /// Another request created it first; its tables were committed with it.
    AlreadyExists,
}

#[async_trait]
pub trait TenantSession: Send {
    /// Is there a schema with exactly this name?
    async fn schema_exists(&mut self, schema: &str) -> SessionResult<bool>;

    /// Create the tenant's schema and its full table set as one unit.
    ///
    /// Either both are committed or neither is: a failing table set leaves
    /// no schema behind, so the next request starts over. A lost creation
    /// race is reported as `AlreadyExists` once the winner has committed.
    async fn create_tenant_schema(&mut self, ctx: &TenantContext) -> SessionResult<SchemaCreation>;

    /// Make the tenant's schema the active one and commit the switch.
    async fn activate(&mut self, ctx: &TenantContext) -> SessionResult<()>;
}

/// Opens one isolated session per request.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: TenantSession;

    async fn open(&self) -> SessionResult<Self::Session>;
}

#[async_trait]
impl<T: SessionFactory + ?Sized> SessionFactory for std::sync::Arc<T> {
    type Session = T::Session;

    async fn open(&self) -> SessionResult<Self::Session> {
        (**self).open().await
    }
}

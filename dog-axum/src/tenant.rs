//! Tenant middleware and extractors.
//!
//! [`resolve_tenant`] runs in front of every tenant-scoped route. It reads the
//! request's token, provisions the tenant, and leaves two things in the
//! request extensions: the [`TenantContext`] and the request's own session,
//! already switched to the tenant's schema.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use dog_blob::BucketStore;
use dog_core::errors::DogError;
use dog_core::TenantContext;
use dog_tenancy::{provision_tenant, SessionFactory, TenancyError};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::{DogAxumError, TenancyState};

/// Middleware: resolve and provision the caller's tenant.
///
/// Requests without a usable token are rejected before a session is opened.
pub async fn resolve_tenant<F, B>(
    State(state): State<TenancyState<F, B>>,
    mut req: Request,
    next: Next,
) -> Result<Response, DogAxumError>
where
    F: SessionFactory + 'static,
    F::Session: 'static,
    B: BucketStore + 'static,
{
    let ctx = state.resolver.resolve(req.headers()).inspect_err(|err| {
        warn!(error = %err, "rejecting request without a usable tenant");
    })?;

    let mut session = state.sessions.open().await.map_err(TenancyError::from)?;
    provision_tenant(&mut session, state.buckets.as_ref(), &ctx).await?;

    req.extensions_mut().insert(ctx);
    req.extensions_mut().insert(ScopedSession(Arc::new(Mutex::new(session))));
    Ok(next.run(req).await)
}

/// The caller's tenant, as resolved by [`resolve_tenant`].
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = DogAxumError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(Tenant)
            .ok_or_else(|| missing_layer().into())
    }
}

/// The request's database session, already on the tenant's schema.
///
/// Uncontended: the session belongs to a single request.
pub struct ScopedSession<T>(Arc<Mutex<T>>);

impl<T> Clone for ScopedSession<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> ScopedSession<T> {
    pub async fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().await
    }
}

impl<T, S> FromRequestParts<S> for ScopedSession<T>
where
    T: Send + 'static,
    S: Send + Sync,
{
    type Rejection = DogAxumError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ScopedSession<T>>()
            .cloned()
            .ok_or_else(|| missing_layer().into())
    }
}

fn missing_layer() -> DogError {
    DogError::general_error("tenant middleware is not installed on this route")
}

// Request-context entry point: header -> token -> tenant -> storage.

use dog_auth::{resolve_tenant_claim, AuthorizationSource, BearerOptions, TokenError};
use dog_blob::BucketStore;
use dog_core::TenantContext;
use tracing::warn;

use crate::provision::provision_tenant;
use crate::session::TenantSession;
use crate::{TenancyError, TenancyResult};

/// Turns request headers into a validated [`TenantContext`].
#[derive(Debug, Clone, Default)]
pub struct TenantResolver {
    bearer: BearerOptions,
}

impl TenantResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the token from a different header.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.bearer = self.bearer.with_header(header);
        self
    }

    /// Resolve the tenant named by the request's token. Does no I/O.
    pub fn resolve<R>(&self, request: &R) -> TenancyResult<TenantContext>
    where
        R: AuthorizationSource + ?Sized,
    {
        if !self.bearer.is_present(request) {
            return Err(TenancyError::NotAuthenticated);
        }
        let token = self.bearer.extract(request).ok_or(TokenError::Empty)?;

        let tenant = resolve_tenant_claim(token)?
            .into_tenant()
            .ok_or(TenancyError::NoTenantClaim)?;

        Ok(TenantContext::parse(tenant)?)
    }

    /// Resolve the request's tenant and make sure its storage exists.
    ///
    /// Nothing touches the session or the bucket store unless the request
    /// carries a usable token.
    pub async fn init_tenant_context<R, S, B>(
        &self,
        request: &R,
        session: &mut S,
        buckets: &B,
    ) -> TenancyResult<TenantContext>
    where
        R: AuthorizationSource + ?Sized,
        S: TenantSession + ?Sized,
        B: BucketStore + ?Sized,
    {
        let ctx = self.resolve(request).inspect_err(|err| {
            warn!(error = %err, "rejecting request without a usable tenant");
        })?;

        Ok(provision_tenant(session, buckets, &ctx).await?.context)
    }
}

/// [`TenantResolver::init_tenant_context`] with the default `authorization` header.
pub async fn init_tenant_context<R, S, B>(request: &R, session: &mut S, buckets: &B) -> TenancyResult<TenantContext>
where
    R: AuthorizationSource + ?Sized,
    S: TenantSession + ?Sized,
    B: BucketStore + ?Sized,
{
    TenantResolver::default()
        .init_tenant_context(request, session, buckets)
        .await
}

use axum::middleware;
use axum::routing::MethodRouter;
use axum::Router;
use dog_blob::BucketStore;
use dog_tenancy::SessionFactory;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::tenant::resolve_tenant;
use crate::TenancyState;

/// Router whose tenant routes all run behind [`resolve_tenant`].
///
/// Open routes (health checks and the like) skip tenant resolution.
pub struct TenantRouter<F, B>
where
    F: SessionFactory + 'static,
    B: BucketStore + 'static,
{
    pub state: TenancyState<F, B>,
    tenant: Router<()>,
    open: Router<()>,
}

impl<F, B> Clone for TenantRouter<F, B>
where
    F: SessionFactory + 'static,
    B: BucketStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            tenant: self.tenant.clone(),
            open: self.open.clone(),
        }
    }
}

impl<F, B> TenantRouter<F, B>
where
    F: SessionFactory + 'static,
    F::Session: 'static,
    B: BucketStore + 'static,
{
    pub fn new(state: TenancyState<F, B>) -> Self {
        Self {
            state,
            tenant: Router::new(),
            open: Router::new(),
        }
    }

    /// Add a tenant-scoped route.
    pub fn route(mut self, path: &str, method_router: MethodRouter<()>) -> Self {
        self.tenant = self.tenant.route(path, method_router);
        self
    }

    /// Nest a tenant-scoped router.
    pub fn nest(mut self, path: &str, router: Router<()>) -> Self {
        self.tenant = self.tenant.nest(path, router);
        self
    }

    /// Add a route that does not need a tenant.
    pub fn open_route(mut self, path: &str, method_router: MethodRouter<()>) -> Self {
        self.open = self.open.route(path, method_router);
        self
    }

    pub fn into_router(self) -> Router<()> {
        let tenant = self
            .tenant
            .layer(middleware::from_fn_with_state(self.state, resolve_tenant::<F, B>));

        // Layers run bottom-up: the id is set before tracing sees the request.
        self.open
            .merge(tenant)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "listening");
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

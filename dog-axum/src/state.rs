use std::sync::Arc;

use dog_blob::BucketStore;
use dog_tenancy::{SessionFactory, TenantResolver};

/// Shared per-app tenancy wiring handed to the tenant middleware.
pub struct TenancyState<F, B>
where
    F: SessionFactory + 'static,
    B: BucketStore + 'static,
{
    pub sessions: Arc<F>,
    pub buckets: Arc<B>,
    pub resolver: TenantResolver,
}

impl<F, B> Clone for TenancyState<F, B>
where
    F: SessionFactory + 'static,
    B: BucketStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            buckets: Arc::clone(&self.buckets),
            resolver: self.resolver.clone(),
        }
    }
}

impl<F, B> TenancyState<F, B>
where
    F: SessionFactory + 'static,
    B: BucketStore + 'static,
{
    pub fn new(sessions: F, buckets: B) -> Self {
        Self {
            sessions: Arc::new(sessions),
            buckets: Arc::new(buckets),
            resolver: TenantResolver::default(),
        }
    }

    pub fn with_resolver(mut self, resolver: TenantResolver) -> Self {
        self.resolver = resolver;
        self
    }
}

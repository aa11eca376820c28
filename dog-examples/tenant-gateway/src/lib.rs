mod routes;

use anyhow::Result;
use dog_axum::{TenancyState, TenantRouter};
use dog_blob::{BucketStore, S3BucketStore};
use dog_core::DogConfigSnapshot;
use dog_tenancy::{PgTenantPool, SessionFactory, TenancyConfig, TenantResolver};
use tracing::info;

pub use routes::{current_schema, whoami};

/// Routes that work against any session and bucket backend.
pub fn tenant_routes<F, B>(state: TenancyState<F, B>) -> TenantRouter<F, B>
where
    F: SessionFactory + 'static,
    F::Session: 'static,
    B: BucketStore + 'static,
{
    TenantRouter::new(state)
        .route("/whoami", axum::routing::get(whoami))
        .open_route("/health", axum::routing::get(|| async { "ok" }))
}

/// Wire PostgreSQL and S3 from configuration.
pub async fn build(config: &DogConfigSnapshot) -> Result<TenantRouter<PgTenantPool, S3BucketStore>> {
    let tenancy = TenancyConfig::from_config(config)?;
    let migration = tenancy.load_migration()?;
    if migration.is_empty() {
        info!("no tenancy.migrations configured, new tenants start with an empty schema");
    }

    let pool = PgTenantPool::new(&tenancy.postgres, migration)?;
    let buckets = S3BucketStore::new(tenancy.s3.clone()).await;

    let state = TenancyState::new(pool, buckets)
        .with_resolver(TenantResolver::new().with_header(tenancy.auth_header.as_str()));

    Ok(tenant_routes(state).route("/schema", axum::routing::get(current_schema)))
}

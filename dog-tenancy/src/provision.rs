use dog_blob::{BucketStatus, BucketStore};
use dog_core::TenantContext;
use tracing::{debug, info, instrument, warn};

use crate::session::{SchemaCreation, TenantSession};
use crate::{TenancyError, TenancyResult};

/// State of the tenant's schema after provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Created by this call, together with the tenant's tables.
    Created,
    /// Already there (possibly created by a concurrent request).
    Existing,
}

/// Outcome of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub context: TenantContext,
    pub schema: SchemaStatus,
    pub bucket: BucketStatus,
}

/// Make sure a tenant's schema and bucket exist, leaving the session on the
/// tenant's schema.
///
/// The schema is handled first, the bucket second. A bucket failure after a
/// schema was created leaves the schema in place.
#[instrument(skip(session, buckets, ctx), fields(tenant_id = %ctx.tenant_id))]
pub async fn provision_tenant<S, B>(session: &mut S, buckets: &B, ctx: &TenantContext) -> TenancyResult<Provisioned>
where
    S: TenantSession + ?Sized,
    B: BucketStore + ?Sized,
{
    let schema = ensure_schema(session, ctx).await?;
    let bucket = ensure_bucket(buckets, ctx).await?;

    Ok(Provisioned {
        context: ctx.clone(),
        schema,
        bucket,
    })
}

async fn ensure_schema<S>(session: &mut S, ctx: &TenantContext) -> TenancyResult<SchemaStatus>
where
    S: TenantSession + ?Sized,
{
    let name = ctx.schema_name();

    if session.schema_exists(name).await? {
        debug!(schema = name, "schema exists");
        session.activate(ctx).await?;
        return Ok(SchemaStatus::Existing);
    }

    match session.create_tenant_schema(ctx).await? {
        SchemaCreation::Created => {
            info!(schema = name, "tenant schema created");
            session.activate(ctx).await?;
            Ok(SchemaStatus::Created)
        }
        SchemaCreation::AlreadyExists => {
            warn!(schema = name, "schema created concurrently, skipping table creation");
            session.activate(ctx).await?;
            Ok(SchemaStatus::Existing)
        }
    }
}

async fn ensure_bucket<B>(buckets: &B, ctx: &TenantContext) -> TenancyResult<BucketStatus>
where
    B: BucketStore + ?Sized,
{
    let name = ctx.bucket_name();
    let status = buckets
        .create_bucket(name)
        .await
        .into_result()
        .map_err(|source| TenancyError::StorageProvision {
            bucket: name.to_string(),
            source,
        })?;

    match status {
        BucketStatus::Created => info!(bucket = name, "tenant bucket created"),
        BucketStatus::Existing(existing) => debug!(bucket = name, ?existing, "bucket exists"),
    }
    Ok(status)
}

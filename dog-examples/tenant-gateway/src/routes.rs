use axum::Json;
use dog_axum::{DogAxumError, ScopedSession, Tenant};
use dog_tenancy::{PgTenantSession, TenancyError};
use serde_json::{json, Value};

pub async fn whoami(Tenant(ctx): Tenant) -> Json<Value> {
    Json(json!({
        "tenant": ctx.tenant_id.as_str(),
        "schema": ctx.schema_name(),
        "bucket": ctx.bucket_name(),
    }))
}

/// Ask the database which schema the request's session is on.
pub async fn current_schema(
    Tenant(ctx): Tenant,
    session: ScopedSession<PgTenantSession>,
) -> Result<Json<Value>, DogAxumError> {
    let mut session = session.lock().await;
    let client = session.scoped(&ctx).await.map_err(TenancyError::from)?;
    let row = client
        .query_one("SELECT current_schema()", &[])
        .await
        .map_err(anyhow::Error::from)?;
    let schema: Option<String> = row.get(0);

    Ok(Json(json!({ "tenant": ctx.tenant_id.as_str(), "schema": schema })))
}

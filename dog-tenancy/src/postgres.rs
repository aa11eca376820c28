//! PostgreSQL sessions: one pooled connection per request.
//!
//! Connections are recycled with deadpool's `RecyclingMethod::Clean`, which
//! runs `RESET ALL` alongside the `DISCARD` family of cleanups, so a
//! `search_path` set for one tenant never survives into the next request that
//! borrows the connection.

use std::sync::Arc;

use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use dog_core::{TenantContext, TenantId};
use tokio_postgres::error::SqlState;
use tokio_postgres::NoTls;
use tracing::debug;

use crate::config::PgSettings;
use crate::migration::TenantMigration;
use crate::session::{SchemaCreation, SessionFactory, SessionResult, TenantSession};
use crate::{TenancyError, TenancyResult};

pub(crate) const SCHEMA_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)";

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

pub(crate) fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA {}", quote_ident(schema))
}

pub(crate) fn set_search_path_sql(schema: &str) -> String {
    format!("SET search_path TO {}", quote_ident(schema))
}

pub(crate) fn pool_config(settings: &PgSettings) -> Config {
    let mut cfg = Config::new();
    cfg.url = Some(settings.url.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Clean,
    });
    cfg
}

/// Pool of tenant sessions.
#[derive(Clone)]
pub struct PgTenantPool {
    pool: Pool,
    migration: Arc<TenantMigration>,
}

impl PgTenantPool {
    pub fn new(settings: &PgSettings, migration: TenantMigration) -> TenancyResult<Self> {
        let pool = pool_config(settings)
            .builder(NoTls)
            .map_err(|e| TenancyError::config(format!("invalid postgres settings: {e}")))?
            .max_size(settings.max_size)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| TenancyError::config(format!("failed to build postgres pool: {e}")))?;

        Ok(Self {
            pool,
            migration: Arc::new(migration),
        })
    }

    pub fn from_pool(pool: Pool, migration: TenantMigration) -> Self {
        Self {
            pool,
            migration: Arc::new(migration),
        }
    }
}

#[async_trait]
impl SessionFactory for PgTenantPool {
    type Session = PgTenantSession;

    async fn open(&self) -> SessionResult<PgTenantSession> {
        let client = self.pool.get().await?;
        Ok(PgTenantSession::new(client, Arc::clone(&self.migration)))
    }
}

/// A single connection with an explicitly tracked active tenant.
pub struct PgTenantSession {
    client: Object,
    migration: Arc<TenantMigration>,
    active: Option<TenantId>,
}

impl PgTenantSession {
    pub fn new(client: Object, migration: Arc<TenantMigration>) -> Self {
        Self {
            client,
            migration,
            active: None,
        }
    }

    /// Tenant whose schema is currently active, if any.
    pub fn active_tenant(&self) -> Option<&TenantId> {
        self.active.as_ref()
    }

    /// Borrow the connection for work scoped to `ctx`.
    ///
    /// Switches schema first when the connection is pointed anywhere else.
    pub async fn scoped(&mut self, ctx: &TenantContext) -> SessionResult<&tokio_postgres::Client> {
        if self.active.as_ref() != Some(&ctx.tenant_id) {
            self.activate(ctx).await?;
        }
        Ok(&self.client)
    }
}

#[async_trait]
impl TenantSession for PgTenantSession {
    async fn schema_exists(&mut self, schema: &str) -> SessionResult<bool> {
        let row = self.client.query_one(SCHEMA_EXISTS_SQL, &[&schema]).await?;
        Ok(row.try_get(0)?)
    }

    async fn create_tenant_schema(&mut self, ctx: &TenantContext) -> SessionResult<SchemaCreation> {
        let schema = ctx.schema_name();
        let migration = Arc::clone(&self.migration);

        // A concurrent CREATE SCHEMA of the same name waits on this
        // transaction, then fails with duplicate_schema.
        let tx = self.client.transaction().await?;
        match tx.batch_execute(&create_schema_sql(schema)).await {
            Ok(()) => {}
            Err(err) if err.code() == Some(&SqlState::DUPLICATE_SCHEMA) => {
                tx.rollback().await?;
                return Ok(SchemaCreation::AlreadyExists);
            }
            Err(err) => return Err(err.into()),
        }

        tx.batch_execute(&set_search_path_sql(schema)).await?;
        if migration.is_empty() {
            debug!(tenant_id = %ctx.tenant_id, "no tenant migration configured");
        } else {
            tx.batch_execute(migration.script()).await?;
        }
        tx.commit().await?;

        self.active = Some(ctx.tenant_id.clone());
        Ok(SchemaCreation::Created)
    }

    async fn activate(&mut self, ctx: &TenantContext) -> SessionResult<()> {
        // Outside a transaction the SET is committed as soon as it runs.
        self.active = None;
        self.client
            .batch_execute(&set_search_path_sql(ctx.schema_name()))
            .await?;
        self.active = Some(ctx.tenant_id.clone());
        Ok(())
    }
}

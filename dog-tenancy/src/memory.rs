//! In-process session backend for development and tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use dog_core::{TenantContext, TenantId};
use parking_lot::Mutex;

use crate::session::{SchemaCreation, SessionFactory, SessionResult, TenantSession};

/// A call made against a [`MemorySession`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    SchemaExists(String),
    CreateSchema(String),
    Activate(String),
    CreateAllTables(String),
}

#[derive(Debug, Default)]
struct CatalogState {
    schemas: HashSet<String>,
    migrations: HashMap<String, usize>,
    calls: Vec<SessionCall>,
    fail_next_migration: bool,
}

/// A shared schema catalog; every session opened from it sees the same schemas.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with schemas that already exist.
    pub fn with_schemas<I, S>(schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = Self::new();
        catalog
            .state
            .lock()
            .schemas
            .extend(schemas.into_iter().map(Into::into));
        catalog
    }

    pub fn session(&self) -> MemorySession {
        MemorySession {
            catalog: self.clone(),
            active: None,
        }
    }

    pub fn has_schema(&self, schema: &str) -> bool {
        self.state.lock().schemas.contains(schema)
    }

    /// How many times the table set was created for a schema.
    pub fn migrations_run(&self, schema: &str) -> usize {
        self.state.lock().migrations.get(schema).copied().unwrap_or(0)
    }

    /// Make the next table-set creation fail, rolling its schema back.
    pub fn fail_next_migration(&self) {
        self.state.lock().fail_next_migration = true;
    }

    /// Every call made by every session, in order.
    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().calls.clone()
    }

    fn record(&self, call: SessionCall) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl SessionFactory for MemoryCatalog {
    type Session = MemorySession;

    async fn open(&self) -> SessionResult<MemorySession> {
        Ok(self.session())
    }
}

/// One session over a [`MemoryCatalog`].
#[derive(Debug)]
pub struct MemorySession {
    catalog: MemoryCatalog,
    active: Option<TenantId>,
}

impl MemorySession {
    pub fn active_tenant(&self) -> Option<&TenantId> {
        self.active.as_ref()
    }
}

#[async_trait]
impl TenantSession for MemorySession {
    async fn schema_exists(&mut self, schema: &str) -> SessionResult<bool> {
        self.catalog.record(SessionCall::SchemaExists(schema.to_string()));
        Ok(self.catalog.has_schema(schema))
    }

    async fn create_tenant_schema(&mut self, ctx: &TenantContext) -> SessionResult<SchemaCreation> {
        let schema = ctx.schema_name().to_string();
        self.catalog.record(SessionCall::CreateSchema(schema.clone()));

        let mut state = self.catalog.state.lock();
        if state.schemas.contains(&schema) {
            return Ok(SchemaCreation::AlreadyExists);
        }

        state.calls.push(SessionCall::CreateAllTables(schema.clone()));
        if std::mem::take(&mut state.fail_next_migration) {
            return Err(format!("migration for schema \"{schema}\" failed, rolled back").into());
        }

        state.schemas.insert(schema.clone());
        *state.migrations.entry(schema).or_insert(0) += 1;
        drop(state);

        self.active = Some(ctx.tenant_id.clone());
        Ok(SchemaCreation::Created)
    }

    async fn activate(&mut self, ctx: &TenantContext) -> SessionResult<()> {
        self.catalog
            .record(SessionCall::Activate(ctx.schema_name().to_string()));
        if !self.catalog.has_schema(ctx.schema_name()) {
            return Err(format!("schema \"{}\" does not exist", ctx.schema_name()).into());
        }
        self.active = Some(ctx.tenant_id.clone());
        Ok(())
    }
}

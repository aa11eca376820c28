use std::path::PathBuf;

use dog_blob::S3Config;
use dog_core::DogConfigSnapshot;

use crate::migration::TenantMigration;
use crate::{TenancyError, TenancyResult};

pub const DEFAULT_POOL_SIZE: usize = 16;

/// PostgreSQL connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgSettings {
    pub url: String,
    pub max_size: usize,
}

impl PgSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: DEFAULT_POOL_SIZE,
        }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
}

/// Everything needed to resolve and provision tenants
#[derive(Debug, Clone)]
pub struct TenancyConfig {
    /// Header carrying the bearer token
    pub auth_header: String,
    pub postgres: PgSettings,
    pub s3: S3Config,
    /// SQL script run once for every new tenant
    pub migrations: Option<PathBuf>,
}

impl TenancyConfig {
    /// Read tenancy settings from a DogRS config snapshot.
    ///
    /// `postgres.url` is required; everything else has a default.
    pub fn from_config(config: &DogConfigSnapshot) -> TenancyResult<Self> {
        let url = config
            .get_string("postgres.url")
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| TenancyError::config("postgres.url is required"))?;

        let max_size = match config.get("postgres.max_size") {
            None => DEFAULT_POOL_SIZE,
            Some(_) => config
                .get_usize("postgres.max_size")
                .filter(|n| *n > 0)
                .ok_or_else(|| TenancyError::config("postgres.max_size must be a positive integer"))?,
        };

        let s3 = S3Config::from_config(config).map_err(|e| TenancyError::config(e.to_string()))?;

        Ok(Self {
            auth_header: config
                .get_string("auth.header")
                .unwrap_or_else(|| "authorization".to_string()),
            postgres: PgSettings::new(url).with_max_size(max_size),
            s3,
            migrations: config.get_string("tenancy.migrations").map(PathBuf::from),
        })
    }

    /// Load the tenant migration script, or an empty one when none is set.
    pub fn load_migration(&self) -> TenancyResult<TenantMigration> {
        match &self.migrations {
            Some(path) => TenantMigration::from_file(path),
            None => Ok(TenantMigration::empty()),
        }
    }
}

use std::path::Path;

use crate::{TenancyError, TenancyResult};

/// SQL that creates the full table set of a fresh tenant.
///
/// The script runs with the tenant's schema active, so it should use
/// unqualified table names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantMigration {
    script: String,
}

impl TenantMigration {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// A migration that creates nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_file(path: impl AsRef<Path>) -> TenancyResult<Self> {
        let path = path.as_ref();
        let script = std::fs::read_to_string(path)
            .map_err(|e| TenancyError::config(format!("cannot read migration {}: {e}", path.display())))?;
        Ok(Self::new(script))
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn is_empty(&self) -> bool {
        self.script.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_scripts_are_empty() {
        assert!(TenantMigration::empty().is_empty());
        assert!(TenantMigration::new("  \n").is_empty());
        assert!(!TenantMigration::new("CREATE TABLE files (id BIGSERIAL PRIMARY KEY);").is_empty());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = TenantMigration::from_file("/definitely/not/here.sql").unwrap_err();
        assert!(matches!(err, TenancyError::Config(_)));
    }
}

//! # DogRS Configuration
//!
//! A minimal, framework-agnostic configuration store based on string
//! key/value pairs, mirroring Feathers' `app.set()` / `app.get()`.
//!
//! ```rust
//! use dog_core::DogConfig;
//!
//! let mut config = DogConfig::new();
//! config.set("postgres.max_size", "8");
//!
//! let snapshot = config.snapshot();
//! assert_eq!(snapshot.get_usize("postgres.max_size"), Some(8));
//! ```
//!
//! ## Environment overrides
//!
//! [`DogConfig::load_env`] maps `PREFIX__POSTGRES__URL=...` onto the key
//! `postgres.url`, so any key can be overridden from the environment:
//!
//! ```bash
//! export DOG__S3__ENDPOINT=http://localhost:9000
//! ```

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct DogConfig {
    values: HashMap<String, String>,
}

impl DogConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Build a config store from the process environment.
    pub fn from_env(prefix: &str) -> Self {
        let mut config = Self::new();
        config.load_env(prefix);
        config
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Overlay every `PREFIX...` variable of the current environment.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    /// Overlay variables from any `(name, value)` source.
    ///
    /// `DOG__PAGINATE__DEFAULT` with prefix `DOG__` becomes `paginate.default`.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    self.set(normalized, value);
                }
            }
        }
    }

    pub fn snapshot(&self) -> DogConfigSnapshot {
        DogConfigSnapshot::new(self.values.clone())
    }
}

/// Immutable view of a [`DogConfig`], handed to components at build time.
#[derive(Debug, Clone, Default)]
pub struct DogConfigSnapshot {
    map: HashMap<String, String>,
}

impl DogConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}

use std::env;

use dog_core::DogConfigSnapshot;

use crate::{BlobError, BlobResult};

/// Connection settings for an S3-compatible endpoint (AWS, MinIO, RustFS)
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Custom endpoint, e.g. `http://minio:9000`. `None` means AWS.
    pub endpoint_url: Option<String>,

    pub region: String,

    /// Static credentials. When absent the default AWS provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,

    /// Path-style addressing, required by most self-hosted stores
    pub force_path_style: bool,

    /// Location constraint sent with create-bucket, if any
    pub location: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            force_path_style: true,
            location: None,
        }
    }
}

impl S3Config {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `s3.*` keys from a DogRS config snapshot.
    pub fn from_config(config: &DogConfigSnapshot) -> BlobResult<Self> {
        let defaults = Self::default();
        let cfg = Self {
            endpoint_url: config.get_string("s3.endpoint"),
            region: config.get_string("s3.region").unwrap_or(defaults.region),
            access_key_id: config.get_string("s3.access_key_id"),
            secret_access_key: config.get_string("s3.secret_access_key"),
            force_path_style: config
                .get_bool("s3.force_path_style")
                .unwrap_or(defaults.force_path_style),
            location: config.get_string("s3.location"),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read the conventional `S3_*` environment variables.
    pub fn from_env() -> BlobResult<Self> {
        let defaults = Self::default();
        let cfg = Self {
            endpoint_url: env::var("S3_ENDPOINT_URL").ok(),
            region: env::var("S3_REGION").unwrap_or(defaults.region),
            access_key_id: env::var("S3_ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("S3_SECRET_ACCESS_KEY").ok(),
            force_path_style: env::var("S3_FORCE_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.force_path_style),
            location: env::var("S3_LOCATION").ok(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Set a custom endpoint
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint_url = Some(endpoint.into());
        self
    }

    /// Set the region
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }

    /// Use static credentials
    pub fn with_credentials<A: Into<String>, S: Into<String>>(mut self, access_key_id: A, secret_access_key: S) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Ask for buckets in a specific location
    pub fn with_location<S: Into<String>>(mut self, location: S) -> Self {
        self.location = Some(location.into());
        self
    }

    fn validate(&self) -> BlobResult<()> {
        if self.region.trim().is_empty() {
            return Err(BlobError::config("s3 region must not be empty"));
        }
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(_), None) | (None, Some(_)) => Err(BlobError::config(
                "s3 access key id and secret access key must be set together",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dog_core::DogConfig;

    #[test]
    fn reads_dotted_keys_with_defaults() {
        let mut config = DogConfig::new();
        config.set("s3.endpoint", "http://minio:9000");
        config.set("s3.access_key_id", "minio");
        config.set("s3.secret_access_key", "minio123");

        let cfg = S3Config::from_config(&config.snapshot()).unwrap();
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://minio:9000"));
        assert_eq!(cfg.region, "us-east-1");
        assert!(cfg.force_path_style);
        assert!(cfg.location.is_none());
    }

    #[test]
    fn half_configured_credentials_are_rejected() {
        let mut config = DogConfig::new();
        config.set("s3.access_key_id", "minio");
        assert!(matches!(
            S3Config::from_config(&config.snapshot()),
            Err(BlobError::Config { .. })
        ));
    }
}

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use tracing::{debug, info, warn};

use crate::store::{validate_bucket_name, BucketOutcome, BucketStore, ExistingBucket};
use crate::{BlobError, BlobResult, S3Config};

/// Bucket store backed by the AWS SDK, usable against any S3-compatible endpoint
#[derive(Debug, Clone)]
pub struct S3BucketStore {
    client: Client,
    location: Option<String>,
}

impl S3BucketStore {
    /// Build a client from explicit settings.
    pub async fn new(config: S3Config) -> Self {
        let location = config.location.clone();
        let client = Self::create_client(config).await;
        Self { client, location }
    }

    /// Build a client from the `S3_*` environment variables.
    pub async fn from_env() -> BlobResult<Self> {
        Ok(Self::new(S3Config::from_env()?).await)
    }

    /// Wrap an existing SDK client.
    pub fn from_client(client: Client, location: Option<String>) -> Self {
        Self { client, location }
    }

    async fn create_client(config: S3Config) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region));

        if let (Some(access_key_id), Some(secret_access_key)) = (config.access_key_id, config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "dog-blob",
            ));
        }
        if let Some(endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(config.force_path_style)
                .build(),
        )
    }

    fn map_create_error(bucket: &str, err: SdkError<CreateBucketError>) -> BucketOutcome {
        if let Some(service_err) = err.as_service_error() {
            if service_err.is_bucket_already_owned_by_you() {
                return BucketOutcome::AlreadyExists(ExistingBucket::OwnedByCaller);
            }
            if service_err.is_bucket_already_exists() {
                return BucketOutcome::AlreadyExists(ExistingBucket::OwnedElsewhere);
            }
        }

        // Some S3-compatible stores send the code without a typed variant.
        let code = err.code().map(str::to_string);
        if let Some(existing) = existing_bucket_from_code(code.as_deref()) {
            return BucketOutcome::AlreadyExists(existing);
        }

        warn!(bucket, code = ?code, "create bucket failed");
        match code {
            Some(code) => BucketOutcome::Failed(BlobError::backend_with_code(code, err)),
            None => BucketOutcome::Failed(BlobError::backend(err)),
        }
    }
}

/// Map a provider error code onto the "bucket is already there" cases.
pub(crate) fn existing_bucket_from_code(code: Option<&str>) -> Option<ExistingBucket> {
    match code? {
        "BucketAlreadyOwnedByYou" => Some(ExistingBucket::OwnedByCaller),
        "BucketAlreadyExists" => Some(ExistingBucket::OwnedElsewhere),
        _ => None,
    }
}

#[async_trait]
impl BucketStore for S3BucketStore {
    async fn create_bucket(&self, bucket: &str) -> BucketOutcome {
        if let Err(err) = validate_bucket_name(bucket) {
            return BucketOutcome::Failed(err);
        }

        let mut request = self.client.create_bucket().bucket(bucket);
        if let Some(location) = &self.location {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => {
                info!(bucket, "bucket created");
                BucketOutcome::Created
            }
            Err(err) => {
                let outcome = Self::map_create_error(bucket, err);
                if let BucketOutcome::AlreadyExists(existing) = &outcome {
                    debug!(bucket, ?existing, "bucket already exists");
                }
                outcome
            }
        }
    }
}

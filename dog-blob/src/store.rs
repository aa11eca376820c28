use async_trait::async_trait;

use crate::{BlobError, BlobResult};

/// Bucket provisioning - must be implemented by all storage backends
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Create a bucket, reporting whether it already existed.
    ///
    /// Must be safe to call for a bucket that already exists.
    async fn create_bucket(&self, bucket: &str) -> BucketOutcome;
}

#[async_trait]
impl<T: BucketStore + ?Sized> BucketStore for std::sync::Arc<T> {
    async fn create_bucket(&self, bucket: &str) -> BucketOutcome {
        (**self).create_bucket(bucket).await
    }
}

/// Who holds a bucket that was already there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingBucket {
    /// The calling credentials own it.
    OwnedByCaller,
    /// The name is taken, owner unknown or different.
    OwnedElsewhere,
}

/// Result of a create-bucket call
#[derive(Debug)]
pub enum BucketOutcome {
    Created,
    AlreadyExists(ExistingBucket),
    Failed(BlobError),
}

impl BucketOutcome {
    /// `Created` and `AlreadyExists` both leave a usable bucket behind.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Collapse into a result, keeping the success detail.
    pub fn into_result(self) -> BlobResult<BucketStatus> {
        match self {
            Self::Created => Ok(BucketStatus::Created),
            Self::AlreadyExists(existing) => Ok(BucketStatus::Existing(existing)),
            Self::Failed(err) => Err(err),
        }
    }
}

/// A bucket that is known to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Created,
    Existing(ExistingBucket),
}

/// Check a bucket name against the S3 naming rules that matter for tenants.
///
/// 3 to 63 characters of lowercase letters, digits, `-` and `.`, starting
/// and ending with a letter or digit.
pub fn validate_bucket_name(bucket: &str) -> BlobResult<()> {
    let reject = |reason| {
        Err(BlobError::InvalidBucketName {
            bucket: bucket.to_string(),
            reason,
        })
    };

    if bucket.len() < 3 || bucket.len() > 63 {
        return reject("must be between 3 and 63 characters");
    }
    if !bucket
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return reject("only lowercase letters, digits, '-' and '.' are allowed");
    }
    let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let bytes = bucket.as_bytes();
    if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
        return reject("must start and end with a letter or digit");
    }
    if bucket.contains("..") {
        return reject("must not contain consecutive dots");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_buckets_count_as_success() {
        assert!(BucketOutcome::Created.is_success());
        assert!(BucketOutcome::AlreadyExists(ExistingBucket::OwnedByCaller).is_success());
        assert_eq!(
            BucketOutcome::AlreadyExists(ExistingBucket::OwnedElsewhere)
                .into_result()
                .unwrap(),
            BucketStatus::Existing(ExistingBucket::OwnedElsewhere)
        );
    }

    #[test]
    fn failures_surface_their_cause() {
        let outcome = BucketOutcome::Failed(BlobError::config("no endpoint"));
        assert!(!outcome.is_success());
        let err = outcome.into_result().unwrap_err();
        assert!(err.to_string().contains("no endpoint"));
    }

    #[test]
    fn bucket_names_follow_s3_rules() {
        for ok in ["acme", "tenant-x", "a.b.c", "123"] {
            assert!(validate_bucket_name(ok).is_ok(), "{ok}");
        }
        for bad in ["ab", "tenant_x", "Acme", "-acme", "acme.", "a..b"] {
            assert!(validate_bucket_name(bad).is_err(), "{bad}");
        }
    }
}

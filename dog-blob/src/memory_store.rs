use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{validate_bucket_name, BucketOutcome, BucketStore, ExistingBucket};

/// In-process bucket store for development and tests
#[derive(Debug, Default)]
pub struct MemoryBucketStore {
    buckets: RwLock<HashSet<String>>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with buckets that already exist.
    pub fn with_buckets<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buckets: RwLock::new(buckets.into_iter().map(Into::into).collect()),
        }
    }

    pub async fn contains(&self, bucket: &str) -> bool {
        self.buckets.read().await.contains(bucket)
    }

    pub async fn len(&self) -> usize {
        self.buckets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buckets.read().await.is_empty()
    }
}

#[async_trait]
impl BucketStore for MemoryBucketStore {
    async fn create_bucket(&self, bucket: &str) -> BucketOutcome {
        if let Err(err) = validate_bucket_name(bucket) {
            return BucketOutcome::Failed(err);
        }

        let mut buckets = self.buckets.write().await;
        if buckets.insert(bucket.to_string()) {
            BucketOutcome::Created
        } else {
            BucketOutcome::AlreadyExists(ExistingBucket::OwnedByCaller)
        }
    }
}

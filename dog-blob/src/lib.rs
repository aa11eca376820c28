//! # dog-blob: object-storage buckets for DogRS tenants
//!
//! Every DogRS tenant gets its own bucket. `dog-blob` owns the seam between
//! tenant provisioning and the object store: a [`BucketStore`] trait whose
//! `create_bucket` is idempotent and reports *how* it succeeded.
//!
//! ```rust
//! use dog_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> BlobResult<()> {
//! let store = MemoryBucketStore::new();
//!
//! let status = store.create_bucket("acme").await.into_result()?;
//! assert_eq!(status, BucketStatus::Created);
//!
//! // Creating it again is not an error.
//! let status = store.create_bucket("acme").await.into_result()?;
//! assert_eq!(status, BucketStatus::Existing(ExistingBucket::OwnedByCaller));
//! # Ok(())
//! # }
//! ```
//!
//! For real deployments use [`S3BucketStore`], which talks to AWS or any
//! S3-compatible server (MinIO, RustFS) through the AWS SDK.

mod config;
mod error;
mod memory_store;
mod s3_store;
pub mod store;

pub use config::S3Config;
pub use error::{BlobError, BlobResult};
pub use memory_store::MemoryBucketStore;
pub use s3_store::S3BucketStore;
pub use store::{validate_bucket_name, BucketOutcome, BucketStatus, BucketStore, ExistingBucket};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BlobError, BlobResult, BucketOutcome, BucketStatus, BucketStore, ExistingBucket, MemoryBucketStore,
    };
}

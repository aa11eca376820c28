#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use dog_blob::{BlobError, BucketOutcome, BucketStore, ExistingBucket};
use serde_json::Value;

/// `a.<payload>.sig` with an unpadded base64 payload.
pub fn token_for(payload: &Value) -> String {
    format!("a.{}.sig", STANDARD_NO_PAD.encode(payload.to_string()))
}

pub fn auth_headers(token: &str) -> http::HeaderMap {
    let mut headers = http::HeaderMap::new();
    headers.insert("authorization", token.parse().unwrap());
    headers
}

#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Create,
    OwnedByCaller,
    OwnedElsewhere,
    AccessDenied,
}

/// Bucket store that answers with a fixed outcome and counts calls.
#[derive(Debug)]
pub struct ScriptedBuckets {
    pub script: Scripted,
    pub calls: AtomicUsize,
}

impl ScriptedBuckets {
    pub fn new(script: Scripted) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Access Denied")]
pub struct AccessDenied;

#[async_trait]
impl BucketStore for ScriptedBuckets {
    async fn create_bucket(&self, _bucket: &str) -> BucketOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Scripted::Create => BucketOutcome::Created,
            Scripted::OwnedByCaller => BucketOutcome::AlreadyExists(ExistingBucket::OwnedByCaller),
            Scripted::OwnedElsewhere => BucketOutcome::AlreadyExists(ExistingBucket::OwnedElsewhere),
            Scripted::AccessDenied => BucketOutcome::Failed(BlobError::backend_with_code("AccessDenied", AccessDenied)),
        }
    }
}

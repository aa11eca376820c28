use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur while talking to object storage
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid bucket name '{bucket}': {reason}")]
    InvalidBucketName { bucket: String, reason: &'static str },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Storage backend error: {source}")]
    Backend {
        code: Option<String>,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BlobError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            code: None,
            source: Box::new(error),
        }
    }

    /// Create a backend error tagged with the provider's error code
    pub fn backend_with_code<E>(code: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            code: Some(code.into()),
            source: Box::new(error),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Provider error code, when the backend reported one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

use dog_auth::TokenError;
use dog_blob::BlobError;
use dog_core::{DogError, InvalidTenantId};
use thiserror::Error;

use crate::session::SessionError;

/// Result type for tenant resolution and provisioning
pub type TenancyResult<T> = Result<T, TenancyError>;

/// Everything that can stop a request before tenant-scoped work starts
#[derive(Error, Debug)]
pub enum TenancyError {
    #[error("No authorization token has been supplied")]
    NotAuthenticated,

    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    #[error("Authentication token does not name a tenant")]
    NoTenantClaim,

    #[error(transparent)]
    InvalidTenant(#[from] InvalidTenantId),

    #[error("Failed to provision storage bucket '{bucket}': {source}")]
    StorageProvision {
        bucket: String,
        #[source]
        source: BlobError,
    },

    /// Session failures pass through untouched.
    #[error(transparent)]
    Database(#[from] SessionError),

    #[error("Invalid tenancy configuration: {0}")]
    Config(String),
}

impl TenancyError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Client-input failures, as opposed to backend failures.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated | Self::InvalidToken(_) | Self::NoTenantClaim | Self::InvalidTenant(_)
        )
    }
}

impl From<TenancyError> for DogError {
    fn from(err: TenancyError) -> Self {
        let message = err.to_string();
        if err.is_authentication_failure() {
            DogError::not_authenticated(message).with_source(err)
        } else {
            DogError::general_error(message).with_source(err)
        }
    }
}

use dog_core::DogError;
use thiserror::Error;

/// Result type for token resolution
pub type TokenResult<T> = Result<T, TokenError>;

/// Reasons an authorization token could not be turned into a tenant claim.
///
/// Every variant is a client-input error; none of them is worth retrying.
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid authentication token: token is empty")]
    Empty,

    #[error("Invalid authentication token: expected header.payload.signature, found {segments} segment(s)")]
    Malformed { segments: usize },

    #[error("Invalid authentication token payload: not base64")]
    Base64 {
        #[from]
        source: base64::DecodeError,
    },

    #[error("Invalid authentication token payload: not utf-8")]
    Utf8 {
        #[from]
        source: std::string::FromUtf8Error,
    },

    #[error("Invalid authentication token payload: not json")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Invalid authentication token payload: not a json object")]
    NotAnObject,

    #[error("Invalid authentication token payload: claim '{claim}' {reason}")]
    InvalidClaim {
        claim: &'static str,
        reason: &'static str,
    },
}

impl TokenError {
    pub(crate) fn invalid_claim(claim: &'static str, reason: &'static str) -> Self {
        Self::InvalidClaim { claim, reason }
    }
}

impl From<TokenError> for DogError {
    fn from(err: TokenError) -> Self {
        DogError::not_authenticated(err.to_string()).with_source(err)
    }
}

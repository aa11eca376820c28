// Tenant claim resolution from bearer tokens.
//
// The token is decoded, not verified: nothing here checks a signature or an
// expiry. Callers that need authenticity must verify the token upstream.

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{TokenError, TokenResult};

/// Where a token said its tenant lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantClaim {
    /// Taken from the `service` claim.
    ByService(String),
    /// Taken from the last path segment of the `iss` claim (older issuers).
    ByIssuer(String),
    /// The payload names no tenant at all.
    Absent,
}

impl TenantClaim {
    /// Decide the claim from an already parsed payload.
    ///
    /// `service` wins over `iss` when both are present.
    pub fn from_payload(payload: &Map<String, Value>) -> TokenResult<Self> {
        if let Some(service) = payload.get("service") {
            let service = service
                .as_str()
                .ok_or_else(|| TokenError::invalid_claim("service", "is not a string"))?;
            if service.is_empty() {
                return Err(TokenError::invalid_claim("service", "is empty"));
            }
            return Ok(Self::ByService(service.to_string()));
        }

        if let Some(iss) = payload.get("iss") {
            let iss = iss
                .as_str()
                .ok_or_else(|| TokenError::invalid_claim("iss", "is not a string"))?;
            let (_, tenant) = iss
                .rsplit_once('/')
                .ok_or_else(|| TokenError::invalid_claim("iss", "has no '/' separator"))?;
            if tenant.is_empty() {
                return Err(TokenError::invalid_claim("iss", "ends with '/'"));
            }
            return Ok(Self::ByIssuer(tenant.to_string()));
        }

        Ok(Self::Absent)
    }

    /// The tenant id, if the token named one.
    pub fn tenant(&self) -> Option<&str> {
        match self {
            Self::ByService(id) | Self::ByIssuer(id) => Some(id),
            Self::Absent => None,
        }
    }

    pub fn into_tenant(self) -> Option<String> {
        match self {
            Self::ByService(id) | Self::ByIssuer(id) => Some(id),
            Self::Absent => None,
        }
    }
}

/// Decode a base64 token segment whose padding may have been stripped.
///
/// The segment is right-padded with `=` to a multiple of four and decoded
/// with the standard alphabet, falling back to the URL-safe alphabet.
pub fn decode_segment(segment: &str) -> TokenResult<String> {
    let mut padded = segment.to_string();
    let missing = padded.len() % 4;
    if missing != 0 {
        padded.extend(std::iter::repeat('=').take(4 - missing));
    }

    let bytes = match STANDARD.decode(&padded) {
        Ok(bytes) => bytes,
        Err(standard_err) => URL_SAFE.decode(&padded).map_err(|_| standard_err)?,
    };

    Ok(String::from_utf8(bytes)?)
}

/// Return the payload segment of a `header.payload.signature` token.
fn payload_segment(token: &str) -> TokenResult<&str> {
    let mut segments = token.split('.');
    segments.next();
    segments.next().ok_or(TokenError::Malformed { segments: 1 })
}

/// Resolve the tenant claim carried by a bearer token.
///
/// ```rust
/// use dog_auth::{resolve_tenant_claim, TenantClaim};
///
/// // {"service":"acme"}
/// let claim = resolve_tenant_claim("h.eyJzZXJ2aWNlIjoiYWNtZSJ9.sig").unwrap();
/// assert_eq!(claim, TenantClaim::ByService("acme".to_string()));
/// ```
pub fn resolve_tenant_claim(token: &str) -> TokenResult<TenantClaim> {
    let token = token.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }

    let payload = decode_segment(payload_segment(token)?)?;
    match serde_json::from_str::<Value>(&payload)? {
        Value::Object(map) => TenantClaim::from_payload(&map),
        _ => Err(TokenError::NotAnObject),
    }
}

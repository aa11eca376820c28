// Authorization header extraction.

use std::collections::HashMap;

use http::HeaderMap;

/// Anything a bearer token can be read from.
pub trait AuthorizationSource {
    /// Raw value of the named header, looked up case-insensitively.
    fn header(&self, name: &str) -> Option<&str>;
}

impl AuthorizationSource for HeaderMap {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.to_str().ok())
    }
}

impl AuthorizationSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v)
            })
            .map(|s| s.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct BearerOptions {
    pub header: String,
    pub schemes: Vec<String>,
}

impl Default for BearerOptions {
    fn default() -> Self {
        Self {
            header: "authorization".to_string(),
            schemes: vec!["Bearer".to_string(), "JWT".to_string()],
        }
    }
}

impl BearerOptions {
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into().to_ascii_lowercase();
        self
    }

    /// Is there an authorization header at all, even an unusable one?
    pub fn is_present<S: AuthorizationSource + ?Sized>(&self, source: &S) -> bool {
        source.header(&self.header).is_some()
    }

    /// Pull the token out of the configured header.
    ///
    /// `<scheme> <token>` is accepted for the configured schemes; a value
    /// without a scheme is taken whole. An unknown scheme yields no token.
    pub fn extract<'a, S: AuthorizationSource + ?Sized>(&self, source: &'a S) -> Option<&'a str> {
        let hv = source.header(&self.header)?.trim();
        if hv.is_empty() || self.schemes.iter().any(|s| s.eq_ignore_ascii_case(hv)) {
            return None;
        }

        if let Some((scheme, token)) = hv.split_once(' ') {
            let allowed = self
                .schemes
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme.trim()));
            let token = token.trim();
            return (allowed && !token.is_empty()).then_some(token);
        }

        Some(hv)
    }
}

//! Turning an auth configuration into concrete headers and query params.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{ApiKeyLocation, AuthConfig};
use crate::key_value::KeyValue;

/// Headers and query parameters contributed by authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAuth {
    /// Headers to send before the user's own headers
    pub headers: Vec<KeyValue>,
    /// Query parameters to append to the URL
    pub params: Vec<KeyValue>,
}

impl ResolvedAuth {
    /// Returns true if auth contributes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.params.is_empty()
    }
}

/// Resolves auth into headers and params.
///
/// Values are used as-is, including empty ones. Basic credentials are
/// base64-encoded from their UTF-8 bytes, so non-ASCII input is safe.
#[must_use]
pub fn resolve_auth(auth: &AuthConfig) -> ResolvedAuth {
    let mut resolved = ResolvedAuth::default();
    match auth {
        AuthConfig::None => {}
        AuthConfig::Basic { basic } => {
            let encoded = STANDARD.encode(format!("{}:{}", basic.username, basic.password));
            resolved
                .headers
                .push(KeyValue::new("Authorization", format!("Basic {encoded}")));
        }
        AuthConfig::Bearer { bearer } => {
            resolved.headers.push(KeyValue::new(
                "Authorization",
                format!("{} {}", bearer.prefix, bearer.token),
            ));
        }
        AuthConfig::ApiKey { apikey } => {
            let pair = KeyValue::new(apikey.key.clone(), apikey.value.clone());
            match apikey.add_to {
                ApiKeyLocation::Header => resolved.headers.push(pair),
                ApiKeyLocation::Query => resolved.params.push(pair),
            }
        }
    }
    resolved
}

//! Authentication configuration types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authentication configuration for a request.
///
/// Exactly one variant is active. Switching type starts the new variant
/// from its defaults. Each variant keeps its fields in a payload object
/// named after the type, e.g. `{"type":"basic","basic":{...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Basic authentication
    Basic {
        /// Credentials
        #[serde(default)]
        basic: BasicAuth,
    },
    /// Bearer token authentication
    Bearer {
        /// Token and scheme word
        #[serde(default)]
        bearer: BearerAuth,
    },
    /// API key authentication
    ApiKey {
        /// Key name, value and placement
        #[serde(default)]
        apikey: ApiKeyAuth,
    },
}

/// Basic authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BasicAuth {
    /// Username (may contain variables)
    pub username: String,
    /// Password (may contain variables)
    pub password: String,
}

/// Bearer token settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BearerAuth {
    /// The bearer token (may contain variables like `{{access_token}}`)
    pub token: String,
    /// Scheme word placed before the token, defaults to "Bearer"
    pub prefix: String,
}

impl Default for BearerAuth {
    fn default() -> Self {
        Self {
            token: String::new(),
            prefix: DEFAULT_BEARER_PREFIX.to_string(),
        }
    }
}

/// API key settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiKeyAuth {
    /// Header or query parameter name
    pub key: String,
    /// The key material
    pub value: String,
    /// Where to add the key
    pub add_to: ApiKeyLocation,
}

/// Scheme word used by new bearer configurations.
pub const DEFAULT_BEARER_PREFIX: &str = "Bearer";

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    /// Add to request headers
    #[default]
    Header,
    /// Add to query parameters
    Query,
}

/// Discriminant of [`AuthConfig`], as picked in the auth type selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No authentication
    #[default]
    None,
    /// Basic authentication
    Basic,
    /// Bearer token
    Bearer,
    /// API key
    #[serde(rename = "apikey")]
    ApiKey,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Bearer => "bearer",
            Self::ApiKey => "apikey",
        })
    }
}

/// A single field update on the active auth variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEdit {
    /// Basic username
    Username(String),
    /// Basic password
    Password(String),
    /// Bearer token
    Token(String),
    /// Bearer prefix
    Prefix(String),
    /// API key name
    ApiKeyName(String),
    /// API key value
    ApiKeyValue(String),
    /// API key placement
    ApiKeyAddTo(ApiKeyLocation),
}

impl AuthConfig {
    /// Fresh configuration for the given type with every field at its default.
    #[must_use]
    pub fn empty(auth_type: AuthType) -> Self {
        match auth_type {
            AuthType::None => Self::None,
            AuthType::Basic => Self::Basic {
                basic: BasicAuth::default(),
            },
            AuthType::Bearer => Self::Bearer {
                bearer: BearerAuth::default(),
            },
            AuthType::ApiKey => Self::ApiKey {
                apikey: ApiKeyAuth::default(),
            },
        }
    }

    /// Returns the discriminant.
    #[must_use]
    pub const fn auth_type(&self) -> AuthType {
        match self {
            Self::None => AuthType::None,
            Self::Basic { .. } => AuthType::Basic,
            Self::Bearer { .. } => AuthType::Bearer,
            Self::ApiKey { .. } => AuthType::ApiKey,
        }
    }

    /// Creates a bearer token authentication with the default prefix.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::bearer_with_prefix(token, DEFAULT_BEARER_PREFIX)
    }

    /// Creates a bearer token authentication with a custom scheme word.
    #[must_use]
    pub fn bearer_with_prefix(token: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::Bearer {
            bearer: BearerAuth {
                token: token.into(),
                prefix: prefix.into(),
            },
        }
    }

    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            basic: BasicAuth {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// Creates an API key authentication.
    #[must_use]
    pub fn api_key(
        key: impl Into<String>,
        value: impl Into<String>,
        add_to: ApiKeyLocation,
    ) -> Self {
        Self::ApiKey {
            apikey: ApiKeyAuth {
                key: key.into(),
                value: value.into(),
                add_to,
            },
        }
    }

    /// Applies an edit if it targets the active variant.
    ///
    /// Returns false and leaves the config untouched otherwise.
    pub fn apply(&mut self, edit: AuthEdit) -> bool {
        match (self, edit) {
            (Self::Basic { basic }, AuthEdit::Username(v)) => basic.username = v,
            (Self::Basic { basic }, AuthEdit::Password(v)) => basic.password = v,
            (Self::Bearer { bearer }, AuthEdit::Token(v)) => bearer.token = v,
            (Self::Bearer { bearer }, AuthEdit::Prefix(v)) => bearer.prefix = v,
            (Self::ApiKey { apikey }, AuthEdit::ApiKeyName(v)) => apikey.key = v,
            (Self::ApiKey { apikey }, AuthEdit::ApiKeyValue(v)) => apikey.value = v,
            (Self::ApiKey { apikey }, AuthEdit::ApiKeyAddTo(v)) => apikey.add_to = v,
            _ => return false,
        }
        true
    }
}

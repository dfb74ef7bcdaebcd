//! HTTP request body types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the request carries a body at all.
///
/// The raw text is kept on [`RequestBody`] regardless of mode so switching
/// back and forth does not lose what was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    /// No body
    #[default]
    None,
    /// Raw text body
    Raw,
}

/// Syntax of a raw body, used for the automatic `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// JSON
    #[default]
    Json,
    /// Plain text
    Text,
    /// XML
    Xml,
    /// HTML
    Html,
}

impl ContentType {
    /// MIME type sent for this body syntax.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/plain",
            Self::Xml => "application/xml",
            Self::Html => "text/html",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// HTTP request body as edited in a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// Body mode
    pub mode: BodyMode,
    /// Syntax of the raw text
    #[serde(default)]
    pub content_type: ContentType,
    /// The raw text, kept even when `mode` is none
    #[serde(default)]
    pub raw: String,
}

impl RequestBody {
    /// Creates a raw body with the given syntax.
    #[must_use]
    pub fn raw(content_type: ContentType, raw: impl Into<String>) -> Self {
        Self {
            mode: BodyMode::Raw,
            content_type,
            raw: raw.into(),
        }
    }

    /// Returns the text to send, if any.
    #[must_use]
    pub fn sendable(&self) -> Option<&str> {
        (self.mode == BodyMode::Raw && !self.raw.is_empty()).then_some(self.raw.as_str())
    }
}

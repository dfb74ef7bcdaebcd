//! Response specification type
//!
//! Contains the response shown in a tab's response pane, plus the small
//! display helpers derived from it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::key_value::KeyValue;

/// Display category of a status code, used to colour the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 3xx
    Redirect,
    /// Anything else with a non-zero code
    Error,
    /// No status available
    Neutral,
}

impl StatusClass {
    /// Classifies a numeric status code.
    #[must_use]
    pub const fn of(status: u16) -> Self {
        match status {
            0 => Self::Neutral,
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            _ => Self::Error,
        }
    }
}

/// HTTP response as received by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Status text (e.g., "OK", "Not Found")
    pub status_text: String,
    /// Response headers in received order.
    #[serde(default)]
    pub headers: Vec<KeyValue>,
    /// Response body decoded as text.
    pub body: String,
    /// Content-Type header value, empty when absent.
    #[serde(default)]
    pub content_type: String,
    /// Elapsed time in milliseconds.
    pub time: u64,
    /// Body size in bytes, before any truncation.
    pub size: u64,
}

impl ResponseSpec {
    /// Builds a response from raw parts.
    ///
    /// `size` is the byte length of the original body; `body` may already
    /// be truncated by the caller.
    #[must_use]
    pub fn from_parts(
        status: u16,
        status_text: impl Into<String>,
        headers: Vec<KeyValue>,
        body: String,
        size: u64,
        elapsed: Duration,
    ) -> Self {
        let mut response = Self {
            status,
            status_text: status_text.into(),
            headers,
            body,
            content_type: String::new(),
            time: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            size,
        };
        response.content_type = response
            .get_header("content-type")
            .map(str::to_string)
            .unwrap_or_default();
        response
    }

    /// Returns the display category of the status code.
    #[must_use]
    pub const fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }

    /// Returns a human-readable size string (e.g., "1.50 KB").
    #[must_use]
    pub fn formatted_size(&self) -> String {
        format_bytes(self.size)
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if the content type indicates JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json") || self.content_type.contains("+json")
    }
}

/// Formats a byte count as `B`, `KB` or `MB` with two decimals above 1 KiB.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    #[allow(clippy::cast_precision_loss)]
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_575), "1024.00 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 / 2), "1.50 MB");
    }

    #[test]
    fn test_status_class() {
        assert_eq!(StatusClass::of(0), StatusClass::Neutral);
        assert_eq!(StatusClass::of(204), StatusClass::Success);
        assert_eq!(StatusClass::of(304), StatusClass::Redirect);
        assert_eq!(StatusClass::of(404), StatusClass::Error);
        assert_eq!(StatusClass::of(503), StatusClass::Error);
        assert_eq!(StatusClass::of(101), StatusClass::Error);
    }

    #[test]
    fn test_from_parts_extracts_content_type() {
        let response = ResponseSpec::from_parts(
            200,
            "OK",
            vec![KeyValue::new("Content-Type", "application/json; charset=utf-8")],
            "{}".into(),
            2048,
            Duration::from_millis(42),
        );
        assert_eq!(response.content_type, "application/json; charset=utf-8");
        assert_eq!(response.time, 42);
        assert_eq!(response.formatted_size(), "2.00 KB");
        assert_eq!(response.get_header("content-type"), Some("application/json; charset=utf-8"));
        assert!(response.is_json());
    }
}

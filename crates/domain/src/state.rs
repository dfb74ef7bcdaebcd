//! Request lifecycle state held by each tab.
//!
//! Exactly one status holds at a time. The response only exists in the
//! success state and the error payload only in the error state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::response::ResponseSpec;

/// Represents the current state of a tab's request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing sent yet, or reset after a restore.
    #[default]
    Idle,

    /// Request is in flight.
    Loading,

    /// Request completed with a response, whatever its status code.
    Success {
        /// The response data.
        response: Box<ResponseSpec>,
    },

    /// Request failed, was rejected before sending, or was cancelled.
    Error(RequestError),
}

impl RequestState {
    /// Creates a Loading state.
    #[must_use]
    pub const fn loading() -> Self {
        Self::Loading
    }

    /// Creates a Success state from a response.
    #[must_use]
    pub fn success(response: ResponseSpec) -> Self {
        Self::Success {
            response: Box::new(response),
        }
    }

    /// Creates an Error state.
    #[must_use]
    pub fn error(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self::Error(RequestError::new(kind, message))
    }

    /// Returns the flat status tag.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        match self {
            Self::Idle => RequestStatus::Idle,
            Self::Loading => RequestStatus::Loading,
            Self::Success { .. } => RequestStatus::Success,
            Self::Error(_) => RequestStatus::Error,
        }
    }

    /// Returns the response if in Success state.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSpec> {
        match self {
            Self::Success { response } => Some(response),
            _ => None,
        }
    }

    /// Returns the error payload if in Error state.
    #[must_use]
    pub const fn error_payload(&self) -> Option<&RequestError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// Flat status tag of a [`RequestState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Nothing sent
    Idle,
    /// In flight
    Loading,
    /// Response received
    Success,
    /// Failed or cancelled
    Error,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// Error payload shown in the response pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestError {
    /// Human-readable message.
    pub message: String,
    /// Error category.
    #[serde(rename = "type")]
    pub kind: RequestErrorKind,
}

impl RequestError {
    /// Creates an error payload.
    #[must_use]
    pub fn new(kind: RequestErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.title(), self.message)
    }
}

/// Categories of request errors for user-friendly display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestErrorKind {
    /// Empty or malformed URL, caught before any network attempt.
    Validation,

    /// Transport-level failure.
    Network,

    /// Cross-origin rejection, detected from the failure text.
    Cors,

    /// The transport gave up waiting.
    Timeout,

    /// Cancelled by the user.
    Abort,

    /// Anything else.
    Unknown,
}

impl RequestErrorKind {
    /// Returns false for user cancellation, which is not a failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Abort)
    }

    /// Returns user-friendly suggestions for this error type.
    #[must_use]
    pub const fn suggestions(&self) -> &[&'static str] {
        match self {
            Self::Validation => &[
                "Check that the URL starts with http:// or https://",
                "Verify that every {{variable}} is defined in the active environment",
            ],
            Self::Network => &[
                "Check if the server is running",
                "Verify the hostname and port are correct",
                "Check your network connection",
            ],
            Self::Cors => &[
                "The server must send an Access-Control-Allow-Origin header",
                "Try a CORS-enabled API such as https://httpbin.org",
            ],
            Self::Timeout => &[
                "The server may be slow or overloaded",
                "Try increasing the timeout value",
            ],
            Self::Abort => &[],
            Self::Unknown => &[
                "An unexpected error occurred",
                "Check the error details for more information",
            ],
        }
    }

    /// Returns a human-readable title for this error type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid Request",
            Self::Network => "Network Error",
            Self::Cors => "Blocked by CORS",
            Self::Timeout => "Request Timeout",
            Self::Abort => "Request Cancelled",
            Self::Unknown => "Unknown Error",
        }
    }
}

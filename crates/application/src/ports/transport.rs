//! Transport port

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use querybox_domain::{HttpMethod, KeyValue, ResponseSpec};

/// A fully resolved request, ready for the wire.
///
/// Variables are substituted, auth is applied and the body is attached
/// only when it should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including auth query parameters
    pub url: String,
    /// Headers in send order; auth headers come first
    pub headers: Vec<KeyValue>,
    /// Raw body text
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Errors the transport can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The URL was rejected by the client.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Host name resolution failed.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve
        host: String,
        /// Underlying error text
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host
        host: String,
        /// Target port
        port: u16,
    },

    /// Any other connection-level failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Redirect limit reached.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Configured limit
        max: usize,
    },

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`Transport::send`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseSpec, TransportError>> + Send + 'a>>;

/// Port for sending HTTP requests.
///
/// Dropping the returned future must abort the request.
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response, whatever its status code.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response was received.
    fn send(&self, request: PreparedRequest) -> TransportFuture<'_>;
}

//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request URL is empty after interpolation.
    #[error("Please enter a URL before sending a request.")]
    EmptyUrl,

    /// The request URL could not be parsed as an absolute URL.
    #[error("\"{0}\" is not a valid URL. Make sure it starts with http:// or https://.")]
    InvalidUrl(String),

    /// The HTTP method is not one of the supported five.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// An export file does not match the expected envelope.
    #[error("invalid export file: {0}")]
    InvalidExport(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

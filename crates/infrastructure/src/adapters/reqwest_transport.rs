//! Transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port using the reqwest library.
//! It handles all HTTP communication for the workbench.

use std::error::Error as _;
use std::time::{Duration, Instant};

use querybox_application::ports::{PreparedRequest, Transport, TransportError, TransportFuture};
use querybox_domain::{HttpMethod, KeyValue, ResponseSpec};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// Response bodies beyond this many bytes are truncated.
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

const TRUNCATION_NOTICE: &str = "\n\n[Response truncated: body exceeds 5 MB limit]";

/// Settings for [`ReqwestTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Whole-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Redirects followed before giving up
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            user_agent: format!("QueryBox/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 10,
        }
    }
}

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(TransportConfig::default())
    }

    /// Creates a transport with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_config(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to `TransportError`, looking through the source chain.
    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: self.config.timeout_ms,
            };
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects {
                max: self.config.max_redirects,
            };
        }

        let message = error_chain(error);
        if error.is_connect() {
            let lower = message.to_lowercase();
            let host = error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string();
            if lower.contains("dns") || lower.contains("resolve") {
                return TransportError::DnsError { host, message };
            }
            if lower.contains("refused") {
                let port = error
                    .url()
                    .and_then(Url::port_or_known_default)
                    .unwrap_or(80);
                return TransportError::ConnectionRefused { host, port };
            }
            return TransportError::ConnectionFailed(message);
        }

        TransportError::Other(message)
    }
}

fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Decodes a body as UTF-8, truncating it past [`MAX_BODY_SIZE`].
fn decode_body(bytes: &[u8]) -> String {
    if bytes.len() > MAX_BODY_SIZE {
        let mut body = String::from_utf8_lossy(&bytes[..MAX_BODY_SIZE]).into_owned();
        body.push_str(TRUNCATION_NOTICE);
        body
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Body size from `Content-Length`, or the received byte count.
fn response_size(headers: &[KeyValue], received: usize) -> u64 {
    headers
        .iter()
        .find(|h| h.key.eq_ignore_ascii_case("content-length"))
        .and_then(|h| h.value.trim().parse().ok())
        .unwrap_or_else(|| u64::try_from(received).unwrap_or(u64::MAX))
}

impl Transport for ReqwestTransport {
    fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
        Box::pin(async move {
            let url = Url::parse(&request.url)
                .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;

            let start = Instant::now();

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);
            for header in &request.headers {
                builder = builder.header(&header.key, &header.value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| self.map_error(&e))?;

            let status = response.status();
            let headers: Vec<KeyValue> = response
                .headers()
                .iter()
                .map(|(k, v)| KeyValue::new(k.as_str(), v.to_str().unwrap_or("<binary>")))
                .collect();

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TransportError::Other(format!("Failed to read body: {e}")))?;
            let elapsed = start.elapsed();

            let size = response_size(&headers, bytes.len());
            debug!(status = status.as_u16(), size, "response body read");

            Ok(ResponseSpec::from_parts(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                headers,
                decode_body(&bytes),
                size,
                elapsed,
            ))
        })
    }
}

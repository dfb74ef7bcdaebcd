//! Send Request Use Case
//!
//! Resolves a tab's request into a [`PreparedRequest`], races it against
//! cancellation and classifies failures for display.

use std::sync::Arc;

use querybox_domain::request::url::{build_url_with_params, validate_url};
use querybox_domain::{
    DomainError, DomainResult, KeyValue, RequestError, RequestErrorKind, RequestSpec,
    ResponseSpec, VariableMap, resolve_auth,
};

use crate::ports::{CancellationReceiver, PreparedRequest, Transport, TransportError};
use crate::variable_resolver::interpolate_request;

/// Message shown when the user cancels a send.
pub const CANCELLED_MESSAGE: &str = "Request was cancelled.";

const CORS_MESSAGE: &str = "The request was blocked by the server's CORS policy. \
The target API must include 'Access-Control-Allow-Origin' in its response headers. \
Try testing with https://jsonplaceholder.typicode.com or https://httpbin.org instead.";

const CORS_SIGNATURES: [&str; 4] = ["cors", "cross-origin", "access-control", "failed to fetch"];

/// A request resolved against the active variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSend {
    /// What goes on the wire
    pub prepared: PreparedRequest,
    /// Full URL before interpolation, for the history log
    pub history_url: String,
    /// Host of the resolved URL
    pub host: Option<String>,
}

/// Resolves variables and auth, then validates the URL.
///
/// Variables are only substituted when the map is non-empty. Auth headers
/// come first and are dropped when the user sets a header with the same
/// name. A `Content-Type` matching the body syntax is added when the user
/// did not set one.
///
/// # Errors
///
/// Returns [`DomainError::EmptyUrl`] or [`DomainError::InvalidUrl`] when the
/// resolved URL cannot be sent.
pub fn prepare_send(request: &RequestSpec, variables: &VariableMap) -> DomainResult<ResolvedSend> {
    let resolved = if variables.is_empty() {
        request.clone()
    } else {
        interpolate_request(request, variables)
    };

    let url = build_url_with_params(resolved.url.trim(), &resolved.params);
    let mut parsed = validate_url(&url)?;
    let host = parsed.host_str().map(str::to_owned);

    let auth = resolve_auth(&resolved.auth);
    let url = if auth.params.is_empty() {
        url.trim().to_string()
    } else {
        {
            let mut query = parsed.query_pairs_mut();
            for param in &auth.params {
                query.append_pair(&param.key, &param.value);
            }
        }
        parsed.to_string()
    };

    let user_headers: Vec<KeyValue> = resolved
        .effective_headers()
        .map(|h| KeyValue::new(h.key.clone(), h.value.clone()))
        .collect();
    let mut headers: Vec<KeyValue> = auth
        .headers
        .into_iter()
        .filter(|a| !user_headers.iter().any(|u| u.key.eq_ignore_ascii_case(&a.key)))
        .collect();
    headers.extend(user_headers);

    let body = if resolved.method.has_body() {
        resolved.body.sendable().map(str::to_owned)
    } else {
        None
    };
    if body.is_some() && !headers.iter().any(|h| h.key.eq_ignore_ascii_case("content-type")) {
        headers.push(KeyValue::new(
            "Content-Type",
            resolved.body.content_type.mime_type(),
        ));
    }

    Ok(ResolvedSend {
        prepared: PreparedRequest {
            method: resolved.method,
            url,
            headers,
            body,
        },
        history_url: request.full_url(),
        host,
    })
}

/// Use case for sending a prepared request with cancellation support.
pub struct SendRequest {
    transport: Arc<dyn Transport>,
}

impl SendRequest {
    /// Creates the use case around a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends the request, or returns [`TransportError::Cancelled`] as soon
    /// as `cancel` fires. The transport future is dropped on cancellation.
    ///
    /// # Errors
    ///
    /// Returns the transport's error, or `Cancelled`.
    pub async fn execute(
        &self,
        request: PreparedRequest,
        mut cancel: CancellationReceiver,
    ) -> Result<ResponseSpec, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.transport.send(request) => result,
        }
    }
}

fn looks_like_cors(text: &str) -> bool {
    let text = text.to_lowercase();
    CORS_SIGNATURES.iter().any(|signature| text.contains(signature))
}

/// Maps a transport failure onto the error shown in the response pane.
#[must_use]
pub fn classify_failure(error: &TransportError) -> RequestError {
    let text = error.to_string();
    match error {
        TransportError::Cancelled => RequestError::new(RequestErrorKind::Abort, CANCELLED_MESSAGE),
        TransportError::Timeout { .. } => RequestError::new(RequestErrorKind::Timeout, text),
        _ if looks_like_cors(&text) => RequestError::new(RequestErrorKind::Cors, CORS_MESSAGE),
        TransportError::DnsError { .. }
        | TransportError::ConnectionRefused { .. }
        | TransportError::ConnectionFailed(_)
        | TransportError::TooManyRedirects { .. } => {
            RequestError::new(RequestErrorKind::Network, format!("Network error: {text}"))
        }
        TransportError::InvalidUrl(_) | TransportError::Other(_) => {
            RequestError::new(RequestErrorKind::Unknown, text)
        }
    }
}

/// Error for a request rejected before it reached the transport.
#[must_use]
pub fn validation_error(error: &DomainError) -> RequestError {
    RequestError::new(RequestErrorKind::Validation, error.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::{CancellationToken, TransportFuture};
    use pretty_assertions::assert_eq;
    use querybox_domain::{
        ApiKeyLocation, AuthConfig, ContentType, HttpMethod, KeyValueEdit, KeyValuePair,
        RequestBody,
    };
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> VariableMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn header(request: &mut RequestSpec, key: &str, value: &str) {
        request.headers.push(KeyValuePair::new(key, value));
    }

    #[test]
    fn test_interpolates_url_and_params() {
        let mut request = RequestSpec::new(HttpMethod::Get, "{{base}}/users?page={{page}}");
        request.set_url("{{base}}/users?page={{page}}");
        let resolved =
            prepare_send(&request, &vars(&[("base", "https://api.dev"), ("page", "2")])).unwrap();
        assert_eq!(resolved.prepared.url, "https://api.dev/users?page=2");
        assert_eq!(resolved.host.as_deref(), Some("api.dev"));
        assert_eq!(resolved.history_url, request.full_url());
        assert!(resolved.history_url.contains("{{base}}"));
    }

    #[test]
    fn test_empty_map_skips_interpolation() {
        let request = RequestSpec::new(HttpMethod::Get, "{{base}}/users");
        assert!(matches!(
            prepare_send(&request, &VariableMap::new()),
            Err(DomainError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let blank = RequestSpec::new(HttpMethod::Get, "  ");
        assert_eq!(prepare_send(&blank, &VariableMap::new()), Err(DomainError::EmptyUrl));
        let error = validation_error(&DomainError::EmptyUrl);
        assert_eq!(error.kind, RequestErrorKind::Validation);
        assert_eq!(error.message, "Please enter a URL before sending a request.");
    }

    #[test]
    fn test_auth_headers_first_and_user_wins() {
        let mut request = RequestSpec::new(HttpMethod::Get, "https://a.com");
        request.auth = AuthConfig::bearer("t0k");
        header(&mut request, "X-Trace", "1");
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        assert_eq!(prepared.headers[0], KeyValue::new("Authorization", "Bearer t0k"));
        assert_eq!(prepared.headers[1], KeyValue::new("X-Trace", "1"));

        header(&mut request, "authorization", "Custom x");
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        assert_eq!(prepared.headers.len(), 2);
        assert_eq!(prepared.header("Authorization"), Some("Custom x"));
    }

    #[test]
    fn test_api_key_in_query_is_appended() {
        let mut request = RequestSpec::new(HttpMethod::Get, "https://a.com/x?q=1");
        request.auth = AuthConfig::api_key("api_key", "s3cret", ApiKeyLocation::Query);
        let resolved = prepare_send(&request, &VariableMap::new()).unwrap();
        assert_eq!(resolved.prepared.url, "https://a.com/x?q=1&api_key=s3cret");
        assert_eq!(resolved.history_url, "https://a.com/x?q=1");
    }

    #[test]
    fn test_body_only_for_body_methods() {
        let mut request = RequestSpec::new(HttpMethod::Get, "https://a.com");
        request.body = RequestBody::raw(ContentType::Json, r#"{"a":1}"#);
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        assert_eq!(prepared.body, None);
        assert_eq!(prepared.header("Content-Type"), None);

        request.method = HttpMethod::Delete;
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        assert_eq!(prepared.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(prepared.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_user_content_type_is_kept() {
        let mut request = RequestSpec::new(HttpMethod::Post, "https://a.com");
        request.body = RequestBody::raw(ContentType::Json, "{}");
        header(&mut request, "content-type", "application/vnd.api+json");
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        let types: Vec<_> = prepared
            .headers
            .iter()
            .filter(|h| h.key.eq_ignore_ascii_case("content-type"))
            .collect();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].value, "application/vnd.api+json");
    }

    #[test]
    fn test_disabled_headers_are_not_sent() {
        let mut request = RequestSpec::new(HttpMethod::Get, "https://a.com");
        header(&mut request, "X-Off", "1");
        let id = request.headers.iter().next().unwrap().id.clone();
        request.headers.update(&id, KeyValueEdit::Enabled(false));
        let prepared = prepare_send(&request, &VariableMap::new()).unwrap().prepared;
        assert!(prepared.headers.is_empty());
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            classify_failure(&TransportError::Cancelled),
            RequestError::new(RequestErrorKind::Abort, CANCELLED_MESSAGE)
        );
        assert_eq!(
            classify_failure(&TransportError::Timeout { timeout_ms: 10 }).kind,
            RequestErrorKind::Timeout
        );
        let network = classify_failure(&TransportError::ConnectionFailed("reset".into()));
        assert_eq!(network.kind, RequestErrorKind::Network);
        assert_eq!(network.message, "Network error: connection failed: reset");

        let cors = classify_failure(&TransportError::Other("Cross-Origin request blocked".into()));
        assert_eq!(cors.kind, RequestErrorKind::Cors);
        assert!(cors.message.contains("Access-Control-Allow-Origin"));

        assert_eq!(
            classify_failure(&TransportError::Other("boom".into())).kind,
            RequestErrorKind::Unknown
        );
    }

    struct NeverResponds;

    impl Transport for NeverResponds {
        fn send(&self, _request: PreparedRequest) -> TransportFuture<'_> {
            Box::pin(std::future::pending())
        }
    }

    struct Echo;

    impl Transport for Echo {
        fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
            Box::pin(async move {
                Ok(ResponseSpec {
                    status: 200,
                    body: request.url,
                    ..ResponseSpec::default()
                })
            })
        }
    }

    fn prepared(url: &str) -> PreparedRequest {
        PreparedRequest {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_execute_returns_response() {
        let use_case = SendRequest::new(Arc::new(Echo));
        let token = CancellationToken::new();
        let response = use_case
            .execute(prepared("https://a.com"), token.receiver())
            .await
            .unwrap();
        assert_eq!(response.body, "https://a.com");
    }

    #[tokio::test]
    async fn test_execute_is_cancellable() {
        let use_case = Arc::new(SendRequest::new(Arc::new(NeverResponds)));
        let token = CancellationToken::new();
        let receiver = token.receiver();
        let task = tokio::spawn({
            let use_case = Arc::clone(&use_case);
            async move { use_case.execute(prepared("https://a.com"), receiver).await }
        });
        token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(TransportError::Cancelled));
    }
}

//! Sent-request history entries.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::{HttpMethod, RequestSpec};

/// Maximum number of history entries kept, newest first.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// A request that got a response.
///
/// `url` and `request_snapshot` hold the unresolved request, so `{{var}}`
/// placeholders survive for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier
    pub id: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Full URL before variable interpolation
    pub url: String,
    /// Response status code
    pub status: u16,
    /// Response status text
    pub status_text: String,
    /// When the response arrived, epoch milliseconds
    pub timestamp: i64,
    /// Copy of the request as it was edited
    pub request_snapshot: RequestSpec,
}

impl HistoryEntry {
    /// Records a request and the status it received.
    #[must_use]
    pub fn new(
        request: &RequestSpec,
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: generate_id(),
            method: request.method,
            url: url.into(),
            status,
            status_text: status_text.into(),
            timestamp,
            request_snapshot: request.clone(),
        }
    }
}

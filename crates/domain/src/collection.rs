//! Named groups of saved requests.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::{HttpMethod, RequestSpec};

/// A request saved into a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// HTTP method, copied from the snapshot
    pub method: HttpMethod,
    /// URL, copied from the snapshot
    pub url: String,
    /// When it was saved, epoch milliseconds
    pub saved_at: i64,
    /// The saved request
    pub request_snapshot: RequestSpec,
}

impl SavedRequest {
    /// Snapshots a request under a name.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec, saved_at: i64) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            method: request.method,
            url: request.url.clone(),
            saved_at,
            request_snapshot: request,
        }
    }
}

/// A named folder of saved requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
    /// Saved requests in insertion order
    #[serde(default)]
    pub requests: Vec<SavedRequest>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            created_at,
            requests: Vec::new(),
        }
    }

    /// Copy with a new id on the collection, its requests and their rows.
    #[must_use]
    pub fn with_fresh_ids(&self) -> Self {
        Self {
            id: generate_id(),
            requests: self
                .requests
                .iter()
                .map(|r| SavedRequest {
                    id: generate_id(),
                    request_snapshot: r.request_snapshot.with_fresh_ids(),
                    ..r.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

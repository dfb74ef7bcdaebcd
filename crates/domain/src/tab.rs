//! Workbench tabs.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;
use crate::request::RequestSpec;
use crate::response::ResponseSpec;
use crate::state::{RequestError, RequestState, RequestStatus};

/// Name given to every new tab until it is renamed.
pub const DEFAULT_TAB_NAME: &str = "New Request";

/// One independent request editor with its own response pane.
///
/// The request lifecycle state is session-only and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// The request being edited
    pub request: RequestSpec,
    /// Current request lifecycle state
    #[serde(skip)]
    pub state: RequestState,
    /// Set by request edits. Sending does not clear it.
    #[serde(default)]
    pub is_dirty: bool,
}

impl Tab {
    /// Creates a tab named [`DEFAULT_TAB_NAME`] with a blank GET request.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request(RequestSpec::default())
    }

    /// Creates a default-named tab around an existing request.
    #[must_use]
    pub fn with_request(request: RequestSpec) -> Self {
        Self {
            id: generate_id(),
            name: DEFAULT_TAB_NAME.to_string(),
            request,
            state: RequestState::Idle,
            is_dirty: false,
        }
    }

    /// Returns true while the tab still carries the default name.
    #[must_use]
    pub fn has_default_name(&self) -> bool {
        self.name == DEFAULT_TAB_NAME
    }

    /// Returns the flat status tag.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.state.status()
    }

    /// Returns the response if the last send succeeded.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSpec> {
        self.state.response()
    }

    /// Returns the error if the last send failed.
    #[must_use]
    pub const fn error(&self) -> Option<&RequestError> {
        self.state.error_payload()
    }
}

impl Default for Tab {
    fn default() -> Self {
        Self::new()
    }
}

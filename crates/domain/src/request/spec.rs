//! Request specification type

use serde::{Deserialize, Serialize};

use super::url::{build_url_with_params, parse_query_params};
use super::{HttpMethod, RequestBody};
use crate::auth::AuthConfig;
use crate::key_value::{KeyValueEdit, KeyValueList, KeyValuePair};

/// The editable request held by a tab.
///
/// `url` and `params` mirror each other: setting the URL re-derives the
/// params table, and editing the table rewrites the URL's query string.
/// Each direction is a pure derivation, so neither edit feeds back into
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RequestSpec {
    /// HTTP method
    #[serde(default)]
    pub method: HttpMethod,
    /// Target URL (may contain variable placeholders)
    #[serde(default)]
    pub url: String,
    /// Query parameters, kept in sync with `url`
    #[serde(default)]
    pub params: KeyValueList,
    /// User-defined headers
    #[serde(default)]
    pub headers: KeyValueList,
    /// Request body
    #[serde(default)]
    pub body: RequestBody,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

impl RequestSpec {
    /// Creates a request for the given method and URL, params derived from the URL.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        let mut spec = Self {
            method,
            ..Self::default()
        };
        spec.set_url(url);
        spec
    }

    /// Replaces the URL and re-derives the params table from its query string.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.params = parse_query_params(&self.url);
    }

    /// Runs `edit` on the params table, then rewrites the URL's query string.
    pub fn edit_params<R>(&mut self, edit: impl FnOnce(&mut KeyValueList) -> R) -> R {
        let result = edit(&mut self.params);
        self.url = build_url_with_params(&self.url, &self.params);
        result
    }

    /// Appends a blank param and returns its id.
    pub fn add_param(&mut self) -> String {
        self.edit_params(KeyValueList::add)
    }

    /// Edits one param. Returns false if the id is unknown.
    pub fn update_param(&mut self, id: &str, edit: KeyValueEdit) -> bool {
        self.edit_params(|params| params.update(id, edit))
    }

    /// Removes one param. Returns false if the id is unknown.
    pub fn remove_param(&mut self, id: &str) -> bool {
        self.edit_params(|params| params.remove(id))
    }

    /// Flips one param's enabled flag. Returns false if the id is unknown.
    pub fn toggle_param(&mut self, id: &str) -> bool {
        self.edit_params(|params| params.toggle(id))
    }

    /// URL with the effective params as its query string.
    #[must_use]
    pub fn full_url(&self) -> String {
        build_url_with_params(&self.url, &self.params)
    }

    /// Params that will be sent.
    pub fn effective_params(&self) -> impl Iterator<Item = &KeyValuePair> {
        self.params.effective()
    }

    /// Headers that will be sent, before auth and content-type additions.
    pub fn effective_headers(&self) -> impl Iterator<Item = &KeyValuePair> {
        self.headers.effective()
    }

    /// Deep copy with new ids on every params and headers row.
    #[must_use]
    pub fn with_fresh_ids(&self) -> Self {
        Self {
            params: self.params.with_fresh_ids(),
            headers: self.headers.with_fresh_ids(),
            ..self.clone()
        }
    }
}

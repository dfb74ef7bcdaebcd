//! Code snippet generation.
//!
//! Every generator renders the request it is given. Callers that want
//! concrete values interpolate first; otherwise placeholders such as
//! `{{token}}` appear verbatim.

mod curl;
mod javascript;
mod python;

use std::fmt;
use std::str::FromStr;

use querybox_domain::request::url::build_url_with_params;
use querybox_domain::{KeyValueList, KeyValuePair, RequestSpec, ResolvedAuth};
use serde::{Deserialize, Serialize};

pub use curl::generate_curl;
pub use javascript::{generate_javascript_fetch, generate_node_axios};
pub use python::generate_python_requests;

/// Target of a generated snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SnippetLanguage {
    /// Shell `curl` command
    #[default]
    Curl,
    /// Browser `fetch` with async/await
    JavascriptFetch,
    /// Python `requests`
    PythonRequests,
    /// Node.js `axios`
    NodejsAxios,
}

impl SnippetLanguage {
    /// All languages in menu order.
    pub const ALL: [Self; 4] = [
        Self::Curl,
        Self::JavascriptFetch,
        Self::PythonRequests,
        Self::NodejsAxios,
    ];

    /// Identifier used on the command line and in stored settings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::JavascriptFetch => "javascript-fetch",
            Self::PythonRequests => "python-requests",
            Self::NodejsAxios => "nodejs-axios",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Curl => "cURL",
            Self::JavascriptFetch => "JavaScript - fetch",
            Self::PythonRequests => "Python - requests",
            Self::NodejsAxios => "Node.js - axios",
        }
    }
}

impl fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnippetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|l| l.as_str()).collect();
                format!("unknown snippet language '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Renders `request` in the chosen language.
#[must_use]
pub fn generate_snippet(language: SnippetLanguage, request: &RequestSpec) -> String {
    match language {
        SnippetLanguage::Curl => generate_curl(request),
        SnippetLanguage::JavascriptFetch => generate_javascript_fetch(request),
        SnippetLanguage::PythonRequests => generate_python_requests(request),
        SnippetLanguage::NodejsAxios => generate_node_axios(request),
    }
}

/// URL with enabled params followed by auth query params.
fn final_url(request: &RequestSpec, auth: &ResolvedAuth) -> String {
    let params: KeyValueList = request
        .effective_params()
        .cloned()
        .chain(
            auth.params
                .iter()
                .map(|p| KeyValuePair::new(p.key.clone(), p.value.clone())),
        )
        .collect();
    build_url_with_params(&request.url, &params)
}

/// Auth headers first, then the user's enabled headers.
///
/// Duplicates are kept so the user's value is the last one written.
fn merged_headers<'a>(
    request: &'a RequestSpec,
    auth: &'a ResolvedAuth,
) -> Vec<(&'a str, &'a str)> {
    auth.headers
        .iter()
        .map(|h| (h.key.as_str(), h.value.as_str()))
        .chain(user_headers(request))
        .collect()
}

fn user_headers(request: &RequestSpec) -> impl Iterator<Item = (&str, &str)> {
    request
        .effective_headers()
        .map(|h| (h.key.as_str(), h.value.as_str()))
}

/// Raw body text when the method carries one.
fn body_text(request: &RequestSpec) -> Option<&str> {
    if request.method.has_body() {
        request.body.sendable()
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use querybox_domain::HttpMethod;

    #[test]
    fn test_language_ids_round_trip() {
        for language in SnippetLanguage::ALL {
            assert_eq!(language.as_str().parse::<SnippetLanguage>().unwrap(), language);
            assert_eq!(
                serde_json::to_value(language).unwrap(),
                serde_json::json!(language.as_str())
            );
        }
        assert_eq!(
            " Python-Requests ".parse::<SnippetLanguage>().unwrap(),
            SnippetLanguage::PythonRequests
        );
        assert!("ruby".parse::<SnippetLanguage>().is_err());
    }

    #[test]
    fn test_dispatcher_picks_generator() {
        let request = RequestSpec::new(HttpMethod::Get, "https://a.com");
        assert!(generate_snippet(SnippetLanguage::Curl, &request).starts_with("curl"));
        assert!(
            generate_snippet(SnippetLanguage::JavascriptFetch, &request)
                .starts_with("const response = await fetch(")
        );
        assert!(
            generate_snippet(SnippetLanguage::PythonRequests, &request)
                .starts_with("import requests")
        );
        assert!(
            generate_snippet(SnippetLanguage::NodejsAxios, &request)
                .starts_with("const axios = require('axios');")
        );
    }
}

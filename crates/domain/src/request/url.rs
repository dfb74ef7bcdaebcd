//! Two-way derivation between a URL's query string and its params table.
//!
//! URLs typed into the editor are often incomplete or templated
//! (`{{baseUrl}}/users?page=1`), so parsing falls back to a placeholder
//! origin when no scheme is present. The path and fragment the user typed
//! are preserved verbatim when the query is rebuilt.

use url::{Url, form_urlencoded};

use crate::error::{DomainError, DomainResult};
use crate::key_value::{KeyValueList, KeyValuePair};

const PLACEHOLDER_ORIGIN: &str = "https://placeholder.invalid/";

/// Returns true if the text starts with `http://` or `https://` (any case).
#[must_use]
pub fn has_http_scheme(url: &str) -> bool {
    let bytes = url.as_bytes();
    ["http://", "https://"].iter().any(|scheme| {
        bytes
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme.as_bytes()))
    })
}

fn parse_lenient(url: &str) -> Option<Url> {
    if has_http_scheme(url) {
        Url::parse(url).ok()
    } else {
        Url::parse(PLACEHOLDER_ORIGIN).ok()?.join(url).ok()
    }
}

/// Extracts the query string of `url` as enabled rows with fresh ids.
///
/// Unparseable input yields an empty list.
#[must_use]
pub fn parse_query_params(url: &str) -> KeyValueList {
    if url.trim().is_empty() {
        return KeyValueList::new();
    }
    parse_lenient(url)
        .map(|parsed| {
            parsed
                .query_pairs()
                .map(|(key, value)| KeyValuePair::new(key, value))
                .collect()
        })
        .unwrap_or_default()
}

/// Form-encodes the effective rows of `params` in order.
#[must_use]
pub fn encode_query(params: &KeyValueList) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for pair in params.effective() {
        serializer.append_pair(&pair.key, &pair.value);
    }
    serializer.finish()
}

/// Replaces the query string of `base` with the effective rows of `params`.
///
/// The fragment is kept. An empty base yields an empty string. When the base
/// cannot be parsed at all the encoded pairs are appended naively.
#[must_use]
pub fn build_url_with_params(base: &str, params: &KeyValueList) -> String {
    if base.is_empty() {
        return String::new();
    }
    let query = encode_query(params);

    if parse_lenient(base).is_none() {
        if query.is_empty() {
            return base.to_string();
        }
        let separator = if base.contains('?') { '&' } else { '?' };
        return format!("{base}{separator}{query}");
    }

    let (before_fragment, fragment) = base.find('#').map_or((base, ""), |i| base.split_at(i));
    let path = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(path, _)| path);

    let mut out = String::with_capacity(base.len() + query.len() + 1);
    out.push_str(path);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query);
    }
    out.push_str(fragment);
    out
}

/// Parses a fully interpolated URL that is about to be sent.
///
/// # Errors
///
/// Returns [`DomainError::EmptyUrl`] for blank input and
/// [`DomainError::InvalidUrl`] for anything that is not an absolute
/// http(s) URL.
pub fn validate_url(url: &str) -> DomainResult<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyUrl);
    }
    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        _ => Err(DomainError::InvalidUrl(trimmed.to_string())),
    }
}

/// Host portion of an absolute URL, if it has one.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}

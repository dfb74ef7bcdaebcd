//! cURL command generation.

use querybox_domain::{HttpMethod, RequestSpec, resolve_auth};

use super::{body_text, final_url, merged_headers};

const LINE_CONTINUATION: &str = " \\\n";

fn quote(text: &str) -> String {
    text.replace('\'', "'\\''")
}

/// Renders a request as a multi-line `curl` command.
///
/// Auth query params are appended after the enabled params. Auth headers
/// come before user headers and are not deduplicated, so the user's value
/// is the last one curl sees.
#[must_use]
pub fn generate_curl(request: &RequestSpec) -> String {
    let auth = resolve_auth(&request.auth);
    let url = final_url(request, &auth);

    let mut lines = vec!["curl".to_string()];
    if request.method != HttpMethod::Get {
        lines.push(format!("  -X {}", request.method.as_str()));
    }
    lines.push(format!("  '{}'", quote(&url)));

    for (key, value) in merged_headers(request, &auth) {
        lines.push(format!("  -H '{}: {}'", quote(key), quote(value)));
    }

    if let Some(body) = body_text(request) {
        lines.push(format!("  -d '{}'", quote(body)));
    }

    lines.join(LINE_CONTINUATION)
}

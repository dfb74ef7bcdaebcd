//! JavaScript snippets: browser `fetch` and Node.js `axios`.

use querybox_domain::{ContentType, HttpMethod, RequestSpec, resolve_auth};

use super::{body_text, final_url, merged_headers};

/// Escapes text for a single-quoted JS string literal.
fn single_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escapes text for a JS template literal so `${` is not evaluated.
fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn push_headers(lines: &mut Vec<String>, headers: &[(&str, &str)]) {
    if headers.is_empty() {
        return;
    }
    lines.push("  headers: {".to_string());
    for (key, value) in headers {
        lines.push(format!(
            "    '{}': '{}',",
            single_quoted(key),
            single_quoted(value)
        ));
    }
    lines.push("  },".to_string());
}

/// Body expression: JSON bodies are emitted as object literals, anything
/// else as a template literal.
fn body_expression(request: &RequestSpec, body: &str, wrap_json: bool) -> String {
    if request.body.content_type == ContentType::Json {
        if wrap_json {
            format!("JSON.stringify({body})")
        } else {
            body.to_string()
        }
    } else {
        format!("`{}`", escape_template_literal(body))
    }
}

/// Renders an async/await `fetch` call.
///
/// The response is read with `json()` for GET requests, JSON bodies, or
/// when an `Accept` header asks for JSON. Otherwise `text()` is used.
#[must_use]
pub fn generate_javascript_fetch(request: &RequestSpec) -> String {
    let auth = resolve_auth(&request.auth);
    let url = final_url(request, &auth);
    let headers = merged_headers(request, &auth);

    let mut lines = vec![
        format!("const response = await fetch('{}', {{", single_quoted(&url)),
        format!("  method: '{}',", request.method.as_str()),
    ];
    push_headers(&mut lines, &headers);
    if let Some(body) = body_text(request) {
        lines.push(format!("  body: {},", body_expression(request, body, true)));
    }
    lines.push("});".to_string());
    lines.push(String::new());

    let accepts_json = headers.iter().any(|(key, value)| {
        key.eq_ignore_ascii_case("accept") && value.to_ascii_lowercase().contains("json")
    });
    let reader = if request.body.content_type == ContentType::Json
        || accepts_json
        || request.method == HttpMethod::Get
    {
        "json"
    } else {
        "text"
    };
    lines.push(format!("const data = await response.{reader}();"));

    lines.join("\n")
}

/// Renders an `axios` call for Node.js.
#[must_use]
pub fn generate_node_axios(request: &RequestSpec) -> String {
    let auth = resolve_auth(&request.auth);
    let url = final_url(request, &auth);
    let headers = merged_headers(request, &auth);

    let mut lines = vec![
        "const axios = require('axios');".to_string(),
        String::new(),
        "const response = await axios({".to_string(),
        format!("  method: '{}',", request.method.as_str()),
        format!("  url: '{}',", single_quoted(&url)),
    ];
    push_headers(&mut lines, &headers);
    if let Some(body) = body_text(request) {
        lines.push(format!("  data: {},", body_expression(request, body, false)));
    }
    lines.push("});".to_string());
    lines.push(String::new());
    lines.push("console.log(response.data);".to_string());

    lines.join("\n")
}

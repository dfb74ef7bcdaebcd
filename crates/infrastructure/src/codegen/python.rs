//! Python `requests` snippet.

use querybox_domain::{AuthConfig, ContentType, RequestSpec, resolve_auth};

use super::{body_text, final_url, merged_headers, user_headers};

fn single_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Renders a `requests.<method>(...)` call.
///
/// Basic credentials go in the `auth=` tuple instead of an
/// `Authorization` header. JSON bodies use `json=`, others `data=`.
#[must_use]
pub fn generate_python_requests(request: &RequestSpec) -> String {
    let auth = resolve_auth(&request.auth);
    let url = final_url(request, &auth);
    let headers: Vec<(&str, &str)> = match &request.auth {
        AuthConfig::Basic { .. } => user_headers(request).collect(),
        _ => merged_headers(request, &auth),
    };

    let mut lines = vec!["import requests".to_string(), String::new()];
    if !headers.is_empty() {
        lines.push("headers = {".to_string());
        for (key, value) in &headers {
            lines.push(format!(
                "    '{}': '{}',",
                single_quoted(key),
                single_quoted(value)
            ));
        }
        lines.push("}".to_string());
        lines.push(String::new());
    }

    let mut kwargs = vec![format!("url='{}'", single_quoted(&url))];
    if !headers.is_empty() {
        kwargs.push("headers=headers".to_string());
    }
    if let AuthConfig::Basic { basic } = &request.auth {
        kwargs.push(format!(
            "auth=('{}', '{}')",
            single_quoted(&basic.username),
            single_quoted(&basic.password)
        ));
    }
    if let Some(body) = body_text(request) {
        if request.body.content_type == ContentType::Json {
            kwargs.push(format!("json={body}"));
        } else {
            kwargs.push(format!("data='{}'", single_quoted(body)));
        }
    }

    lines.push(format!(
        "response = requests.{}({})",
        request.method.as_str().to_ascii_lowercase(),
        kwargs.join(", ")
    ));
    lines.push(String::new());
    lines.push("print(response.status_code)".to_string());
    lines.push("print(response.json())".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use querybox_domain::{ApiKeyLocation, HttpMethod, KeyValueEdit, RequestBody};

    #[test]
    fn test_get_without_headers() {
        let request = RequestSpec::new(HttpMethod::Get, "https://a.com/users?page=2");
        let expected = [
            "import requests",
            "",
            "response = requests.get(url='https://a.com/users?page=2')",
            "",
            "print(response.status_code)",
            "print(response.json())",
        ]
        .join("\n");
        assert_eq!(generate_python_requests(&request), expected);
    }

    #[test]
    fn test_basic_auth_uses_tuple_not_header() {
        let mut request = RequestSpec::new(HttpMethod::Post, "https://a.com/login");
        request.auth = AuthConfig::basic("user", "pa'ss");
        let id = request.headers.add();
        request.headers.update(&id, KeyValueEdit::Key("X-Trace".into()));
        request.headers.update(&id, KeyValueEdit::Value("1".into()));
        request.body = RequestBody::raw(ContentType::Json, r#"{"remember": true}"#);

        let expected = [
            "import requests",
            "",
            "headers = {",
            "    'X-Trace': '1',",
            "}",
            "",
            r#"response = requests.post(url='https://a.com/login', headers=headers, auth=('user', 'pa\'ss'), json={"remember": true})"#,
            "",
            "print(response.status_code)",
            "print(response.json())",
        ]
        .join("\n");
        assert_eq!(generate_python_requests(&request), expected);
    }

    #[test]
    fn test_api_key_header_and_text_body() {
        let mut request = RequestSpec::new(HttpMethod::Put, "https://a.com/doc");
        request.auth = AuthConfig::api_key("X-Key", "k", ApiKeyLocation::Header);
        request.body = RequestBody::raw(ContentType::Text, "hello");

        let snippet = generate_python_requests(&request);
        assert!(snippet.contains("    'X-Key': 'k',"), "{snippet}");
        assert!(
            snippet.contains(
                "response = requests.put(url='https://a.com/doc', headers=headers, data='hello')"
            ),
            "{snippet}"
        );
    }
}

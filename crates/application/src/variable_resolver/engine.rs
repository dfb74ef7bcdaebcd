//! Substitution of `{{var}}` references.

use querybox_domain::{AuthConfig, KeyValueList, RequestSpec, VariableMap};

use super::parser::parse_variables;

/// Replaces every reference whose trimmed name is in `variables`.
///
/// Unknown names are left verbatim, braces included. Substituted values
/// are not scanned again.
#[must_use]
pub fn interpolate(input: &str, variables: &VariableMap) -> String {
    if !input.contains("{{") {
        return input.to_string();
    }

    let mut output = String::with_capacity(input.len());
    let mut last = 0;
    for reference in parse_variables(input) {
        if let Some(value) = variables.get(&reference.name) {
            output.push_str(&input[last..reference.span.start]);
            output.push_str(value);
            last = reference.span.end;
        }
    }
    output.push_str(&input[last..]);
    output
}

fn interpolate_rows(rows: &KeyValueList, variables: &VariableMap) -> KeyValueList {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            row.key = interpolate(&row.key, variables);
            row.value = interpolate(&row.value, variables);
            row
        })
        .collect()
}

fn interpolate_auth(auth: &AuthConfig, variables: &VariableMap) -> AuthConfig {
    let mut resolved = auth.clone();
    match &mut resolved {
        AuthConfig::None => {}
        AuthConfig::Basic { basic } => {
            basic.username = interpolate(&basic.username, variables);
            basic.password = interpolate(&basic.password, variables);
        }
        // The prefix is a scheme keyword, not user data.
        AuthConfig::Bearer { bearer } => {
            bearer.token = interpolate(&bearer.token, variables);
        }
        AuthConfig::ApiKey { apikey } => {
            apikey.key = interpolate(&apikey.key, variables);
            apikey.value = interpolate(&apikey.value, variables);
        }
    }
    resolved
}

/// Returns an interpolated copy of the request. The input is untouched.
///
/// Method, body mode and body content type pass through unchanged.
#[must_use]
pub fn interpolate_request(request: &RequestSpec, variables: &VariableMap) -> RequestSpec {
    let mut resolved = request.clone();
    resolved.url = interpolate(&request.url, variables);
    resolved.params = interpolate_rows(&request.params, variables);
    resolved.headers = interpolate_rows(&request.headers, variables);
    resolved.body.raw = interpolate(&request.body.raw, variables);
    resolved.auth = interpolate_auth(&request.auth, variables);
    resolved
}

//! Variable parser for {{variable}} syntax
//!
//! Parses strings to extract variable references with their positions.
//! A reference is `{{`, one or more characters other than `}`, then `}}`.
//! The name is trimmed; `{{}}` is not a reference.

use std::ops::Range;

/// Represents a parsed variable reference in a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The variable name, trimmed. May be empty for `{{  }}`.
    pub name: String,

    /// Byte range in the original string covering the braces.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Parses a string and extracts all variable references in order.
///
/// # Examples
///
/// ```
/// use querybox_application::variable_resolver::parser::parse_variables;
///
/// let refs = parse_variables("{{host}}/users/{{ id }}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[1].name, "id");
/// assert_eq!(refs[1].span, 15..23);
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let bytes = input.as_bytes();
    let mut references = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = input[cursor..].find("{{") {
        let open = cursor + offset;
        let name_start = open + 2;
        let name_end = bytes[name_start..]
            .iter()
            .position(|&b| b == b'}')
            .map_or(bytes.len(), |len| name_start + len);

        if name_end > name_start && bytes[name_end..].starts_with(b"}}") {
            let span = open..name_end + 2;
            references.push(VariableReference::new(input[name_start..name_end].trim(), span));
            cursor = name_end + 2;
        } else {
            // `{` is ASCII, so the next byte is a char boundary
            cursor = open + 1;
        }
    }

    references
}

/// Returns true if the input contains at least one well-formed reference.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    input.contains("{{") && !parse_variables(input).is_empty()
}

/// Distinct non-empty variable names in order of first appearance.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    if !input.contains("{{") {
        return Vec::new();
    }
    let mut names: Vec<String> = Vec::new();
    for reference in parse_variables(input) {
        if !reference.name.is_empty() && !names.contains(&reference.name) {
            names.push(reference.name);
        }
    }
    names
}

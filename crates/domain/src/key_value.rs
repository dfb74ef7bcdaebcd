//! Editable key/value rows shared by query params, headers and environment variables.

use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// A plain name/value pair with no editor identity.
///
/// Used for response headers and resolved auth material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Header or parameter name.
    pub key: String,
    /// Header or parameter value.
    pub value: String,
}

impl KeyValue {
    /// Creates a new pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single editable row in a params, headers or variables table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    /// Stable row identifier.
    pub id: String,
    /// Row key. Rows with an empty key are never effective.
    pub key: String,
    /// Row value.
    pub value: String,
    /// Optional free-form note shown in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled rows are kept but ignored when building the request.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl KeyValuePair {
    /// Creates an enabled row with a fresh id.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            key: key.into(),
            value: value.into(),
            description: None,
            enabled: true,
        }
    }

    /// Creates a blank enabled row, as produced by the "add row" button.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Returns true if the row contributes to the outgoing request.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.enabled && !self.key.is_empty()
    }

    /// Applies a single field edit.
    pub fn apply(&mut self, edit: KeyValueEdit) {
        match edit {
            KeyValueEdit::Key(key) => self.key = key,
            KeyValueEdit::Value(value) => self.value = value,
            KeyValueEdit::Description(description) => self.description = description,
            KeyValueEdit::Enabled(enabled) => self.enabled = enabled,
        }
    }
}

/// A field update for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValueEdit {
    /// Replace the key.
    Key(String),
    /// Replace the value.
    Value(String),
    /// Replace or clear the description.
    Description(Option<String>),
    /// Set the enabled flag.
    Enabled(bool),
}

/// An ordered list of editable rows.
///
/// Order is insertion order and is preserved by every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyValueList(Vec<KeyValuePair>);

impl KeyValueList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a blank enabled row and returns its id.
    pub fn add(&mut self) -> String {
        self.push(KeyValuePair::empty())
    }

    /// Appends a row and returns its id.
    pub fn push(&mut self, pair: KeyValuePair) -> String {
        let id = pair.id.clone();
        self.0.push(pair);
        id
    }

    /// Edits the row with the given id. Returns false if no row matched.
    pub fn update(&mut self, id: &str, edit: KeyValueEdit) -> bool {
        self.0
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.apply(edit))
            .is_some()
    }

    /// Removes the row with the given id. Returns false if no row matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p.id != id);
        self.0.len() != before
    }

    /// Flips the enabled flag of the row with the given id.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.0
            .iter_mut()
            .find(|p| p.id == id)
            .map(|p| p.enabled = !p.enabled)
            .is_some()
    }

    /// Looks up a row by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&KeyValuePair> {
        self.0.iter().find(|p| p.id == id)
    }

    /// Rows that are enabled and have a non-empty key, in order.
    pub fn effective(&self) -> impl Iterator<Item = &KeyValuePair> {
        self.0.iter().filter(|p| p.is_effective())
    }

    /// Iterates over every row.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyValuePair> {
        self.0.iter()
    }

    /// Mutable iteration over every row.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, KeyValuePair> {
        self.0.iter_mut()
    }

    /// Number of rows, including disabled ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the list with a new id on every row.
    #[must_use]
    pub fn with_fresh_ids(&self) -> Self {
        self.0
            .iter()
            .map(|p| KeyValuePair {
                id: generate_id(),
                ..p.clone()
            })
            .collect()
    }
}

impl FromIterator<KeyValuePair> for KeyValueList {
    fn from_iter<I: IntoIterator<Item = KeyValuePair>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<KeyValuePair>> for KeyValueList {
    fn from(pairs: Vec<KeyValuePair>) -> Self {
        Self(pairs)
    }
}

impl<'a> IntoIterator for &'a KeyValueList {
    type Item = &'a KeyValuePair;
    type IntoIter = std::slice::Iter<'a, KeyValuePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

//! Named sets of `{{var}}` substitutions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::id::generate_id;
use crate::key_value::{KeyValueEdit, KeyValueList, KeyValuePair};

/// A variable row. Same shape as a params or headers row.
pub type EnvironmentVariable = KeyValuePair;

/// Variable name to value, built from the enabled rows of an environment.
pub type VariableMap = HashMap<String, String>;

/// A named collection of variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Variable rows in insertion order
    #[serde(default)]
    pub variables: KeyValueList,
    /// Creation time, epoch milliseconds
    pub created_at: i64,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            variables: KeyValueList::new(),
            created_at,
        }
    }

    /// Appends a blank variable and returns its id.
    pub fn add_variable(&mut self) -> String {
        self.variables.add()
    }

    /// Edits one variable. Returns false if the id is unknown.
    pub fn update_variable(&mut self, id: &str, edit: KeyValueEdit) -> bool {
        self.variables.update(id, edit)
    }

    /// Removes one variable. Returns false if the id is unknown.
    pub fn remove_variable(&mut self, id: &str) -> bool {
        self.variables.remove(id)
    }

    /// Flips one variable's enabled flag. Returns false if the id is unknown.
    pub fn toggle_variable(&mut self, id: &str) -> bool {
        self.variables.toggle(id)
    }

    /// Enabled, non-empty-key variables as a lookup map.
    ///
    /// When a key appears more than once the later row wins.
    #[must_use]
    pub fn variable_map(&self) -> VariableMap {
        self.variables
            .effective()
            .map(|v| (v.key.clone(), v.value.clone()))
            .collect()
    }

    /// Copy with a new id on the environment and every variable.
    #[must_use]
    pub fn with_fresh_ids(&self) -> Self {
        Self {
            id: generate_id(),
            variables: self.variables.with_fresh_ids(),
            ..self.clone()
        }
    }
}

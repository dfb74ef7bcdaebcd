//! Environments and the active-environment pointer.

use querybox_domain::{
    Environment, ImportStrategy, ImportSummary, KeyValueEdit, VariableMap, plan_import,
};
use tracing::debug;

/// Named environments plus the optional active one.
///
/// The active id is either `None` or the id of an environment in the list.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    environments: Vec<Environment>,
    active_environment_id: Option<String>,
}

impl VariableStore {
    /// Creates an empty store with no active environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted data, dropping a dangling active id.
    #[must_use]
    pub fn restore(environments: Vec<Environment>, active_environment_id: Option<String>) -> Self {
        let active_environment_id =
            active_environment_id.filter(|id| environments.iter().any(|e| &e.id == id));
        Self {
            environments,
            active_environment_id,
        }
    }

    /// All environments in creation order.
    #[must_use]
    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Id of the active environment, if any.
    #[must_use]
    pub fn active_environment_id(&self) -> Option<&str> {
        self.active_environment_id.as_deref()
    }

    /// The active environment, if any.
    #[must_use]
    pub fn active_environment(&self) -> Option<&Environment> {
        self.active_environment_id
            .as_deref()
            .and_then(|id| self.environment(id))
    }

    /// Looks up an environment by id.
    #[must_use]
    pub fn environment(&self, id: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.id == id)
    }

    /// Looks up an environment by name, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Environment> {
        self.environments
            .iter()
            .find(|e| e.name.to_lowercase() == name.to_lowercase())
    }

    fn environment_mut(&mut self, id: &str) -> Option<&mut Environment> {
        self.environments.iter_mut().find(|e| e.id == id)
    }

    /// Adds an empty environment and returns a copy of it.
    pub fn create_environment(&mut self, name: impl Into<String>, created_at: i64) -> Environment {
        let environment = Environment::new(name, created_at);
        debug!(environment_id = %environment.id, "environment created");
        self.environments.push(environment.clone());
        environment
    }

    /// Renames an environment. Returns false if the id is unknown.
    pub fn rename_environment(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.environment_mut(id).map(|e| e.name = name.into()).is_some()
    }

    /// Deletes an environment, clearing the active pointer if it named it.
    pub fn delete_environment(&mut self, id: &str) -> bool {
        let before = self.environments.len();
        self.environments.retain(|e| e.id != id);
        if self.environments.len() == before {
            return false;
        }
        if self.active_environment_id.as_deref() == Some(id) {
            self.active_environment_id = None;
        }
        true
    }

    /// Appends a copy named `"{name} (Copy)"` with fresh ids throughout.
    pub fn duplicate_environment(&mut self, id: &str, created_at: i64) -> Option<Environment> {
        let source = self.environment(id)?;
        let copy = Environment {
            name: format!("{} (Copy)", source.name),
            created_at,
            ..source.with_fresh_ids()
        };
        self.environments.push(copy.clone());
        Some(copy)
    }

    /// Sets or clears the active environment.
    ///
    /// Returns false and changes nothing if the id is unknown.
    pub fn set_active_environment(&mut self, id: Option<&str>) -> bool {
        match id {
            None => self.active_environment_id = None,
            Some(id) if self.environment(id).is_some() => {
                self.active_environment_id = Some(id.to_string());
            }
            Some(_) => return false,
        }
        true
    }

    /// Appends a blank variable to one environment and returns its id.
    pub fn add_variable(&mut self, env_id: &str) -> Option<String> {
        self.environment_mut(env_id).map(Environment::add_variable)
    }

    /// Edits one variable of one environment.
    pub fn update_variable(&mut self, env_id: &str, var_id: &str, edit: KeyValueEdit) -> bool {
        self.environment_mut(env_id)
            .is_some_and(|e| e.update_variable(var_id, edit))
    }

    /// Removes one variable of one environment.
    pub fn remove_variable(&mut self, env_id: &str, var_id: &str) -> bool {
        self.environment_mut(env_id)
            .is_some_and(|e| e.remove_variable(var_id))
    }

    /// Flips one variable of one environment.
    pub fn toggle_variable(&mut self, env_id: &str, var_id: &str) -> bool {
        self.environment_mut(env_id)
            .is_some_and(|e| e.toggle_variable(var_id))
    }

    /// Fresh name-to-value map of the active environment's effective variables.
    ///
    /// Empty when no environment is active.
    #[must_use]
    pub fn active_variables_map(&self) -> VariableMap {
        self.active_environment()
            .map(Environment::variable_map)
            .unwrap_or_default()
    }

    /// Imports environments. Replace drops the active pointer if it no longer resolves.
    pub fn import(&mut self, incoming: &[Environment], strategy: ImportStrategy) -> ImportSummary {
        let (environments, summary) = plan_import(&self.environments, incoming, strategy);
        self.environments = environments;
        if let Some(id) = self.active_environment_id.take() {
            self.active_environment_id = self.environment(&id).map(|e| e.id.clone());
        }
        debug!(added = summary.added, skipped = summary.skipped, ?strategy, "environments imported");
        summary
    }
}

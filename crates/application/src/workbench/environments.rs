//! Environment operations on the workbench.

use querybox_domain::{
    Environment, ExportEnvelope, ExportKind, ImportStrategy, ImportSummary, KeyValueEdit,
    VariableMap,
};

use super::{Session, Workbench};
use crate::ports::StateStore;
use crate::state::VariableStore;

impl<S: StateStore> Workbench<S> {
    fn persist_environments(&self, session: &Session) {
        self.persistence.save_environments(
            session.variables.environments(),
            session.variables.active_environment_id(),
        );
    }

    fn with_variables<R>(&self, edit: impl FnOnce(&mut VariableStore) -> R) -> R {
        let mut session = self.session.lock();
        let result = edit(&mut session.variables);
        self.persist_environments(&session);
        result
    }

    /// Snapshot of every environment.
    pub fn environments(&self) -> Vec<Environment> {
        self.session.lock().variables.environments().to_vec()
    }

    /// Snapshot of one environment.
    pub fn environment(&self, id: &str) -> Option<Environment> {
        self.session.lock().variables.environment(id).cloned()
    }

    /// Finds an environment by name, ignoring case.
    pub fn find_environment(&self, name: &str) -> Option<Environment> {
        self.session.lock().variables.find_by_name(name).cloned()
    }

    /// Id of the active environment.
    pub fn active_environment_id(&self) -> Option<String> {
        self.session
            .lock()
            .variables
            .active_environment_id()
            .map(str::to_owned)
    }

    /// Fresh snapshot of the active environment's variables.
    pub fn active_variables(&self) -> VariableMap {
        self.session.lock().variables.active_variables_map()
    }

    /// Creates an empty environment.
    pub fn create_environment(&self, name: impl Into<String>) -> Environment {
        let now = self.clock.now_millis();
        self.with_variables(|vars| vars.create_environment(name, now))
    }

    /// Renames an environment.
    pub fn rename_environment(&self, id: &str, name: impl Into<String>) -> bool {
        self.with_variables(|vars| vars.rename_environment(id, name))
    }

    /// Deletes an environment, deactivating it first if needed.
    pub fn delete_environment(&self, id: &str) -> bool {
        self.with_variables(|vars| vars.delete_environment(id))
    }

    /// Duplicates an environment as `"{name} (Copy)"`.
    pub fn duplicate_environment(&self, id: &str) -> Option<Environment> {
        let now = self.clock.now_millis();
        self.with_variables(|vars| vars.duplicate_environment(id, now))
    }

    /// Activates an environment, or deactivates with `None`.
    pub fn set_active_environment(&self, id: Option<&str>) -> bool {
        self.with_variables(|vars| vars.set_active_environment(id))
    }

    /// Appends a blank variable.
    pub fn add_variable(&self, env_id: &str) -> Option<String> {
        self.with_variables(|vars| vars.add_variable(env_id))
    }

    /// Adds a filled variable, or updates the value of an existing one with the same key.
    pub fn set_variable(
        &self,
        env_id: &str,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Option<String> {
        let (key, value) = (key.into(), value.into());
        self.with_variables(|vars| {
            let existing = vars
                .environment(env_id)?
                .variables
                .iter()
                .find(|v| v.key == key)
                .map(|v| v.id.clone());
            let id = match existing {
                Some(id) => id,
                None => {
                    let id = vars.add_variable(env_id)?;
                    vars.update_variable(env_id, &id, KeyValueEdit::Key(key));
                    id
                }
            };
            vars.update_variable(env_id, &id, KeyValueEdit::Value(value));
            Some(id)
        })
    }

    /// Edits one variable.
    pub fn update_variable(&self, env_id: &str, var_id: &str, edit: KeyValueEdit) -> bool {
        self.with_variables(|vars| vars.update_variable(env_id, var_id, edit))
    }

    /// Removes one variable.
    pub fn remove_variable(&self, env_id: &str, var_id: &str) -> bool {
        self.with_variables(|vars| vars.remove_variable(env_id, var_id))
    }

    /// Toggles one variable.
    pub fn toggle_variable(&self, env_id: &str, var_id: &str) -> bool {
        self.with_variables(|vars| vars.toggle_variable(env_id, var_id))
    }

    /// Wraps every environment in an export envelope.
    pub fn export_environments(&self) -> ExportEnvelope<Environment> {
        ExportEnvelope::new(
            ExportKind::Environments,
            self.environments(),
            self.clock.now_millis(),
        )
    }

    /// Imports environments with fresh ids.
    pub fn import_environments(
        &self,
        incoming: &[Environment],
        strategy: ImportStrategy,
    ) -> ImportSummary {
        self.with_variables(|vars| vars.import(incoming, strategy))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::workbench;
    use crate::persistence::{ACTIVE_ENVIRONMENT_KEY, ENVIRONMENTS_KEY};
    use pretty_assertions::assert_eq;
    use querybox_domain::{EXPORT_FORMAT, ImportStrategy};
    use serde_json::json;

    #[test]
    fn test_deleting_active_environment_is_persisted() {
        let wb = workbench();
        let env = wb.create_environment("Dev");
        wb.set_variable(&env.id, "host", "a.com").unwrap();
        assert!(wb.set_active_environment(Some(&env.id)));
        assert_eq!(wb.store().value(ACTIVE_ENVIRONMENT_KEY), Some(json!(env.id)));
        assert_eq!(wb.active_variables()["host"], "a.com");

        assert!(wb.delete_environment(&env.id));
        assert_eq!(wb.active_environment_id(), None);
        assert!(wb.active_variables().is_empty());
        assert_eq!(wb.store().value(ACTIVE_ENVIRONMENT_KEY), None);
        assert_eq!(wb.store().value(ENVIRONMENTS_KEY), Some(json!([])));
    }

    #[test]
    fn test_set_variable_updates_existing_key() {
        let wb = workbench();
        let env = wb.create_environment("Dev");
        let first = wb.set_variable(&env.id, "token", "a").unwrap();
        let second = wb.set_variable(&env.id, "token", "b").unwrap();
        assert_eq!(first, second);
        let stored = wb.environment(&env.id).unwrap();
        assert_eq!(stored.variables.len(), 1);
        assert_eq!(stored.variable_map()["token"], "b");
        assert!(wb.set_variable("missing", "k", "v").is_none());
    }

    #[test]
    fn test_export_then_merge_import_skips_conflicts() {
        let wb = workbench();
        wb.create_environment("Dev");
        let envelope = wb.export_environments();
        assert_eq!(envelope.format, EXPORT_FORMAT);
        assert_eq!(envelope.exported_at, 1_700_000_000_000);

        let summary = wb.import_environments(&envelope.data, ImportStrategy::Merge);
        assert_eq!((summary.added, summary.skipped), (0, 1));

        let summary = wb.import_environments(&envelope.data, ImportStrategy::Replace);
        assert_eq!((summary.added, summary.skipped), (1, 0));
        assert_ne!(wb.environments()[0].id, envelope.data[0].id);
    }

    #[test]
    fn test_duplicate_environment_uses_clock() {
        let wb = workbench();
        let env = wb.create_environment("Dev");
        let copy = wb.duplicate_environment(&env.id).unwrap();
        assert_eq!(copy.name, "Dev (Copy)");
        assert_eq!(wb.find_environment("dev (copy)").unwrap().id, copy.id);
    }
}

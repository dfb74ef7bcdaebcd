//! Loading and saving workbench state through a [`StateStore`].
//!
//! Persistence is best effort: every failure is logged and swallowed so a
//! broken store never blocks editing or sending.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use querybox_domain::{Collection, Environment, HistoryEntry, RequestSpec, Tab};

use crate::ports::{StateStore, StoreError};

/// Storage key for the tab list.
pub const TABS_KEY: &str = "qb:tabs";
/// Storage key for the active tab id.
pub const ACTIVE_TAB_KEY: &str = "qb:active-tab";
/// Storage key for the environment list.
pub const ENVIRONMENTS_KEY: &str = "qb:environments";
/// Storage key for the active environment id.
pub const ACTIVE_ENVIRONMENT_KEY: &str = "qb:active-environment";
/// Storage key for the history log.
pub const HISTORY_KEY: &str = "qb:history";
/// Storage key for the collections.
pub const COLLECTIONS_KEY: &str = "qb:collections";
/// Single-request key written by older versions.
pub const LEGACY_WORKBENCH_KEY: &str = "qb:workbench";

/// Persisted tab list plus the active tab id.
#[derive(Debug, Clone, Default)]
pub struct LoadedTabs {
    /// Tabs in display order
    pub tabs: Vec<Tab>,
    /// Active tab id as stored, possibly dangling
    pub active_tab_id: Option<String>,
}

/// Persisted environments plus the active environment id.
#[derive(Debug, Clone, Default)]
pub struct LoadedEnvironments {
    /// Environments in creation order
    pub environments: Vec<Environment>,
    /// Active environment id as stored, possibly dangling
    pub active_environment_id: Option<String>,
}

/// Typed access to the workbench's storage keys.
pub struct PersistenceBridge<S> {
    store: S,
}

impl<S: StateStore> PersistenceBridge<S> {
    /// Wraps a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads tabs, migrating the legacy single-request key when no tab list exists.
    pub fn load_tabs(&self) -> LoadedTabs {
        let tabs: Vec<Tab> = self.read_list(TABS_KEY);
        if !tabs.is_empty() {
            return LoadedTabs {
                tabs,
                active_tab_id: self.read_string(ACTIVE_TAB_KEY),
            };
        }

        match self.migrate_legacy() {
            Some(tab) => LoadedTabs {
                active_tab_id: Some(tab.id.clone()),
                tabs: vec![tab],
            },
            None => LoadedTabs::default(),
        }
    }

    fn migrate_legacy(&self) -> Option<Tab> {
        let value = self.read_value(LEGACY_WORKBENCH_KEY)?;
        let request = match serde_json::from_value::<RequestSpec>(value) {
            Ok(request) => request,
            Err(e) => {
                warn!(key = LEGACY_WORKBENCH_KEY, error = %e, "dropping unreadable legacy request");
                self.remove(LEGACY_WORKBENCH_KEY);
                return None;
            }
        };

        let tab = Tab::with_request(request);
        self.save_tabs(std::slice::from_ref(&tab), &tab.id);
        self.remove(LEGACY_WORKBENCH_KEY);
        debug!(tab_id = %tab.id, "migrated legacy request into a tab");
        Some(tab)
    }

    /// Loads environments and the stored active id.
    pub fn load_environments(&self) -> LoadedEnvironments {
        LoadedEnvironments {
            environments: self.read_list(ENVIRONMENTS_KEY),
            active_environment_id: self.read_string(ACTIVE_ENVIRONMENT_KEY),
        }
    }

    /// Loads the history log, newest first.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        self.read_list(HISTORY_KEY)
    }

    /// Loads collections.
    pub fn load_collections(&self) -> Vec<Collection> {
        self.read_list(COLLECTIONS_KEY)
    }

    /// Saves the tab list and the active tab id.
    pub fn save_tabs(&self, tabs: &[Tab], active_tab_id: &str) {
        self.write(TABS_KEY, tabs);
        self.write(ACTIVE_TAB_KEY, active_tab_id);
    }

    /// Saves environments. A `None` active id removes the key.
    pub fn save_environments(&self, environments: &[Environment], active_id: Option<&str>) {
        self.write(ENVIRONMENTS_KEY, environments);
        match active_id {
            Some(id) => self.write(ACTIVE_ENVIRONMENT_KEY, id),
            None => self.remove(ACTIVE_ENVIRONMENT_KEY),
        }
    }

    /// Saves the history log.
    pub fn save_history(&self, entries: &[HistoryEntry]) {
        self.write(HISTORY_KEY, entries);
    }

    /// Saves collections.
    pub fn save_collections(&self, collections: &[Collection]) {
        self.write(COLLECTIONS_KEY, collections);
    }

    fn read_value(&self, key: &str) -> Option<Value> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e @ StoreError::Corrupt { .. }) => {
                warn!(key, error = %e, "removing corrupt stored value");
                self.remove(key);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn read_string(&self, key: &str) -> Option<String> {
        match self.read_value(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Reads a list, dropping records that no longer decode.
    ///
    /// A value that is not an array is removed. If any record was dropped
    /// the cleaned list is written back.
    fn read_list<T: Serialize + DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(value) = self.read_value(key) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            warn!(key, "stored value is not a list, removing it");
            self.remove(key);
            return Vec::new();
        };

        let total = items.len();
        let records: Vec<T> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(key, error = %e, "dropping invalid stored record");
                    None
                }
            })
            .collect();

        if records.len() != total {
            self.write(key, &records);
        }
        records
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize state");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &value) {
            warn!(key, error = %e, "failed to persist state");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "failed to remove stored value");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use pretty_assertions::assert_eq;
    use querybox_domain::HttpMethod;
    use serde_json::json;

    #[test]
    fn test_empty_store_loads_nothing() {
        let bridge = PersistenceBridge::new(MemoryStore::default());
        assert!(bridge.load_tabs().tabs.is_empty());
        assert!(bridge.load_environments().environments.is_empty());
        assert!(bridge.load_history().is_empty());
        assert!(bridge.load_collections().is_empty());
    }

    #[test]
    fn test_tabs_round_trip_without_response_state() {
        let bridge = PersistenceBridge::new(MemoryStore::default());
        let mut tab = Tab::with_request(RequestSpec::new(HttpMethod::Post, "https://a.com"));
        tab.state = querybox_domain::RequestState::loading();
        bridge.save_tabs(std::slice::from_ref(&tab), &tab.id);

        let loaded = bridge.load_tabs();
        assert_eq!(loaded.active_tab_id.as_deref(), Some(tab.id.as_str()));
        assert_eq!(loaded.tabs[0].request, tab.request);
        assert_eq!(loaded.tabs[0].state, querybox_domain::RequestState::Idle);
    }

    #[test]
    fn test_legacy_request_is_migrated_once() {
        let store = MemoryStore::with(&[(
            LEGACY_WORKBENCH_KEY,
            json!({ "method": "PUT", "url": "https://legacy.dev/items" }),
        )]);
        let bridge = PersistenceBridge::new(store);

        let loaded = bridge.load_tabs();
        assert_eq!(loaded.tabs.len(), 1);
        assert_eq!(loaded.tabs[0].request.method, HttpMethod::Put);
        assert_eq!(loaded.tabs[0].request.url, "https://legacy.dev/items");
        assert_eq!(loaded.active_tab_id.as_deref(), Some(loaded.tabs[0].id.as_str()));

        let store = bridge.store();
        assert_eq!(store.value(LEGACY_WORKBENCH_KEY), None);
        assert_eq!(store.value(TABS_KEY).unwrap().as_array().unwrap().len(), 1);
        assert_eq!(store.value(ACTIVE_TAB_KEY), Some(json!(loaded.tabs[0].id)));
    }

    #[test]
    fn test_legacy_key_ignored_when_tabs_exist() {
        let tab = Tab::new();
        let store = MemoryStore::with(&[
            (TABS_KEY, serde_json::to_value(vec![&tab]).unwrap()),
            (LEGACY_WORKBENCH_KEY, json!({ "url": "https://legacy.dev" })),
        ]);
        let bridge = PersistenceBridge::new(store);
        let loaded = bridge.load_tabs();
        assert_eq!(loaded.tabs[0].id, tab.id);
        assert!(bridge.store().value(LEGACY_WORKBENCH_KEY).is_some());
    }

    #[test]
    fn test_non_array_list_is_removed() {
        let store = MemoryStore::with(&[(HISTORY_KEY, json!({ "oops": true }))]);
        let bridge = PersistenceBridge::new(store);
        assert!(bridge.load_history().is_empty());
        assert_eq!(bridge.store().value(HISTORY_KEY), None);
    }

    #[test]
    fn test_invalid_records_are_dropped_and_written_back() {
        let good = Environment::new("Dev", 1);
        let store = MemoryStore::with(&[(
            ENVIRONMENTS_KEY,
            json!([serde_json::to_value(&good).unwrap(), { "name": 42 }]),
        )]);
        let bridge = PersistenceBridge::new(store);

        let loaded = bridge.load_environments();
        assert_eq!(loaded.environments, vec![good]);
        assert_eq!(
            bridge.store().value(ENVIRONMENTS_KEY).unwrap().as_array().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_corrupt_value_is_removed() {
        let store = MemoryStore::with(&[(COLLECTIONS_KEY, json!([]))]);
        store.mark_corrupt(COLLECTIONS_KEY);
        let bridge = PersistenceBridge::new(store);
        assert!(bridge.load_collections().is_empty());
        assert_eq!(bridge.store().value(COLLECTIONS_KEY), None);
    }

    #[test]
    fn test_clearing_active_environment_removes_key() {
        let bridge = PersistenceBridge::new(MemoryStore::default());
        let env = Environment::new("Dev", 1);
        bridge.save_environments(std::slice::from_ref(&env), Some(&env.id));
        assert_eq!(bridge.load_environments().active_environment_id, Some(env.id.clone()));

        bridge.save_environments(std::slice::from_ref(&env), None);
        assert_eq!(bridge.store().value(ACTIVE_ENVIRONMENT_KEY), None);
        assert_eq!(bridge.load_environments().active_environment_id, None);
    }
}

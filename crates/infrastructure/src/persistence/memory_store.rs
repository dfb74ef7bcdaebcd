//! In-memory state store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use querybox_application::ports::{StateStore, StoreError};
use serde_json::Value;

/// [`StateStore`] that keeps values in memory. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl StateStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clones_share_values() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.set("k", &json!(1)).unwrap();
        assert_eq!(clone.get("k").unwrap(), Some(json!(1)));
        clone.remove("k").unwrap();
        assert!(store.is_empty());
    }
}

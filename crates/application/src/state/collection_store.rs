//! Collections of saved requests.

use querybox_domain::{
    Collection, ImportStrategy, ImportSummary, RequestSpec, SavedRequest, plan_import,
};
use tracing::debug;

/// All collections in creation order.
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    collections: Vec<Collection>,
}

impl CollectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted collections.
    #[must_use]
    pub const fn restore(collections: Vec<Collection>) -> Self {
        Self { collections }
    }

    /// All collections.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Looks up a collection by id.
    #[must_use]
    pub fn collection(&self, id: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.id == id)
    }

    fn collection_mut(&mut self, id: &str) -> Option<&mut Collection> {
        self.collections.iter_mut().find(|c| c.id == id)
    }

    /// Looks up a saved request.
    #[must_use]
    pub fn saved_request(&self, collection_id: &str, request_id: &str) -> Option<&SavedRequest> {
        self.collection(collection_id)?
            .requests
            .iter()
            .find(|r| r.id == request_id)
    }

    /// Adds an empty collection and returns a copy of it.
    pub fn create(&mut self, name: impl Into<String>, created_at: i64) -> Collection {
        let collection = Collection::new(name, created_at);
        self.collections.push(collection.clone());
        collection
    }

    /// Deletes a collection. Returns false if the id is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.collections.len();
        self.collections.retain(|c| c.id != id);
        self.collections.len() != before
    }

    /// Renames a collection. Returns false if the id is unknown.
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.collection_mut(id).map(|c| c.name = name.into()).is_some()
    }

    /// Saves a snapshot of `request` into a collection.
    pub fn save_request(
        &mut self,
        collection_id: &str,
        name: impl Into<String>,
        request: RequestSpec,
        saved_at: i64,
    ) -> Option<SavedRequest> {
        let collection = self.collection_mut(collection_id)?;
        let saved = SavedRequest::new(name, request, saved_at);
        collection.requests.push(saved.clone());
        debug!(collection_id, request_id = %saved.id, "request saved");
        Some(saved)
    }

    /// Removes a saved request. Returns false if either id is unknown.
    pub fn remove_request(&mut self, collection_id: &str, request_id: &str) -> bool {
        self.collection_mut(collection_id).is_some_and(|c| {
            let before = c.requests.len();
            c.requests.retain(|r| r.id != request_id);
            c.requests.len() != before
        })
    }

    /// Imports collections with fresh ids.
    pub fn import(&mut self, incoming: &[Collection], strategy: ImportStrategy) -> ImportSummary {
        let (collections, summary) = plan_import(&self.collections, incoming, strategy);
        self.collections = collections;
        debug!(added = summary.added, skipped = summary.skipped, ?strategy, "collections imported");
        summary
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use querybox_domain::HttpMethod;

    #[test]
    fn test_collection_lifecycle() {
        let mut store = CollectionStore::new();
        let id = store.create("Users", 1).id;
        assert!(store.rename(&id, "People"));
        let saved = store
            .save_request(&id, "List", RequestSpec::new(HttpMethod::Get, "https://a.com/users"), 2)
            .unwrap();
        assert_eq!(store.saved_request(&id, &saved.id).unwrap().url, "https://a.com/users");
        assert!(store.remove_request(&id, &saved.id));
        assert!(!store.remove_request(&id, &saved.id));
        assert!(store.delete(&id));
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_save_into_unknown_collection() {
        let mut store = CollectionStore::new();
        assert!(store.save_request("missing", "x", RequestSpec::default(), 0).is_none());
    }

    #[test]
    fn test_merge_import_skips_existing_names() {
        let mut store = CollectionStore::new();
        store.create("Users", 1);
        let summary = store.import(
            &[Collection::new("USERS", 2), Collection::new("Orders", 2)],
            ImportStrategy::Merge,
        );
        assert_eq!(summary, ImportSummary { added: 1, skipped: 1 });
        assert_eq!(store.collections().len(), 2);
    }
}

//! History and collections on the workbench.

use querybox_domain::{
    Collection, ExportEnvelope, ExportKind, HistoryEntry, ImportStrategy, ImportSummary,
    SavedRequest,
};

use super::Workbench;
use crate::ports::StateStore;
use crate::state::CollectionStore;

impl<S: StateStore> Workbench<S> {
    // History

    /// Snapshot of the history log, newest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.session.lock().history.entries().to_vec()
    }

    /// Removes one history entry.
    pub fn remove_history_entry(&self, id: &str) -> bool {
        let mut session = self.session.lock();
        let removed = session.history.remove(id);
        if removed {
            self.persistence.save_history(session.history.entries());
        }
        removed
    }

    /// Empties the history log.
    pub fn clear_history(&self) {
        let mut session = self.session.lock();
        session.history.clear();
        self.persistence.save_history(session.history.entries());
    }

    /// Loads a history entry's request into the active tab.
    pub fn load_history_entry(&self, id: &str) -> bool {
        let request = self
            .session
            .lock()
            .history
            .get(id)
            .map(|e| e.request_snapshot.clone());
        request.map(|r| self.load_request(&r)).is_some()
    }

    // Collections

    /// Snapshot of every collection.
    pub fn collections(&self) -> Vec<Collection> {
        self.session.lock().collections.collections().to_vec()
    }

    fn with_collections<R>(&self, edit: impl FnOnce(&mut CollectionStore) -> R) -> R {
        let mut session = self.session.lock();
        let result = edit(&mut session.collections);
        self.persistence
            .save_collections(session.collections.collections());
        result
    }

    /// Creates an empty collection.
    pub fn create_collection(&self, name: impl Into<String>) -> Collection {
        let now = self.clock.now_millis();
        self.with_collections(|c| c.create(name, now))
    }

    /// Deletes a collection.
    pub fn delete_collection(&self, id: &str) -> bool {
        self.with_collections(|c| c.delete(id))
    }

    /// Renames a collection.
    pub fn rename_collection(&self, id: &str, name: impl Into<String>) -> bool {
        self.with_collections(|c| c.rename(id, name))
    }

    /// Saves a snapshot of the active tab's request into a collection.
    pub fn save_active_request(
        &self,
        collection_id: &str,
        name: impl Into<String>,
    ) -> Option<SavedRequest> {
        let now = self.clock.now_millis();
        let mut session = self.session.lock();
        let request = session.tabs.active_tab().request.clone();
        let saved = session
            .collections
            .save_request(collection_id, name, request, now)?;
        self.persistence
            .save_collections(session.collections.collections());
        Some(saved)
    }

    /// Removes a saved request from a collection.
    pub fn remove_saved_request(&self, collection_id: &str, request_id: &str) -> bool {
        self.with_collections(|c| c.remove_request(collection_id, request_id))
    }

    /// Loads a saved request into the active tab.
    pub fn load_saved_request(&self, collection_id: &str, request_id: &str) -> bool {
        let request = self
            .session
            .lock()
            .collections
            .saved_request(collection_id, request_id)
            .map(|r| r.request_snapshot.clone());
        request.map(|r| self.load_request(&r)).is_some()
    }

    /// Wraps every collection in an export envelope.
    pub fn export_collections(&self) -> ExportEnvelope<Collection> {
        ExportEnvelope::new(
            ExportKind::Collections,
            self.collections(),
            self.clock.now_millis(),
        )
    }

    /// Imports collections with fresh ids.
    pub fn import_collections(
        &self,
        incoming: &[Collection],
        strategy: ImportStrategy,
    ) -> ImportSummary {
        self.with_collections(|c| c.import(incoming, strategy))
    }
}

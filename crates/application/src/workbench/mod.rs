//! The workbench session: every tab, environment, history entry and
//! collection, behind one lock.
//!
//! All state lives in a [`Session`] guarded by a `parking_lot` mutex. Each
//! operation locks, mutates, persists and unlocks; the lock is never held
//! across an `.await`. Sends commit back into the session by tab id, so a
//! response for one tab never touches another.

mod environments;
mod library;
mod send;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use querybox_domain::{
    AuthConfig, AuthEdit, AuthType, BodyMode, ContentType, HttpMethod, KeyValueEdit,
    KeyValuePair, RequestSpec, RequestState, Tab,
};
use tracing::debug;

use crate::persistence::PersistenceBridge;
use crate::ports::{CancellationToken, Clock, StateStore, Transport};
use crate::state::{CollectionStore, HistoryLog, TabRegistry, VariableStore};
use crate::use_cases::SendRequest;

pub use send::SendOutcome;

struct InFlight {
    generation: u64,
    token: CancellationToken,
}

struct Session {
    tabs: TabRegistry,
    variables: VariableStore,
    history: HistoryLog,
    collections: CollectionStore,
    in_flight: HashMap<String, InFlight>,
    next_generation: u64,
}

impl Session {
    fn cancel_in_flight(&mut self, tab_id: &str) -> bool {
        self.in_flight
            .remove(tab_id)
            .map(|previous| previous.token.cancel())
            .is_some()
    }
}

/// Multi-tab request workbench backed by a [`StateStore`].
pub struct Workbench<S> {
    session: Mutex<Session>,
    persistence: PersistenceBridge<S>,
    send_request: SendRequest,
    clock: Arc<dyn Clock>,
}

impl<S: StateStore> Workbench<S> {
    /// Restores a workbench from `store`.
    ///
    /// Responses are never restored, so every tab starts idle. A missing
    /// or empty tab list yields one default tab.
    pub fn load(store: S, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        let persistence = PersistenceBridge::new(store);
        let tabs = persistence.load_tabs();
        let environments = persistence.load_environments();
        let session = Session {
            tabs: TabRegistry::restore(tabs.tabs, tabs.active_tab_id),
            variables: VariableStore::restore(
                environments.environments,
                environments.active_environment_id,
            ),
            history: HistoryLog::restore(persistence.load_history()),
            collections: CollectionStore::restore(persistence.load_collections()),
            in_flight: HashMap::new(),
            next_generation: 0,
        };
        debug!(
            tabs = session.tabs.len(),
            environments = session.variables.environments().len(),
            history = session.history.entries().len(),
            "workbench loaded"
        );
        Self {
            session: Mutex::new(session),
            persistence,
            send_request: SendRequest::new(transport),
            clock,
        }
    }

    /// The backing store.
    pub const fn store(&self) -> &S {
        self.persistence.store()
    }

    fn persist_tabs(&self, session: &Session) {
        self.persistence
            .save_tabs(session.tabs.tabs(), session.tabs.active_tab_id());
    }

    fn with_tabs<R>(&self, edit: impl FnOnce(&mut TabRegistry) -> R) -> R {
        let mut session = self.session.lock();
        let result = edit(&mut session.tabs);
        self.persist_tabs(&session);
        result
    }

    // Tabs

    /// Snapshot of every tab in display order.
    pub fn tabs(&self) -> Vec<Tab> {
        self.session.lock().tabs.tabs().to_vec()
    }

    /// Snapshot of one tab.
    pub fn tab(&self, id: &str) -> Option<Tab> {
        self.session.lock().tabs.tab(id).cloned()
    }

    /// Snapshot of the active tab.
    pub fn active_tab(&self) -> Tab {
        self.session.lock().tabs.active_tab().clone()
    }

    /// Id of the active tab.
    pub fn active_tab_id(&self) -> String {
        self.session.lock().tabs.active_tab_id().to_string()
    }

    /// Opens a blank tab. Returns `None` at the tab limit.
    pub fn create_tab(&self) -> Option<String> {
        self.with_tabs(|tabs| tabs.create_tab(None))
    }

    /// Opens a tab pre-filled with `request`. Returns `None` at the tab limit.
    pub fn create_tab_with(&self, request: RequestSpec) -> Option<String> {
        self.with_tabs(|tabs| tabs.create_tab(Some(request)))
    }

    /// Closes a tab and cancels its in-flight send, if any.
    pub fn close_tab(&self, id: &str) -> bool {
        let mut session = self.session.lock();
        if !session.tabs.close_tab(id) {
            return false;
        }
        session.cancel_in_flight(id);
        self.persist_tabs(&session);
        true
    }

    /// Activates a tab.
    pub fn switch_tab(&self, id: &str) -> bool {
        self.with_tabs(|tabs| tabs.switch_tab(id))
    }

    /// Renames a tab.
    pub fn rename_tab(&self, id: &str, name: impl Into<String>) -> bool {
        self.with_tabs(|tabs| tabs.rename_tab(id, name))
    }

    // Request editor (active tab)

    /// Edits the active tab's request, marks it dirty and persists.
    pub fn update_active_request<R>(&self, edit: impl FnOnce(&mut RequestSpec) -> R) -> R {
        self.with_tabs(|tabs| tabs.update_active_tab_request(edit))
    }

    /// Sets the HTTP method.
    pub fn set_method(&self, method: HttpMethod) {
        self.update_active_request(|r| r.method = method);
    }

    /// Sets the URL and re-derives the params table from its query string.
    pub fn set_url(&self, url: impl Into<String>) {
        self.update_active_request(|r| r.set_url(url));
    }

    /// Appends a blank param row.
    pub fn add_param(&self) -> String {
        self.update_active_request(RequestSpec::add_param)
    }

    /// Edits a param row and rewrites the URL.
    pub fn update_param(&self, id: &str, edit: KeyValueEdit) -> bool {
        self.update_active_request(|r| r.update_param(id, edit))
    }

    /// Removes a param row and rewrites the URL.
    pub fn remove_param(&self, id: &str) -> bool {
        self.update_active_request(|r| r.remove_param(id))
    }

    /// Toggles a param row and rewrites the URL.
    pub fn toggle_param(&self, id: &str) -> bool {
        self.update_active_request(|r| r.toggle_param(id))
    }

    /// Appends a blank header row.
    pub fn add_header(&self) -> String {
        self.update_active_request(|r| r.headers.add())
    }

    /// Appends a filled header row.
    pub fn push_header(&self, key: impl Into<String>, value: impl Into<String>) -> String {
        self.update_active_request(|r| r.headers.push(KeyValuePair::new(key, value)))
    }

    /// Edits a header row.
    pub fn update_header(&self, id: &str, edit: KeyValueEdit) -> bool {
        self.update_active_request(|r| r.headers.update(id, edit))
    }

    /// Removes a header row.
    pub fn remove_header(&self, id: &str) -> bool {
        self.update_active_request(|r| r.headers.remove(id))
    }

    /// Toggles a header row.
    pub fn toggle_header(&self, id: &str) -> bool {
        self.update_active_request(|r| r.headers.toggle(id))
    }

    /// Switches the body mode. The raw text is kept.
    pub fn set_body_mode(&self, mode: BodyMode) {
        self.update_active_request(|r| r.body.mode = mode);
    }

    /// Sets the body syntax.
    pub fn set_body_content_type(&self, content_type: ContentType) {
        self.update_active_request(|r| r.body.content_type = content_type);
    }

    /// Replaces the raw body text.
    pub fn set_body_raw(&self, raw: impl Into<String>) {
        self.update_active_request(|r| r.body.raw = raw.into());
    }

    /// Switches the auth variant, starting from empty fields.
    pub fn set_auth_type(&self, auth_type: AuthType) {
        self.update_active_request(|r| r.auth = AuthConfig::empty(auth_type));
    }

    /// Edits one auth field. Ignored unless it targets the current variant.
    pub fn update_auth(&self, edit: AuthEdit) -> bool {
        self.update_active_request(|r| r.auth.apply(edit))
    }

    /// Replaces the active tab's request with a copy of `request` and
    /// clears its response.
    pub fn load_request(&self, request: &RequestSpec) {
        let mut session = self.session.lock();
        let tab_id = session.tabs.active_tab_id().to_string();
        session.cancel_in_flight(&tab_id);
        session
            .tabs
            .update_active_tab_request(|r| *r = request.with_fresh_ids());
        session.tabs.update_active_tab_response(RequestState::Idle);
        self.persist_tabs(&session);
    }

    /// Clears the active tab's response back to idle.
    pub fn reset_response(&self) {
        self.session
            .lock()
            .tabs
            .update_active_tab_response(RequestState::Idle);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::{ACTIVE_TAB_KEY, TABS_KEY};
    use crate::testing::{FixedClock, MemoryStore, ScriptedTransport};
    use pretty_assertions::assert_eq;
    use querybox_domain::{DEFAULT_TAB_NAME, RequestStatus};

    pub(super) fn workbench() -> Workbench<MemoryStore> {
        let (transport, _requests) = ScriptedTransport::new();
        Workbench::load(
            MemoryStore::default(),
            Arc::new(transport),
            Arc::new(FixedClock::new(1_700_000_000_000)),
        )
    }

    #[test]
    fn test_fresh_workbench_has_one_default_tab() {
        let wb = workbench();
        let tabs = wb.tabs();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].name, DEFAULT_TAB_NAME);
        assert_eq!(wb.active_tab_id(), tabs[0].id);
    }

    #[test]
    fn test_tab_changes_are_persisted() {
        let wb = workbench();
        let id = wb.create_tab().unwrap();
        wb.rename_tab(&id, "Users");
        let stored = wb.store().value(TABS_KEY).unwrap();
        assert_eq!(stored.as_array().unwrap().len(), 2);
        assert_eq!(stored[1]["name"], "Users");
        assert_eq!(wb.store().value(ACTIVE_TAB_KEY), Some(serde_json::json!(id)));
    }

    #[test]
    fn test_reload_restores_tabs() {
        let wb = workbench();
        wb.set_url("https://a.com/x?q=1");
        let id = wb.create_tab().unwrap();
        wb.set_method(HttpMethod::Post);
        let store = wb.store().clone();

        let (transport, _requests) = ScriptedTransport::new();
        let reloaded = Workbench::load(store, Arc::new(transport), Arc::new(FixedClock::new(0)));
        assert_eq!(reloaded.tabs().len(), 2);
        assert_eq!(reloaded.active_tab_id(), id);
        assert_eq!(reloaded.active_tab().request.method, HttpMethod::Post);
        assert_eq!(reloaded.tabs()[0].request.params.len(), 1);
        assert!(reloaded.tabs().iter().all(|t| t.status() == RequestStatus::Idle));
    }

    #[test]
    fn test_editor_operations_target_active_tab() {
        let wb = workbench();
        let first = wb.active_tab_id();
        wb.create_tab().unwrap();
        wb.set_url("https://a.com/items");
        let param = wb.add_param();
        wb.update_param(&param, KeyValueEdit::Key("page".into()));
        wb.update_param(&param, KeyValueEdit::Value("3".into()));
        assert_eq!(wb.active_tab().request.url, "https://a.com/items?page=3");
        assert!(wb.active_tab().is_dirty);

        wb.toggle_param(&param);
        assert_eq!(wb.active_tab().request.url, "https://a.com/items");

        let first_tab = wb.tab(&first).unwrap();
        assert_eq!(first_tab.request.url, "");
        assert!(!first_tab.is_dirty);
    }

    #[test]
    fn test_auth_editing() {
        let wb = workbench();
        assert!(!wb.update_auth(AuthEdit::Token("x".into())));
        wb.set_auth_type(AuthType::Bearer);
        assert!(wb.update_auth(AuthEdit::Token("abc".into())));
        assert_eq!(wb.active_tab().request.auth, AuthConfig::bearer("abc"));
    }

    #[test]
    fn test_body_mode_switch_keeps_text() {
        let wb = workbench();
        wb.set_body_mode(BodyMode::Raw);
        wb.set_body_raw("{\"a\":1}");
        wb.set_body_mode(BodyMode::None);
        assert_eq!(wb.active_tab().request.body.raw, "{\"a\":1}");
    }

    #[test]
    fn test_load_request_gives_fresh_ids() {
        let wb = workbench();
        let mut source = RequestSpec::new(HttpMethod::Put, "https://a.com/?x=1");
        source.headers.push(KeyValuePair::new("A", "1"));
        wb.load_request(&source);
        let loaded = wb.active_tab().request;
        assert_eq!(loaded.url, source.url);
        assert_ne!(loaded.params.iter().next().unwrap().id, source.params.iter().next().unwrap().id);
        assert_ne!(loaded.headers.iter().next().unwrap().id, source.headers.iter().next().unwrap().id);
    }

    #[test]
    fn test_close_last_tab_replaces_it() {
        let wb = workbench();
        let only = wb.active_tab_id();
        assert!(wb.close_tab(&only));
        let tabs = wb.tabs();
        assert_eq!(tabs.len(), 1);
        assert_ne!(tabs[0].id, only);
        assert_eq!(tabs[0].name, DEFAULT_TAB_NAME);
    }
}

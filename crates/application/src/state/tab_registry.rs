//! Ordered set of open tabs with exactly one active.

use querybox_domain::{RequestSpec, RequestState, Tab};
use tracing::debug;

/// Maximum number of open tabs.
pub const MAX_TABS: usize = 20;

/// The open tabs and which one is active.
///
/// There is always at least one tab and at most [`MAX_TABS`], and the
/// active id always names a tab in the list.
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<Tab>,
    active_tab_id: String,
}

impl TabRegistry {
    /// Creates a registry holding one default tab.
    #[must_use]
    pub fn new() -> Self {
        let tab = Tab::new();
        Self {
            active_tab_id: tab.id.clone(),
            tabs: vec![tab],
        }
    }

    /// Rebuilds a registry from persisted tabs.
    ///
    /// Request state is reset to idle. An unknown or missing active id
    /// falls back to the first tab; an empty list yields a default tab.
    /// Tabs beyond [`MAX_TABS`] are dropped.
    #[must_use]
    pub fn restore(tabs: Vec<Tab>, active_tab_id: Option<String>) -> Self {
        let tabs: Vec<Tab> = tabs
            .into_iter()
            .take(MAX_TABS)
            .map(|tab| Tab {
                state: RequestState::Idle,
                ..tab
            })
            .collect();

        let Some(first_id) = tabs.first().map(|t| t.id.clone()) else {
            return Self::new();
        };
        let active_tab_id = active_tab_id
            .filter(|id| tabs.iter().any(|t| &t.id == id))
            .unwrap_or(first_id);

        Self {
            tabs,
            active_tab_id,
        }
    }

    /// All tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Id of the active tab.
    #[must_use]
    pub fn active_tab_id(&self) -> &str {
        &self.active_tab_id
    }

    /// The active tab.
    #[must_use]
    pub fn active_tab(&self) -> &Tab {
        // Every constructor and close path leaves at least one tab.
        debug_assert!(!self.tabs.is_empty(), "tab registry is never empty");
        self.tabs
            .iter()
            .find(|t| t.id == self.active_tab_id)
            .unwrap_or(&self.tabs[0])
    }

    fn active_tab_mut(&mut self) -> &mut Tab {
        debug_assert!(!self.tabs.is_empty(), "tab registry is never empty");
        let index = self
            .tabs
            .iter()
            .position(|t| t.id == self.active_tab_id)
            .unwrap_or(0);
        &mut self.tabs[index]
    }

    /// Looks up a tab by id.
    #[must_use]
    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Mutable lookup by id.
    pub fn tab_mut(&mut self, id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    /// Number of open tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if there are no tabs, which the registry never allows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Opens a new tab, optionally pre-filled, and activates it.
    ///
    /// Returns `None` without changing anything when [`MAX_TABS`] are open.
    pub fn create_tab(&mut self, request: Option<RequestSpec>) -> Option<String> {
        if self.tabs.len() >= MAX_TABS {
            debug!(max = MAX_TABS, "tab limit reached");
            return None;
        }
        let tab = request.map_or_else(Tab::new, Tab::with_request);
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id.clone_from(&id);
        debug!(tab_id = %id, "tab created");
        Some(id)
    }

    /// Closes a tab. Returns false if the id is unknown.
    ///
    /// Closing the only tab replaces it with a fresh default tab. Closing
    /// the active tab activates the tab now at the same position, or the
    /// last tab.
    pub fn close_tab(&mut self, id: &str) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };

        if self.tabs.len() == 1 {
            *self = Self::new();
            debug!(tab_id = %id, "last tab replaced");
            return true;
        }

        self.tabs.remove(index);
        if self.active_tab_id == id {
            let neighbour = index.min(self.tabs.len() - 1);
            self.active_tab_id.clone_from(&self.tabs[neighbour].id);
        }
        debug!(tab_id = %id, active = %self.active_tab_id, "tab closed");
        true
    }

    /// Activates a tab. Returns false if the id is unknown.
    pub fn switch_tab(&mut self, id: &str) -> bool {
        if self.tab(id).is_none() {
            return false;
        }
        self.active_tab_id = id.to_string();
        true
    }

    /// Renames a tab. Returns false if the id is unknown.
    pub fn rename_tab(&mut self, id: &str, name: impl Into<String>) -> bool {
        self.tab_mut(id).map(|t| t.name = name.into()).is_some()
    }

    /// Edits the active tab's request and marks the tab dirty.
    pub fn update_active_tab_request<R>(&mut self, edit: impl FnOnce(&mut RequestSpec) -> R) -> R {
        let tab = self.active_tab_mut();
        tab.is_dirty = true;
        edit(&mut tab.request)
    }

    /// Replaces the active tab's request state.
    pub fn update_active_tab_response(&mut self, state: RequestState) {
        self.active_tab_mut().state = state;
    }

    /// Replaces one tab's request state. Returns false if the id is unknown.
    pub fn update_tab_response(&mut self, id: &str, state: RequestState) -> bool {
        self.tab_mut(id).map(|t| t.state = state).is_some()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use querybox_domain::{HttpMethod, RequestErrorKind, RequestStatus, ResponseSpec};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn registry_with(count: usize) -> (TabRegistry, Vec<String>) {
        let mut registry = TabRegistry::new();
        let mut ids = vec![registry.active_tab_id().to_string()];
        for _ in 1..count {
            ids.push(registry.create_tab(None).unwrap());
        }
        (registry, ids)
    }

    #[test]
    fn test_new_registry_has_one_active_tab() {
        let registry = TabRegistry::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_tab().id, registry.active_tab_id());
        assert_eq!(registry.active_tab().name, "New Request");
    }

    #[test]
    fn test_create_tab_activates_and_respects_limit() {
        let (mut registry, ids) = registry_with(MAX_TABS);
        assert_eq!(registry.len(), MAX_TABS);
        assert_eq!(registry.active_tab_id(), ids[MAX_TABS - 1]);
        assert_eq!(registry.create_tab(None), None);
        assert_eq!(registry.len(), MAX_TABS);
        assert_eq!(registry.active_tab_id(), ids[MAX_TABS - 1]);
    }

    #[test]
    fn test_create_tab_with_request() {
        let mut registry = TabRegistry::new();
        let id = registry
            .create_tab(Some(RequestSpec::new(HttpMethod::Post, "https://a.com")))
            .unwrap();
        assert_eq!(registry.tab(&id).unwrap().request.method, HttpMethod::Post);
    }

    #[test]
    fn test_close_only_tab_replaces_it() {
        let mut registry = TabRegistry::new();
        let old = registry.active_tab_id().to_string();
        assert!(registry.close_tab(&old));
        assert_eq!(registry.len(), 1);
        assert_ne!(registry.active_tab_id(), old);
        assert_eq!(registry.active_tab().name, "New Request");
    }

    #[test]
    fn test_close_active_tab_activates_neighbour() {
        let (mut registry, ids) = registry_with(3);
        registry.switch_tab(&ids[1]);
        registry.close_tab(&ids[1]);
        assert_eq!(registry.active_tab_id(), ids[2]);

        registry.close_tab(&ids[2]);
        assert_eq!(registry.active_tab_id(), ids[0]);
    }

    #[test]
    fn test_close_last_position_activates_new_last() {
        let (mut registry, ids) = registry_with(3);
        assert_eq!(registry.active_tab_id(), ids[2]);
        registry.close_tab(&ids[2]);
        assert_eq!(registry.active_tab_id(), ids[1]);
    }

    #[test]
    fn test_close_inactive_tab_keeps_active() {
        let (mut registry, ids) = registry_with(3);
        registry.close_tab(&ids[0]);
        assert_eq!(registry.active_tab_id(), ids[2]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut registry, ids) = registry_with(2);
        assert!(!registry.close_tab("nope"));
        assert!(!registry.switch_tab("nope"));
        assert!(!registry.rename_tab("nope", "x"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_tab_id(), ids[1]);
    }

    #[test]
    fn test_update_active_tab_request_marks_dirty_only_active() {
        let (mut registry, ids) = registry_with(2);
        registry.update_active_tab_request(|r| r.set_url("https://a.com"));
        assert!(registry.tab(&ids[1]).unwrap().is_dirty);
        assert_eq!(registry.tab(&ids[1]).unwrap().request.url, "https://a.com");
        assert!(!registry.tab(&ids[0]).unwrap().is_dirty);
        assert_eq!(registry.tab(&ids[0]).unwrap().request.url, "");
    }

    #[test]
    fn test_response_updates_are_scoped() {
        let (mut registry, ids) = registry_with(2);
        registry.update_active_tab_response(RequestState::success(ResponseSpec::default()));
        assert!(registry.update_tab_response(
            &ids[0],
            RequestState::error(RequestErrorKind::Network, "down")
        ));
        assert_eq!(registry.tab(&ids[1]).unwrap().status(), RequestStatus::Success);
        assert_eq!(registry.tab(&ids[0]).unwrap().status(), RequestStatus::Error);
        assert!(!registry.tab(&ids[0]).unwrap().is_dirty);
    }

    #[test]
    fn test_restore_resets_state_and_validates_active() {
        let mut tab = Tab::new();
        tab.state = RequestState::loading();
        let second = Tab::new();
        let restored = TabRegistry::restore(vec![tab.clone(), second], Some("gone".into()));
        assert_eq!(restored.active_tab_id(), tab.id);
        assert_eq!(restored.active_tab().status(), RequestStatus::Idle);

        let empty = TabRegistry::restore(Vec::new(), None);
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn test_random_operation_sequences_keep_invariants() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut registry = TabRegistry::new();
            for _ in 0..200 {
                let ids: Vec<String> = registry.tabs().iter().map(|t| t.id.clone()).collect();
                let target = if rng.random_bool(0.1) {
                    "unknown".to_string()
                } else {
                    ids[rng.random_range(0..ids.len())].clone()
                };
                match rng.random_range(0..3) {
                    0 => {
                        let created = registry.create_tab(None);
                        assert_eq!(created.is_some(), ids.len() < MAX_TABS);
                    }
                    1 => {
                        assert_eq!(registry.close_tab(&target), ids.contains(&target));
                    }
                    _ => {
                        assert_eq!(registry.switch_tab(&target), ids.contains(&target));
                    }
                }

                assert!((1..=MAX_TABS).contains(&registry.len()), "seed {seed}");
                let active = registry.tab(registry.active_tab_id());
                assert!(active.is_some(), "seed {seed}: active id does not resolve");
                assert_eq!(registry.active_tab().id, registry.active_tab_id());
            }
        }
    }
}

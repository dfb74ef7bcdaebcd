//! Sent-request history, newest first.

use querybox_domain::{HistoryEntry, MAX_HISTORY_ENTRIES};

/// Bounded list of history entries, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from persisted entries, keeping the newest.
    #[must_use]
    pub fn restore(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { entries }
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Prepends an entry, dropping the oldest beyond the limit.
    pub fn add(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    /// Removes one entry. Returns false if the id is unknown.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use querybox_domain::{HttpMethod, RequestSpec};

    fn entry(n: i64) -> HistoryEntry {
        let request = RequestSpec::new(HttpMethod::Get, format!("https://a.com/{n}"));
        HistoryEntry::new(&request, request.full_url(), 200, "OK", n)
    }

    #[test]
    fn test_add_prepends_and_caps() {
        let mut log = HistoryLog::new();
        for n in 0..60 {
            log.add(entry(n));
        }
        assert_eq!(log.entries().len(), MAX_HISTORY_ENTRIES);
        assert_eq!(log.entries()[0].timestamp, 59);
        assert_eq!(log.entries()[MAX_HISTORY_ENTRIES - 1].timestamp, 10);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut log = HistoryLog::new();
        log.add(entry(1));
        log.add(entry(2));
        let id = log.entries()[1].id.clone();
        assert!(log.remove(&id));
        assert!(!log.remove(&id));
        assert_eq!(log.entries().len(), 1);
        log.clear();
        assert!(log.entries().is_empty());
    }
}

//! Per-user search history.
//!
//! History is a JSON array of query strings, most recent first, stored under
//! `search_history_<user id>` (or `search_history_guest`). Storage trouble is
//! logged and reads as an empty history.

use causehive_core::store::{KvStore, read_json, write_json};

/// Default number of stored entries.
pub const STORED_LIMIT: usize = 10;
/// Default number of entries offered in the dropdown.
pub const DISPLAY_LIMIT: usize = 5;

/// Storage key for `user`'s history.
#[must_use]
pub fn key_for(user: Option<&str>) -> String {
    match user.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("search_history_{id}"),
        None => "search_history_guest".to_string(),
    }
}

#[derive(Debug)]
pub struct SearchHistory<S: KvStore> {
    store: S,
    key: String,
    stored_limit: usize,
    display_limit: usize,
}

impl<S: KvStore> SearchHistory<S> {
    #[must_use]
    pub fn new(store: S, user: Option<&str>) -> Self {
        Self {
            store,
            key: key_for(user),
            stored_limit: STORED_LIMIT,
            display_limit: DISPLAY_LIMIT,
        }
    }

    #[must_use]
    pub fn with_limits(mut self, stored: usize, displayed: usize) -> Self {
        self.stored_limit = stored;
        self.display_limit = displayed;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Every stored entry, most recent first.
    #[must_use]
    pub fn stored(&self) -> Vec<String> {
        match read_json::<Vec<String>, _>(&self.store, &self.key) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(code = %err.code(), key = %self.key, "error loading search history: {err}");
                Vec::new()
            }
        }
    }

    /// Entries shown in the dropdown.
    #[must_use]
    pub fn load(&self) -> Vec<String> {
        let mut entries = self.stored();
        entries.truncate(self.display_limit);
        entries
    }

    /// Move `term` to the front, dropping older duplicates, and return the
    /// display slice.
    pub fn save(&mut self, term: &str) -> Vec<String> {
        let mut entries = self.stored();
        entries.retain(|existing| existing != term);
        entries.insert(0, term.to_string());
        entries.truncate(self.stored_limit);

        if let Err(err) = write_json(&mut self.store, &self.key, &entries) {
            tracing::warn!(code = %err.code(), key = %self.key, "error saving search history: {err}");
        }
        entries.truncate(self.display_limit);
        entries
    }

    pub fn clear(&mut self) {
        if let Err(err) = self.store.remove(&self.key) {
            tracing::warn!(code = %err.code(), key = %self.key, "error clearing search history: {err}");
        }
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use causehive_core::store::MemoryStore;

    #[test]
    fn keys_are_partitioned_by_user() {
        assert_eq!(key_for(Some("42")), "search_history_42");
        assert_eq!(key_for(None), "search_history_guest");
        assert_eq!(key_for(Some("  ")), "search_history_guest");
    }

    #[test]
    fn history_is_bounded_and_most_recent_first() {
        let mut history = SearchHistory::new(MemoryStore::new(), None);
        for n in 1..=12 {
            history.save(&format!("term {n}"));
        }

        let stored = history.stored();
        assert_eq!(stored.len(), 10);
        assert_eq!(stored[0], "term 12");
        assert_eq!(stored[9], "term 3");

        let shown = history.load();
        assert_eq!(shown, ["term 12", "term 11", "term 10", "term 9", "term 8"]);
    }

    #[test]
    fn resaving_moves_term_to_front() {
        let mut history = SearchHistory::new(MemoryStore::new(), Some("7"));
        history.save("water");
        history.save("schools");
        let shown = history.save("water");
        assert_eq!(shown, ["water", "schools"]);
    }

    #[test]
    fn users_do_not_share_history() {
        let mut alice = SearchHistory::new(MemoryStore::new(), Some("alice"));
        alice.save("clinics");
        let bob = SearchHistory::new(alice.into_store(), Some("bob"));
        assert!(bob.load().is_empty());
    }

    #[test]
    fn corrupt_history_reads_as_empty_and_is_replaced() {
        let mut store = MemoryStore::new();
        store.set("search_history_guest", "not json").expect("set");
        let mut history = SearchHistory::new(store, None);
        assert!(history.load().is_empty());

        history.save("farms");
        assert_eq!(history.load(), ["farms"]);
    }

    #[test]
    fn clear_removes_everything() {
        let mut history = SearchHistory::new(MemoryStore::new(), None);
        history.save("a b");
        history.clear();
        assert!(history.stored().is_empty());
    }

    proptest::proptest! {
        #[test]
        fn saves_keep_entries_unique_and_bounded(
            terms in proptest::collection::vec("[a-d]{1,2}", 1..40)
        ) {
            let mut history = SearchHistory::new(MemoryStore::new(), None);
            for term in &terms {
                history.save(term);
            }

            let stored = history.stored();
            proptest::prop_assert!(stored.len() <= STORED_LIMIT);
            proptest::prop_assert_eq!(stored.first(), terms.last());

            let mut unique = stored.clone();
            unique.sort();
            unique.dedup();
            proptest::prop_assert_eq!(unique.len(), stored.len());
            proptest::prop_assert!(history.load().len() <= DISPLAY_LIMIT);
        }
    }
}

//! Bookmarked causes.
//!
//! The saved list is an ordered set of cause ids stored under one key.
//! Storage failures are logged and never surface to the caller; unreadable
//! stored data reads as an empty list.

use crate::store::{KvStore, read_json, write_json};

/// Storage key holding the saved cause ids.
pub const SAVED_CAUSES_KEY: &str = "savedCauses";

/// Saved cause ids, kept in the order they were saved.
#[derive(Debug)]
pub struct SavedCauses<S: KvStore> {
    store: S,
    ids: Vec<String>,
}

impl<S: KvStore> SavedCauses<S> {
    /// Load the saved list from `store`.
    pub fn load(store: S) -> Self {
        let ids = match read_json::<Vec<String>, _>(&store, SAVED_CAUSES_KEY) {
            Ok(ids) => ids.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(code = %err.code(), "error loading saved causes: {err}");
                Vec::new()
            }
        };
        Self { store, ids }
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    /// Add `id`; returns false if it was already saved.
    pub fn save(&mut self, id: &str) -> bool {
        if self.is_saved(id) {
            return false;
        }
        self.ids.push(id.to_string());
        self.persist();
        true
    }

    /// Remove `id`; returns false if it was not saved.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|saved| saved != id);
        let removed = self.ids.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Flip the saved state of `id`; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.save(id)
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if let Err(err) = write_json(&mut self.store, SAVED_CAUSES_KEY, &self.ids) {
            tracing::warn!(code = %err.code(), "error saving causes to storage: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn save_remove_toggle() {
        let mut saved = SavedCauses::load(MemoryStore::new());
        assert_eq!(saved.count(), 0);

        assert!(saved.save("c1"));
        assert!(!saved.save("c1"));
        assert!(saved.save("c2"));
        assert_eq!(saved.ids(), ["c1", "c2"]);

        assert!(!saved.toggle("c1"));
        assert!(!saved.is_saved("c1"));
        assert!(saved.toggle("c1"));
        assert_eq!(saved.ids(), ["c2", "c1"]);

        assert!(saved.remove("c2"));
        assert!(!saved.remove("c2"));
        assert_eq!(saved.count(), 1);
    }

    #[test]
    fn state_survives_reload() {
        let mut saved = SavedCauses::load(MemoryStore::new());
        saved.save("c9");
        let reloaded = SavedCauses::load(saved.into_store());
        assert!(reloaded.is_saved("c9"));
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(SAVED_CAUSES_KEY, "[1, 2").expect("set");
        let saved = SavedCauses::load(store);
        assert_eq!(saved.count(), 0);
    }

    #[test]
    fn clear_empties_list() {
        let mut saved = SavedCauses::load(MemoryStore::new());
        saved.save("a");
        saved.clear();
        let reloaded = SavedCauses::load(saved.into_store());
        assert_eq!(reloaded.count(), 0);
    }
}

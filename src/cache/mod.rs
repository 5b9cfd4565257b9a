//! Resolution cache: remembers, per parent file, the parent's member symbols
//! and which child files referenced it, so repeated resolutions skip the
//! cross-file definition/symbol round-trips.
//!
//! Invariant: at most one `CacheEntry` per distinct parent file path (the
//! map key). A child file may appear in several entries when it references
//! parents in several files. Entries are removed wholesale when the parent's
//! own file is saved; the parent's member list is assumed stale after any
//! edit+save of that file.
//!
//! Writers re-check existence before insert, so concurrent passes racing on
//! the same parent degrade to redundant fetches rather than corruption.

use crate::error::{CacheError, CacheResult};
use crate::host::KeyValueStore;
use crate::symbol::CachedSymbol;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Key under which the cache snapshot is persisted in the host store.
pub const STORAGE_KEY: &str = "overlens.resolution-cache";

/// Cached resolution state for one parent file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Resolved file path where the parent declaration lives (the cache key).
    pub parent_file_path: String,
    /// Child files that have referenced a parent in this file.
    pub child_files: HashSet<String>,
    /// Parent symbol name -> child member names currently known to reference
    /// it. Supports multiple distinct parents resolved to the same file.
    pub parent_names_to_children: HashMap<String, Vec<String>>,
    /// Full symbol list of the parent file, in cached form.
    pub parent_members: Vec<CachedSymbol>,
}

impl CacheEntry {
    pub fn new(
        parent_file_path: impl Into<String>,
        child_file: impl Into<String>,
        parent_name: impl Into<String>,
        child_member_names: Vec<String>,
        parent_members: Vec<CachedSymbol>,
    ) -> Self {
        let mut child_files = HashSet::new();
        child_files.insert(child_file.into());
        let mut parent_names_to_children = HashMap::new();
        parent_names_to_children.insert(parent_name.into(), child_member_names);
        Self {
            parent_file_path: parent_file_path.into(),
            child_files,
            parent_names_to_children,
            parent_members,
        }
    }
}

/// Process-lifetime cache keyed by parent file path, safe for concurrent
/// resolution tasks.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<String, CacheEntry>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a resolved parent file path, if any.
    pub fn find_by_parent_path(&self, parent_path: &str) -> Option<CacheEntry> {
        self.entries.get(parent_path).map(|e| e.clone())
    }

    /// Entry that already serves this (child file, parent name) pair.
    ///
    /// Entries with an empty member list are ignored: they carry nothing to
    /// annotate against and a fresh fetch is cheaper than a useless hit.
    pub fn find_by_child(&self, child_file: &str, parent_name: &str) -> Option<CacheEntry> {
        self.entries
            .iter()
            .find(|entry| {
                entry.child_files.contains(child_file)
                    && entry.parent_names_to_children.contains_key(parent_name)
                    && !entry.parent_members.is_empty()
            })
            .map(|entry| entry.clone())
    }

    /// Insert a fresh entry unless one for the same parent path appeared in
    /// the meantime. Returns whether the insert happened.
    pub fn insert_if_absent(&self, entry: CacheEntry) -> bool {
        match self.entries.entry(entry.parent_file_path.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Register a (child file, parent name) association on an existing entry.
    /// No-op when the entry has been invalidated concurrently.
    pub fn register_child(
        &self,
        parent_path: &str,
        child_file: &str,
        parent_name: &str,
        child_member_names: Vec<String>,
    ) {
        if let Some(mut entry) = self.entries.get_mut(parent_path) {
            entry.child_files.insert(child_file.to_string());
            entry
                .parent_names_to_children
                .insert(parent_name.to_string(), child_member_names);
        }
    }

    /// Overwrite the child member names recorded for a parent name. Keeps
    /// cache metadata accurate for invalidation scoping even though
    /// invalidation itself is file-wide.
    pub fn refresh_children(&self, parent_path: &str, parent_name: &str, children: Vec<String>) {
        if let Some(mut entry) = self.entries.get_mut(parent_path) {
            entry
                .parent_names_to_children
                .insert(parent_name.to_string(), children);
        }
    }

    /// Remove every entry whose parent file path equals the saved file.
    /// Returns how many entries were dropped.
    pub fn invalidate_file(&self, file_path: &str) -> usize {
        if self.entries.remove(file_path).is_some() {
            1
        } else {
            0
        }
    }

    /// User-invoked "clear all".
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Stable snapshot of all entries, ordered by parent path for
    /// deterministic persistence payloads.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> =
            self.entries.iter().map(|entry| entry.clone()).collect();
        entries.sort_by(|a, b| a.parent_file_path.cmp(&b.parent_file_path));
        entries
    }

    /// Persist the full cache collection to the host key-value store.
    pub fn save(&self, store: &impl KeyValueStore) -> CacheResult<()> {
        let payload = serde_json::to_string(&self.snapshot()).map_err(CacheError::Serialize)?;
        store.set(STORAGE_KEY, payload);
        Ok(())
    }

    /// Load persisted state from the host key-value store.
    ///
    /// Malformed persisted state resets to an empty cache rather than
    /// failing startup.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let cache = Self::new();
        let Some(payload) = store.get(STORAGE_KEY) else {
            return cache;
        };
        match serde_json::from_str::<Vec<CacheEntry>>(&payload) {
            Ok(entries) => {
                for entry in entries {
                    cache.entries.insert(entry.parent_file_path.clone(), entry);
                }
            }
            Err(e) => {
                warn!("Discarding corrupted resolution cache state: {e}");
            }
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;
    use parking_lot::Mutex;

    fn cached(name: &str, container: &str) -> CachedSymbol {
        CachedSymbol {
            file_path: "/src/animal.ts".into(),
            start_line: 1,
            start_column: 2,
            name: name.to_string(),
            container_name: container.to_string(),
            kind: SymbolKind::Method,
        }
    }

    fn entry(parent_path: &str, child: &str, parent_name: &str) -> CacheEntry {
        CacheEntry::new(
            parent_path,
            child,
            parent_name,
            vec!["speak".to_string()],
            vec![cached("speak", parent_name)],
        )
    }

    /// In-memory store used across cache tests.
    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.lock().get(key).cloned()
        }

        fn set(&self, key: &str, value: String) {
            self.values.lock().insert(key.to_string(), value);
        }
    }

    #[test]
    fn test_insert_and_find_by_parent_path() {
        let cache = ResolutionCache::new();
        assert!(cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal")));
        assert!(!cache.insert_if_absent(entry("/src/animal.ts", "/src/cat.ts", "Animal")));

        let found = cache.find_by_parent_path("/src/animal.ts").unwrap();
        // First insert wins: the racing duplicate is dropped.
        assert!(found.child_files.contains("/src/dog.ts"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_find_by_child_requires_both_keys() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));

        assert!(cache.find_by_child("/src/dog.ts", "Animal").is_some());
        assert!(cache.find_by_child("/src/dog.ts", "Walker").is_none());
        assert!(cache.find_by_child("/src/cat.ts", "Animal").is_none());
    }

    #[test]
    fn test_find_by_child_ignores_empty_member_lists() {
        let cache = ResolutionCache::new();
        let mut e = entry("/src/animal.ts", "/src/dog.ts", "Animal");
        e.parent_members.clear();
        cache.insert_if_absent(e);

        assert!(cache.find_by_child("/src/dog.ts", "Animal").is_none());
    }

    #[test]
    fn test_register_child_grows_entry() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));
        cache.register_child(
            "/src/animal.ts",
            "/src/cat.ts",
            "Pet",
            vec!["meow".to_string()],
        );

        let found = cache.find_by_parent_path("/src/animal.ts").unwrap();
        assert!(found.child_files.contains("/src/cat.ts"));
        assert_eq!(
            found.parent_names_to_children.get("Pet"),
            Some(&vec!["meow".to_string()])
        );
        // Existing association untouched.
        assert!(found.parent_names_to_children.contains_key("Animal"));
    }

    #[test]
    fn test_refresh_children_overwrites_wholesale() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));
        cache.refresh_children(
            "/src/animal.ts",
            "Animal",
            vec!["speak".to_string(), "eat".to_string()],
        );

        let found = cache.find_by_parent_path("/src/animal.ts").unwrap();
        assert_eq!(
            found.parent_names_to_children.get("Animal").unwrap().len(),
            2
        );
    }

    #[test]
    fn test_invalidate_removes_only_matching_parent() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));
        cache.insert_if_absent(entry("/src/shapes.ts", "/src/circle.ts", "Drawable"));

        assert_eq!(cache.invalidate_file("/src/animal.ts"), 1);
        assert_eq!(cache.invalidate_file("/src/animal.ts"), 0);
        assert!(cache.find_by_parent_path("/src/animal.ts").is_none());
        assert!(cache.find_by_parent_path("/src/shapes.ts").is_some());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = MemoryStore::default();
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));
        cache.save(&store).unwrap();

        let loaded = ResolutionCache::load(&store);
        assert_eq!(loaded.len(), 1);
        let found = loaded.find_by_parent_path("/src/animal.ts").unwrap();
        assert_eq!(found.parent_members.len(), 1);
        assert_eq!(found.parent_members[0].name, "speak");
    }

    #[test]
    fn test_load_resets_on_corrupted_state() {
        let store = MemoryStore::default();
        store.set(STORAGE_KEY, "{not json".to_string());

        let loaded = ResolutionCache::load(&store);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_defaults_to_empty_without_state() {
        let store = MemoryStore::default();
        assert!(ResolutionCache::load(&store).is_empty());
    }

    #[test]
    fn test_clear_empties_everything() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/animal.ts", "/src/dog.ts", "Animal"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let cache = ResolutionCache::new();
        cache.insert_if_absent(entry("/src/b.ts", "/src/child.ts", "B"));
        cache.insert_if_absent(entry("/src/a.ts", "/src/child.ts", "A"));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot[0].parent_file_path, "/src/a.ts");
        assert_eq!(snapshot[1].parent_file_path, "/src/b.ts");
    }
}

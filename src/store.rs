//! Property stores and snapshots
//!
//! A `PropertyStore` is process-wide string key/value state: the thing a
//! scoped override temporarily mutates. Two implementations are provided:
//! `ProcessStore` (an in-process map, with a global default instance) and
//! `EnvStore` (backed by the process environment).

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable point-in-time capture of a store's entire contents.
///
/// Created by [`PropertyStore::snapshot`], owned by the caller that requested
/// it, and discarded once restoration completes. Entries are kept sorted so
/// two snapshots of equal state compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    /// Create a snapshot from pre-collected entries.
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Look up a captured value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the snapshot captured a value for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of captured entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over captured entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ============================================================================
// PropertyStore
// ============================================================================

/// Read/write interface over process-wide configuration state.
///
/// `restore` replaces the *entire* contents with a snapshot: keys added since
/// the capture are removed, changed values are reverted. That is the contract
/// scoped overrides rely on.
pub trait PropertyStore {
    /// Capture the full current contents.
    fn snapshot(&self) -> Snapshot;

    /// Current value for `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`, overwriting any existing value.
    fn set(&self, key: &str, value: &str);

    /// Remove `key` if present.
    fn remove(&self, key: &str);

    /// Replace the entire contents with `snapshot`.
    fn restore(&self, snapshot: &Snapshot);
}

// ============================================================================
// ProcessStore
// ============================================================================

/// In-process property store.
///
/// The default host store for scoped overrides. A global instance is
/// available via [`ProcessStore::global`]; independent instances (useful in
/// tests) are created with [`ProcessStore::new`].
///
/// Uses `parking_lot::RwLock` instead of `std::sync::RwLock` to avoid
/// cascading panics from lock poisoning.
#[derive(Debug, Default)]
pub struct ProcessStore {
    entries: RwLock<BTreeMap<String, String>>,
}

/// Global process-wide property store (the default for scoped overrides)
static GLOBAL_STORE: Lazy<ProcessStore> = Lazy::new(ProcessStore::default);

impl ProcessStore {
    /// Create a new, empty store independent of the global one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default store.
    pub fn global() -> &'static ProcessStore {
        &GLOBAL_STORE
    }
}

impl PropertyStore for ProcessStore {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.entries.read().clone())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn restore(&self, snapshot: &Snapshot) {
        let mut entries = self.entries.write();
        entries.clear();
        entries.extend(
            snapshot
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
    }
}

// ============================================================================
// EnvStore
// ============================================================================

/// Property store backed by the process environment.
///
/// Snapshots capture every environment variable whose name and value are
/// valid UTF-8; variables that are not are ignored by this store entirely.
/// `restore` removes variables added since the capture and reverts changed
/// ones, same contract as [`ProcessStore`].
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvStore;

impl EnvStore {
    /// Create an environment-backed store.
    pub fn new() -> Self {
        Self
    }
}

impl PropertyStore for EnvStore {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(std::env::vars().collect())
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&self, key: &str, value: &str) {
        std::env::set_var(key, value);
    }

    fn remove(&self, key: &str) {
        std::env::remove_var(key);
    }

    fn restore(&self, snapshot: &Snapshot) {
        let current: Vec<String> = std::env::vars().map(|(k, _)| k).collect();
        for key in current {
            if !snapshot.contains(&key) {
                std::env::remove_var(&key);
            }
        }
        // Only rewrite variables whose value actually changed.
        for (key, value) in snapshot.iter() {
            if std::env::var(key).ok().as_deref() != Some(value) {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = ProcessStore::new();
        assert_eq!(store.get("role"), None);

        store.set("role", "server");
        assert_eq!(store.get("role"), Some("server".to_string()));

        store.set("role", "client");
        assert_eq!(store.get("role"), Some("client".to_string()));

        store.remove("role");
        assert_eq!(store.get("role"), None);
    }

    #[test]
    fn snapshot_is_point_in_time() {
        let store = ProcessStore::new();
        store.set("a", "1");

        let snapshot = store.snapshot();
        store.set("a", "2");
        store.set("b", "3");

        assert_eq!(snapshot.get("a"), Some("1"));
        assert!(!snapshot.contains("b"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn restore_reverts_changes_and_additions() {
        let store = ProcessStore::new();
        store.set("a", "1");
        store.set("b", "2");

        let snapshot = store.snapshot();
        store.set("a", "changed");
        store.remove("b");
        store.set("c", "added");

        store.restore(&snapshot);
        assert_eq!(store.get("a"), Some("1".to_string()));
        assert_eq!(store.get("b"), Some("2".to_string()));
        assert_eq!(store.get("c"), None);
    }

    #[test]
    fn restore_to_empty_clears_store() {
        let store = ProcessStore::new();
        let empty = store.snapshot();
        assert!(empty.is_empty());

        store.set("a", "1");
        store.restore(&empty);
        assert_eq!(store.get("a"), None);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn snapshots_of_equal_state_compare_equal() {
        let store = ProcessStore::new();
        store.set("x", "1");
        store.set("y", "2");

        let before = store.snapshot();
        store.set("x", "9");
        store.restore(&before);
        let after = store.snapshot();

        assert_eq!(before, after);
    }

    #[test]
    fn global_store_is_shared() {
        let key = "propscope.store.test.global";
        ProcessStore::global().set(key, "shared");
        assert_eq!(
            ProcessStore::global().get(key),
            Some("shared".to_string())
        );
        ProcessStore::global().remove(key);
    }

    #[test]
    fn env_store_round_trip() {
        // Unique names so parallel tests cannot collide.
        let key = "PROPSCOPE_STORE_TEST_ENV_ROUND_TRIP";
        let store = EnvStore::new();
        assert_eq!(store.get(key), None);

        let snapshot = store.snapshot();
        store.set(key, "transient");
        assert_eq!(store.get(key), Some("transient".to_string()));

        store.restore(&snapshot);
        assert_eq!(store.get(key), None);
    }

    #[test]
    fn snapshot_serializes() {
        let store = ProcessStore::new();
        store.set("role", "client");
        let snapshot = store.snapshot();

        let toml_str = toml::to_string(&snapshot).unwrap();
        let parsed: Snapshot = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, snapshot);
    }
}

//! Scoped application of resolved overrides with guaranteed restoration
//!
//! [`ConfigScope`] is an RAII guard: on construction it snapshots the store
//! and applies the overrides, on drop it restores the snapshot. Drop runs on
//! every exit path, including unwinding, so a caller abort between apply and
//! restore cannot leak overridden state.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;

use crate::store::{PropertyStore, Snapshot};

// =============================================================================
// Scope serialization
// =============================================================================
//
// The store a scope mutates is process-wide, so two concurrent scoped windows
// would otherwise interleave their apply/restore sequences and one would
// restore the other's transient state. Every scope holds this lock for its
// whole lifetime. Scopes must not nest: the lock is not reentrant.
//
// Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
// panics from mutex poisoning when an acquisition callback unwinds.

/// Process-wide lock serializing all scoped override windows
static SCOPE_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// RAII guard for a scoped override window.
///
/// Construction applies the overrides; dropping the guard restores the
/// pre-scope state. The guard also carries the process-wide scope lock, so it
/// doubles as the lock token serializing concurrent scoped callers.
pub struct ConfigScope<'a> {
    store: &'a dyn PropertyStore,
    snapshot: Snapshot,
    _serial: MutexGuard<'static, ()>,
}

impl<'a> ConfigScope<'a> {
    /// Take the scope lock, snapshot `store`, and apply `overrides`.
    ///
    /// Blocks until any other scoped window in the process has closed.
    pub fn apply(store: &'a dyn PropertyStore, overrides: &BTreeMap<String, String>) -> Self {
        let serial = SCOPE_LOCK.lock();
        let snapshot = store.snapshot();
        for (key, value) in overrides {
            store.set(key, value);
        }
        tracing::debug!(overrides = overrides.len(), "applied scoped overrides");
        Self {
            store,
            snapshot,
            _serial: serial,
        }
    }

    /// The state captured before this scope applied its overrides.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl Drop for ConfigScope<'_> {
    fn drop(&mut self) {
        self.store.restore(&self.snapshot);
        tracing::debug!("restored pre-scope property state");
    }
}

impl std::fmt::Debug for ConfigScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigScope")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

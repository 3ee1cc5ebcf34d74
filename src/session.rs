//! Scoped-override acquisition and session profiles
//!
//! The core operation of the crate: resolve an override set against a base,
//! apply it inside a [`ConfigScope`], run the caller's acquisition step, and
//! restore the pre-call state before the outcome surfaces. Session profiles
//! bundle the preset options a class of member is launched with.

use crate::error::{AcquireError, Error, Result};
use crate::options::{resolve, ConfigOption, OptionSet};
use crate::scope::ConfigScope;
use crate::store::PropertyStore;

/// Cache configuration URI profiles supply when the caller chose none.
pub const DEFAULT_CACHE_CONFIG: &str = "cache-config.xml";

/// Acquire a resource while `overrides` (resolved against `base`) are
/// temporarily applied to `store`.
///
/// The sequence is strictly: resolve, snapshot, apply, acquire, restore.
/// Restoration runs on every exit path, including an unwinding `acquire`, so
/// the store after this returns is identical key-for-key to the store before
/// the call. Concurrent callers serialize through the process-wide scope
/// lock; do not call this from inside another scoped window.
///
/// # Errors
///
/// - [`Error::ResolutionFailed`] if the effective options cannot be resolved;
///   the store has not been touched.
/// - [`Error::AcquisitionFailed`] if `acquire` fails; the store has already
///   been restored when the error surfaces.
pub fn acquire_with_overrides<R, F>(
    store: &dyn PropertyStore,
    base: &OptionSet,
    overrides: &OptionSet,
    acquire: F,
) -> Result<R>
where
    F: FnOnce() -> std::result::Result<R, AcquireError>,
{
    // Resolution happens before any mutation; failing here is a safe no-op.
    let resolved = resolve(base, overrides)?;

    let scope = ConfigScope::apply(store, &resolved);
    let outcome = acquire();
    drop(scope); // restore before the outcome surfaces, success or failure

    match &outcome {
        Ok(_) => tracing::debug!("acquisition succeeded, pre-call state restored"),
        Err(source) => {
            tracing::debug!(error = %source, "acquisition failed, pre-call state restored");
        }
    }
    outcome.map_err(Error::AcquisitionFailed)
}

// ============================================================================
// Session profiles
// ============================================================================

/// A preset bundle of options applied before a session is acquired.
///
/// Profiles force the options that define them with [`OptionSet::add`] and
/// supply defaults with [`OptionSet::add_if_absent`], so caller overrides
/// survive only where the profile permits.
pub trait SessionProfile {
    /// Profile name, for diagnostics.
    fn name(&self) -> &str;

    /// Contribute this profile's options to `options`.
    fn contribute(&self, options: &mut OptionSet);
}

/// Profile for storage-disabled client members.
///
/// Forces the `client` role, disables local storage, restricts networking to
/// the local host, and supplies [`DEFAULT_CACHE_CONFIG`] only if the caller
/// did not choose a cache configuration. All instances compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StorageDisabledClient;

impl SessionProfile for StorageDisabledClient {
    fn name(&self) -> &str {
        "storage-disabled-client"
    }

    fn contribute(&self, options: &mut OptionSet) {
        options.add(ConfigOption::Role("client".to_string()));
        options.add(ConfigOption::LocalStorage(false));
        options.add(ConfigOption::LocalHostOnly(true));
        options.add_if_absent(ConfigOption::CacheConfig(DEFAULT_CACHE_CONFIG.to_string()));
    }
}

/// Acquire a session with a profile's presets layered over the caller's
/// options.
///
/// The profile contributes to the single merged pool of `base` plus
/// `overrides`, so its `add_if_absent` defaults yield to a choice the caller
/// made in either set. Otherwise equivalent to [`acquire_with_overrides`].
///
/// # Errors
///
/// Same as [`acquire_with_overrides`].
pub fn acquire_session<R, F>(
    store: &dyn PropertyStore,
    profile: &dyn SessionProfile,
    base: &OptionSet,
    overrides: &OptionSet,
    acquire: F,
) -> Result<R>
where
    F: FnOnce() -> std::result::Result<R, AcquireError>,
{
    let mut effective = base.merged(overrides);
    profile.contribute(&mut effective);
    tracing::debug!(profile = profile.name(), "acquiring session");
    acquire_with_overrides(store, &OptionSet::new(), &effective, acquire)
}

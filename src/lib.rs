//! Scoped process-wide configuration overrides with guaranteed restoration
//!
//! The core operation is [`acquire_with_overrides`]: resolve a typed option
//! set into property key/value pairs, apply them to a process-wide property
//! store, run a caller-supplied acquisition step that depends on the
//! overridden state, and restore the pre-call state on every exit path.
//!
//! Building blocks:
//! - [`PropertyStore`] / [`Snapshot`]: process-wide key/value state and its
//!   immutable point-in-time capture ([`ProcessStore`], [`EnvStore`])
//! - [`OptionSet`] / [`ConfigOption`]: capability-keyed typed options with
//!   explicit resolution
//! - [`ConfigScope`]: RAII guard applying overrides on construction and
//!   restoring on drop, serialized through a process-wide lock
//! - [`SessionProfile`] / [`StorageDisabledClient`]: preset option bundles
//! - [`ProfileConfig`]: override sets loaded from TOML files
//!
//! # Example
//!
//! ```
//! use propscope::{acquire_with_overrides, ConfigOption, OptionSet, ProcessStore, PropertyStore};
//!
//! let store = ProcessStore::new();
//! let mut overrides = OptionSet::new();
//! overrides.add(ConfigOption::Role("client".to_string()));
//!
//! let role = acquire_with_overrides(&store, &OptionSet::new(), &overrides, || {
//!     // the acquisition step observes the overridden state
//!     Ok::<_, propscope::AcquireError>(store.get("member.role"))
//! })
//! .unwrap();
//!
//! assert_eq!(role, Some("client".to_string()));
//! assert_eq!(store.get("member.role"), None); // restored
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod options;
pub mod profile;
pub mod scope;
pub mod session;
pub mod store;

// Re-export commonly used types at the crate root
pub use error::{AcquireError, Error, Result};
pub use options::{
    resolve, ConfigOption, OptionKey, OptionSet, CACHE_CONFIG_PROPERTY, LOCAL_HOST_ONLY_PROPERTY,
    LOCAL_STORAGE_PROPERTY, ROLE_PROPERTY,
};
pub use profile::{ProfileConfig, PROFILE_FILE_NAME};
pub use scope::ConfigScope;
pub use session::{
    acquire_session, acquire_with_overrides, SessionProfile, StorageDisabledClient,
    DEFAULT_CACHE_CONFIG,
};
pub use store::{EnvStore, ProcessStore, PropertyStore, Snapshot};

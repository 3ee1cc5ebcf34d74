//! Capability-keyed option registry
//!
//! Options are typed values keyed by a closed capability tag, looked up and
//! resolved explicitly rather than through runtime type inspection. An
//! [`OptionSet`] collects them; [`resolve`] turns a base set plus overrides
//! into the concrete property key/value pairs a scoped window applies.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

// ============================================================================
// Property keys
// ============================================================================

/// Property key the member role resolves to.
pub const ROLE_PROPERTY: &str = "member.role";
/// Property key local storage enablement resolves to.
pub const LOCAL_STORAGE_PROPERTY: &str = "member.storage.enabled";
/// Property key local-host-only networking resolves to.
pub const LOCAL_HOST_ONLY_PROPERTY: &str = "network.localhost.only";
/// Property key the cache configuration URI resolves to.
pub const CACHE_CONFIG_PROPERTY: &str = "cache.config.uri";

// ============================================================================
// Capability tags and typed values
// ============================================================================

/// Capability tag identifying one configuration concern.
///
/// An [`OptionSet`] holds at most one value per tag; generic properties are
/// distinguished by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionKey {
    /// The role this member announces to its peers
    Role,
    /// Whether this member hosts partition storage
    LocalStorage,
    /// Whether networking is restricted to the local host
    LocalHostOnly,
    /// URI of the cache configuration to load
    CacheConfig,
    /// A free-form property, keyed by its name
    Property(String),
}

/// A typed configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
    /// Member role name (must be non-empty)
    Role(String),
    /// Local storage enabled/disabled
    LocalStorage(bool),
    /// Restrict networking to the local host
    LocalHostOnly(bool),
    /// Cache configuration URI (must be non-empty)
    CacheConfig(String),
    /// Free-form property
    Property {
        /// Property name (must be non-empty)
        name: String,
        /// Property value
        value: String,
    },
}

impl ConfigOption {
    /// The capability this option belongs to.
    pub fn key(&self) -> OptionKey {
        match self {
            ConfigOption::Role(_) => OptionKey::Role,
            ConfigOption::LocalStorage(_) => OptionKey::LocalStorage,
            ConfigOption::LocalHostOnly(_) => OptionKey::LocalHostOnly,
            ConfigOption::CacheConfig(_) => OptionKey::CacheConfig,
            ConfigOption::Property { name, .. } => OptionKey::Property(name.clone()),
        }
    }

    /// Resolve this option to its concrete property key/value pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionFailed`] for empty role names, empty cache
    /// configuration URIs, and empty property names.
    pub fn resolved(&self) -> Result<(String, String)> {
        match self {
            ConfigOption::Role(role) => {
                if role.is_empty() {
                    return Err(Error::resolution(ROLE_PROPERTY, "role must not be empty"));
                }
                Ok((ROLE_PROPERTY.to_string(), role.clone()))
            }
            ConfigOption::LocalStorage(enabled) => Ok((
                LOCAL_STORAGE_PROPERTY.to_string(),
                enabled.to_string(),
            )),
            ConfigOption::LocalHostOnly(only) => {
                Ok((LOCAL_HOST_ONLY_PROPERTY.to_string(), only.to_string()))
            }
            ConfigOption::CacheConfig(uri) => {
                if uri.is_empty() {
                    return Err(Error::resolution(
                        CACHE_CONFIG_PROPERTY,
                        "cache configuration URI must not be empty",
                    ));
                }
                Ok((CACHE_CONFIG_PROPERTY.to_string(), uri.clone()))
            }
            ConfigOption::Property { name, value } => {
                if name.is_empty() {
                    return Err(Error::resolution(
                        "<property>",
                        "property name must not be empty",
                    ));
                }
                Ok((name.clone(), value.clone()))
            }
        }
    }
}

// ============================================================================
// OptionSet
// ============================================================================

/// A collection of typed options, at most one per capability.
///
/// Also serves as the override set for scoped acquisition: overrides shadow
/// base entries capability-for-capability when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: BTreeMap<OptionKey, ConfigOption>,
}

impl OptionSet {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, replacing any existing value for its capability.
    pub fn add(&mut self, option: ConfigOption) -> &mut Self {
        self.options.insert(option.key(), option);
        self
    }

    /// Add an option only if its capability has no value yet.
    pub fn add_if_absent(&mut self, option: ConfigOption) -> &mut Self {
        self.options.entry(option.key()).or_insert(option);
        self
    }

    /// Look up the option for a capability.
    pub fn get(&self, key: &OptionKey) -> Option<&ConfigOption> {
        self.options.get(key)
    }

    /// The configured role, if any.
    pub fn role(&self) -> Option<&str> {
        match self.options.get(&OptionKey::Role) {
            Some(ConfigOption::Role(role)) => Some(role.as_str()),
            _ => None,
        }
    }

    /// The configured cache configuration URI, if any.
    pub fn cache_config(&self) -> Option<&str> {
        match self.options.get(&OptionKey::CacheConfig) {
            Some(ConfigOption::CacheConfig(uri)) => Some(uri.as_str()),
            _ => None,
        }
    }

    /// Whether local storage is enabled, if configured.
    pub fn local_storage(&self) -> Option<bool> {
        match self.options.get(&OptionKey::LocalStorage) {
            Some(ConfigOption::LocalStorage(enabled)) => Some(*enabled),
            _ => None,
        }
    }

    /// A copy of this set with `overrides` shadowing entries capability-for-capability.
    pub fn merged(&self, overrides: &OptionSet) -> OptionSet {
        let mut merged = self.clone();
        for option in overrides.iter() {
            merged.add(option.clone());
        }
        merged
    }

    /// Iterate over options in capability order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.values()
    }

    /// Number of options in the set.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Resolve a base option set plus overrides into concrete property pairs.
///
/// Overrides shadow base entries. Resolution is all-or-nothing: any failure
/// surfaces before a single pair is produced, so callers can rely on no
/// global mutation having happened when this errors.
///
/// # Errors
///
/// Returns [`Error::ResolutionFailed`] if any effective option fails to
/// resolve (see [`ConfigOption::resolved`]).
pub fn resolve(base: &OptionSet, overrides: &OptionSet) -> Result<BTreeMap<String, String>> {
    let effective = base.merged(overrides);
    let mut resolved = BTreeMap::new();
    for option in effective.iter() {
        let (key, value) = option.resolved()?;
        resolved.insert(key, value);
    }
    Ok(resolved)
}

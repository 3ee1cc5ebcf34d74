//! Override sets loaded from TOML profile files
//!
//! A profile file describes the overrides a scoped window should apply, in
//! the same shape the typed option registry uses. Files are validated eagerly
//! on load so a bad profile fails before any scoped window opens.
//!
//! # Example
//!
//! ```toml
//! role = "client"
//! local-storage = false
//! local-host-only = true
//! cache-config = "cache-config.xml"
//!
//! [properties]
//! "site.name" = "dev"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::options::{ConfigOption, OptionSet};

/// Conventional profile file name.
pub const PROFILE_FILE_NAME: &str = "propscope.toml";

/// Profile settings parsed from a TOML file.
///
/// Every field is optional; absent fields contribute nothing to the
/// resulting [`OptionSet`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProfileConfig {
    /// Member role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Local storage enabled/disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_storage: Option<bool>,
    /// Restrict networking to the local host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_host_only: Option<bool>,
    /// Cache configuration URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_config: Option<String>,
    /// Free-form properties applied verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl ProfileConfig {
    /// Read and parse a profile from a file, validating it eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read,
    /// [`Error::InvalidProfile`] if it fails to parse, and
    /// [`Error::ResolutionFailed`] if a parsed option cannot resolve.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProfileConfig = toml::from_str(&content).map_err(|e| {
            Error::InvalidProfile(format!("failed to parse '{}': {}", path.display(), e))
        })?;
        // Validate each option up front rather than at scope-open time.
        config.to_options()?;
        Ok(config)
    }

    /// Convert these settings into the option set they describe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolutionFailed`] if any setting cannot resolve to
    /// a property pair (empty role, empty cache URI, empty property name).
    pub fn to_options(&self) -> Result<OptionSet> {
        let mut options = OptionSet::new();
        if let Some(role) = &self.role {
            options.add(ConfigOption::Role(role.clone()));
        }
        if let Some(enabled) = self.local_storage {
            options.add(ConfigOption::LocalStorage(enabled));
        }
        if let Some(only) = self.local_host_only {
            options.add(ConfigOption::LocalHostOnly(only));
        }
        if let Some(uri) = &self.cache_config {
            options.add(ConfigOption::CacheConfig(uri.clone()));
        }
        for (name, value) in &self.properties {
            options.add(ConfigOption::Property {
                name: name.clone(),
                value: value.clone(),
            });
        }
        for option in options.iter() {
            option.resolved()?;
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_full_profile() {
        let toml_str = r#"
role = "client"
local-storage = false
local-host-only = true
cache-config = "cache-config.xml"

[properties]
"site.name" = "dev"
"#;
        let config: ProfileConfig = toml::from_str(toml_str).unwrap();
        let options = config.to_options().unwrap();

        assert_eq!(options.role(), Some("client"));
        assert_eq!(options.local_storage(), Some(false));
        assert_eq!(options.cache_config(), Some("cache-config.xml"));
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn empty_profile_contributes_nothing() {
        let config: ProfileConfig = toml::from_str("").unwrap();
        let options = config.to_options().unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result: std::result::Result<ProfileConfig, _> =
            toml::from_str("durability = \"always\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_role_fails_validation() {
        let config: ProfileConfig = toml::from_str("role = \"\"").unwrap();
        assert!(config.to_options().is_err());
    }

    #[test]
    fn from_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);

        let config = ProfileConfig {
            role: Some("client".to_string()),
            local_storage: Some(false),
            local_host_only: None,
            cache_config: Some("custom.xml".to_string()),
            properties: BTreeMap::from([("site.name".to_string(), "dev".to_string())]),
        };
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = ProfileConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        let err = ProfileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn from_file_invalid_profile_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);
        std::fs::write(&path, "role = \"\"").unwrap();

        let err = ProfileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::ResolutionFailed { .. }));
    }
}

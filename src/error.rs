//! Error types for scoped property overrides
//!
//! This module defines all error types used throughout the crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for propscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error produced by a caller-supplied acquisition callback.
pub type AcquireError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for scoped override operations
#[derive(Debug, Error)]
pub enum Error {
    /// Override values could not be resolved from the supplied options.
    /// When this surfaces, no global mutation has occurred.
    #[error("Resolution failed for '{key}': {reason}")]
    ResolutionFailed {
        /// The option or property key that failed to resolve
        key: String,
        /// Why resolution failed
        reason: String,
    },

    /// The wrapped acquisition step failed. The pre-call property state
    /// has already been restored by the time this error surfaces.
    #[error("Acquisition failed: {0}")]
    AcquisitionFailed(#[source] AcquireError),

    /// A profile file could not be parsed or contained invalid settings
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// I/O error (profile file reads)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Construct a `ResolutionFailed` error for the given key.
    pub(crate) fn resolution(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ResolutionFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_resolution_failed() {
        let err = Error::resolution("member.role", "value must not be empty");
        let msg = err.to_string();
        assert!(msg.contains("Resolution failed"));
        assert!(msg.contains("member.role"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_error_display_acquisition_failed() {
        let inner: AcquireError = "cluster join refused".into();
        let err = Error::AcquisitionFailed(inner);
        let msg = err.to_string();
        assert!(msg.contains("Acquisition failed"));
        assert!(msg.contains("cluster join refused"));
    }

    #[test]
    fn test_error_display_invalid_profile() {
        let err = Error::InvalidProfile("unknown field 'durability'".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Invalid profile"));
        assert!(msg.contains("durability"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such profile");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_acquisition_failed_exposes_source() {
        use std::error::Error as _;
        let inner: AcquireError = "session layer unavailable".into();
        let err = Error::AcquisitionFailed(inner);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::InvalidProfile("test".to_string()))
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::resolution("cache.config.uri", "empty");
        match err {
            Error::ResolutionFailed { key, reason } => {
                assert_eq!(key, "cache.config.uri");
                assert_eq!(reason, "empty");
            }
            _ => panic!("Wrong error variant"),
        }
    }
}

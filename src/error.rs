//! Unified error types for the lexigrade engine.
//!
//! Validation, unsupported-type, and not-found errors are client errors:
//! they are recoverable at the request boundary and map to 4xx-style
//! responses. Storage and serialization errors are internal and must
//! propagate; a grading request is never reported as succeeded when a
//! persistence step failed, and there is no fallback-to-zero-score path.
//!
//! The one exception is the achievement read path: a corrupt unlocked-set
//! or a stale catalog reference must not crash grading, so that path uses
//! the [`FailOpen`] helper to log and continue with a safe default.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed submission or answer specification for an exercise type.
    #[error("invalid {kind} submission: {message}")]
    Validation { kind: String, message: String },

    /// Exercise type tag not in the fixed catalog of kinds.
    #[error("unsupported exercise type: {kind}")]
    UnsupportedType { kind: String },

    /// A referenced entity does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },

    /// I/O errors from the storage layer.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Create a validation error for a given exercise kind.
    pub fn validation(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported exercise type error.
    pub fn unsupported_type(kind: impl Into<String>) -> Self {
        Self::UnsupportedType { kind: kind.into() }
    }

    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            what: what.into(),
            id: id.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error is a client error, recoverable at the request
    /// boundary. Storage/serde/config errors are internal.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::UnsupportedType { .. } | Self::NotFound { .. }
        )
    }
}

impl From<io::Error> for EngineError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Fail-open error handling for the achievement read path.
///
/// An absent or corrupt unlocked-set must not fail the surrounding grading
/// operation: log a warning and continue with a safe default. This trait
/// is deliberately NOT used anywhere in the grading or XP mutation paths.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;

    /// Handle an error by logging a warning and returning the provided fallback.
    fn fail_open_with(self, context: &str, fallback: T) -> T;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }

    fn fail_open_with(self, context: &str, fallback: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using fallback)", context, err);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = EngineError::validation("fill_blank", "submission must be an array");
        assert_eq!(
            err.to_string(),
            "invalid fill_blank submission: submission must be an array"
        );
    }

    #[test]
    fn test_unsupported_type_error_display() {
        let err = EngineError::unsupported_type("crossword");
        assert_eq!(err.to_string(), "unsupported exercise type: crossword");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = EngineError::not_found("exercise", "ex-42");
        assert_eq!(err.to_string(), "exercise not found: ex-42");
    }

    #[test]
    fn test_storage_error_display() {
        let err = EngineError::storage(
            "/tmp/profiles/learner-1.json",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("storage error"));
        assert!(err.to_string().contains("learner-1.json"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(EngineError::validation("matching", "x").is_client_error());
        assert!(EngineError::unsupported_type("x").is_client_error());
        assert!(EngineError::not_found("profile", "x").is_client_error());

        assert!(!EngineError::serde("x").is_client_error());
        assert!(!EngineError::config("x").is_client_error());
        let io_err: EngineError = io::Error::new(io::ErrorKind::Other, "disk").into();
        assert!(!io_err.is_client_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::Storage { .. }));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Serde { .. }));
    }

    #[test]
    fn test_fail_open_default() {
        let result: Result<Vec<String>> = Err(EngineError::serde("corrupt"));
        let value = result.fail_open_default("reading unlocked achievements");
        assert!(value.is_empty());
    }

    #[test]
    fn test_fail_open_with() {
        let result: Result<u32> = Err(EngineError::serde("corrupt"));
        let value = result.fail_open_with("reading streak", 7);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_fail_open_passes_through_ok() {
        let result: Result<u32> = Ok(100);
        assert_eq!(result.fail_open_default("context"), 100);
    }
}

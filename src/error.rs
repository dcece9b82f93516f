//! Central error types for nin.
//!
//! All errors implement `Serialize` so desktop commands can return them
//! over Tauri IPC.

use serde::Serialize;
use thiserror::Error;

use crate::scenario::ScenarioFailure;

/// Main error type for nin operations.
#[derive(Error, Debug)]
pub enum NinError {
    /// The host event channel could not be attached
    #[error("Subscription unavailable: {0}")]
    SubscriptionUnavailable(String),

    /// A scenario run failed (timeout, assertion, automation)
    #[error(transparent)]
    Scenario(#[from] ScenarioFailure),

    /// Browser automation backend failed outside of a scenario run
    #[error("Automation error: {0}")]
    AutomationError(String),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Pointer (mouse) control failed
    #[error("Pointer error: {0}")]
    PointerError(String),

    /// The keyboard worker is gone or did not answer
    #[error("Host worker unavailable")]
    WorkerUnavailable,

    /// File system operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for NinError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for NinError {
    fn from(msg: String) -> Self {
        NinError::Other(msg)
    }
}

impl From<&str> for NinError {
    fn from(msg: &str) -> Self {
        NinError::Other(msg.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, NinResult};
///
/// fn load() -> NinResult<String> {
///     std::fs::read_to_string("runner.json").context("failed to read runner config")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to NinError::Other.
    fn context(self, msg: &str) -> NinResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> NinResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> NinResult<T> {
        self.map_err(|e| NinError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> NinResult<T> {
        self.map_err(|e| NinError::Other(format!("{}: {}", f(), e)))
    }
}

/// Type alias for Results using NinError.
pub type NinResult<T> = Result<T, NinError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::RunState;

    #[test]
    fn test_error_display() {
        let err = NinError::SubscriptionUnavailable("no host".to_string());
        assert_eq!(err.to_string(), "Subscription unavailable: no host");
    }

    #[test]
    fn test_error_serialization() {
        let err = NinError::WorkerUnavailable;
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Host worker unavailable\"");
    }

    #[test]
    fn test_scenario_failure_is_transparent() {
        let err: NinError = ScenarioFailure::Timeout {
            stage: RunState::WaitingForControl,
            timeout_ms: 500,
        }
        .into();
        assert!(matches!(err, NinError::Scenario(_)));
        let msg = err.to_string();
        assert!(msg.contains("WaitingForControl"), "{}", msg);
        assert!(msg.contains("500"), "{}", msg);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NinError = io_err.into();
        assert!(matches!(err, NinError::IoError(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let msg = result.context("operation failed").unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), &str> = Err("inner");
        let msg = result
            .with_context(|| format!("ctx-{}", 42))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("ctx-42"));
        assert!(msg.contains("inner"));
    }
}

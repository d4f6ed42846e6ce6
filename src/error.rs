//! Error types for backlog
//!
//! All modules use `BacklogResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for backlog operations
pub type BacklogResult<T> = Result<T, BacklogError>;

/// All errors that can occur in backlog
#[derive(Error, Debug)]
pub enum BacklogError {
    // Remote source errors
    #[error("Not found upstream: {url}")]
    SourceNotFound { url: String },

    #[error("Request to {url} failed with HTTP {status}")]
    SourceStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    SourceTransport { url: String, reason: String },

    #[error("Unexpected response from {url}: {reason}")]
    SourceDecode { url: String, reason: String },

    // Persisted state errors
    #[error("Corrupt cache state under key {key}: {reason}")]
    CorruptState { key: String, reason: String },

    // Input errors
    #[error("Unknown record kind: {0}. Expected scene or performer")]
    InvalidRecordKind(String),

    #[error("{action} is restricted to maintainers (current identity: {identity})")]
    NotMaintainer { action: String, identity: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl BacklogError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a corrupt state error for a store key
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a payload decode error
    pub fn decode(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceDecode {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// The remote source reported the record as gone (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }

    /// Transient source failures: the next lookup tries again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SourceStatus { .. } | Self::SourceTransport { .. } | Self::SourceDecode { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CorruptState { .. } => Some("Run: backlog clear --yes"),
            Self::NotMaintainer { .. } => {
                Some("Pass --user <name> or set maintenance.identity in the config")
            }
            Self::SourceTransport { .. } => Some("Check your network connection and retry"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BacklogError::InvalidRecordKind("studio".to_string());
        assert!(err.to_string().contains("Unknown record kind: studio"));
    }

    #[test]
    fn error_hint() {
        let err = BacklogError::corrupt("stashdb_backlog", "expected value");
        assert_eq!(err.hint(), Some("Run: backlog clear --yes"));
    }

    #[test]
    fn error_classification() {
        let transient = BacklogError::SourceStatus {
            url: "https://example.test/index.json".to_string(),
            status: 503,
        };
        let gone = BacklogError::SourceNotFound {
            url: "https://example.test/scenes/ab/abc.json".to_string(),
        };

        assert!(transient.is_retryable());
        assert!(!transient.is_not_found());
        assert!(gone.is_not_found());
        assert!(!gone.is_retryable());
    }
}

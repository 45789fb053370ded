//! Storage error types.

use soundshelf_shared::AppError;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Client-supplied path failed validation.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The rejected candidate.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Local directory or file could not be read.
    #[error("cannot access {path}: {source}")]
    NotAccessible {
        /// Location that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Object store listing or signing failed.
    #[error("storage backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Validated key does not name an existing audio file.
    #[error("file not found: {key}")]
    NotFound {
        /// Key that was not found.
        key: String,
    },

    /// Malformed structured input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Storage provider configuration error.
    #[error("storage configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    /// Create a not accessible error.
    #[must_use]
    pub fn not_accessible(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::NotAccessible {
            path: path.into(),
            source,
        }
    }

    /// Create a backend unavailable error.
    #[must_use]
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                key: err.to_string(),
            },
            _ => Self::BackendUnavailable(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let detail = err.to_string();
        match err {
            StorageError::InvalidPath { .. } => Self::InvalidPath(detail),
            StorageError::NotAccessible { .. } => Self::NotAccessible(detail),
            StorageError::BackendUnavailable(_) => Self::BackendUnavailable(detail),
            StorageError::NotFound { .. } => Self::NotFound(detail),
            StorageError::InvalidRequest(_) => Self::InvalidRequest(detail),
            StorageError::Configuration(_) => Self::Configuration(detail),
        }
    }
}

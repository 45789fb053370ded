//! Application-wide error types.

use thiserror::Error;

/// Client-facing message for directory access failures.
pub const TXT_ACC_DIR: &str = "Server is unable to access the directory.";
/// Client-facing message for an unreachable storage backend.
pub const TXT_NO_RES: &str = "Server not responding.";

/// Application error types.
///
/// The `Display` output carries internal detail and is meant for logs only;
/// responses use [`AppError::public_message`].
#[derive(Debug, Error)]
pub enum AppError {
    /// Client-supplied path failed normalization or containment.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Backend I/O failed (missing directory, permission denied).
    #[error("Not accessible: {0}")]
    NotAccessible(String),

    /// Storage backend could not be reached or refused the listing.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed structured input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPath(_) | Self::InvalidRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::BackendUnavailable(_) => 503,
            Self::NotAccessible(_) | Self::Configuration(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::NotAccessible(_) => "NOT_ACCESSIBLE",
            Self::BackendUnavailable(_) => "BACKEND_UNAVAILABLE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Returns a message safe to show to clients.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidPath(_) => "Invalid path",
            Self::NotAccessible(_) => TXT_ACC_DIR,
            Self::BackendUnavailable(_) => TXT_NO_RES,
            Self::NotFound(_) => "Not found",
            Self::InvalidRequest(_) => "Invalid request",
            Self::Configuration(_) => "Internal Server Error",
        }
    }
}

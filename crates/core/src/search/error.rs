//! Search error types.

use soundshelf_shared::AppError;
use thiserror::Error;

use crate::storage::StorageError;

/// Search operation errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Search term shorter than the minimum after trimming.
    #[error("Minimum search characters: {min}")]
    TermTooShort {
        /// Minimum number of characters.
        min: usize,
    },

    /// Scoping directory failed sanitization.
    #[error("invalid directory: {0}")]
    InvalidDirectory(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::TermTooShort { .. } => Self::InvalidRequest(err.to_string()),
            SearchError::InvalidDirectory(_) => Self::InvalidPath(err.to_string()),
            SearchError::Storage(e) => e.into(),
        }
    }
}

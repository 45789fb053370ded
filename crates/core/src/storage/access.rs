//! Retrieval URL resolution.
//!
//! Keys are validated here before any backend work; each backend then turns
//! a validated key into an [`AccessUrl`](super::AccessUrl).

use super::error::StorageError;
use super::path::RelativePath;

/// URL prefix under which the local backend serves file bytes.
pub const LOCAL_SERVE_PREFIX: &str = "/localdisk/";

/// Validate a client-supplied file key.
///
/// # Errors
///
/// Returns [`StorageError::InvalidRequest`] for an empty key and
/// [`StorageError::InvalidPath`] for a key that is absolute or contains a
/// `..` segment.
pub fn parse_key(raw: &str) -> Result<RelativePath, StorageError> {
    if raw.trim().is_empty() {
        return Err(StorageError::invalid_request("missing song path"));
    }
    let key = RelativePath::parse(raw)?;
    if key.is_root() {
        return Err(StorageError::invalid_path(raw, "does not name a file"));
    }
    Ok(key)
}

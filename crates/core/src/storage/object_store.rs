//! Object store backend using Apache OpenDAL.
//!
//! Directories are emulated with `/`-delimited key prefixes. A configured key
//! prefix scopes the whole collection; every path handed out by this backend
//! has that prefix stripped.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use opendal::{ErrorKind, Operator};
use tracing::debug;

use super::audio::is_audio_file;
use super::backend::{AccessUrl, BackendKind, DirectoryListing, StorageBackend, matches_term};
use super::error::StorageError;
use super::path::RelativePath;

const DELIMITER: char = '/';

/// Serves the collection from a bucket.
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    operator: Operator,
    prefix: String,
    presign_ttl: Duration,
}

impl ObjectStoreBackend {
    /// Create a backend over `operator`, scoped to `prefix`.
    ///
    /// A non-empty prefix is normalized to end with `/`.
    #[must_use]
    pub fn new(operator: Operator, prefix: &str, presign_ttl: Duration) -> Self {
        Self {
            operator,
            prefix: normalize_prefix(prefix),
            presign_ttl,
        }
    }

    /// Fully-qualified key for a file.
    fn key(&self, path: &RelativePath) -> String {
        format!("{}{}", self.prefix, path.as_str())
    }

    /// Fully-qualified listing prefix for a directory, always `/`-terminated
    /// (or empty at the bucket root).
    fn dir_key(&self, dir: &RelativePath) -> String {
        format!("{}{}", self.prefix, dir.dir_prefix())
    }

    /// One delimiter-based listing call.
    ///
    /// Common prefixes become directory names and objects directly under
    /// `dir_key` become file names, both with `dir_key` stripped. File names
    /// are not filtered.
    async fn list_level(&self, dir_key: &str) -> Result<DirectoryListing, StorageError> {
        let entries = self.operator.list(dir_key).await?;
        let mut listing = DirectoryListing::default();

        for entry in entries {
            let Some(name) = entry.path().strip_prefix(dir_key) else {
                continue;
            };
            if let Some(dir_name) = name.strip_suffix(DELIMITER) {
                if !dir_name.is_empty() && !dir_name.contains(DELIMITER) {
                    listing.dirs.push(dir_name.to_string());
                }
            } else if !name.is_empty() && !name.contains(DELIMITER) {
                listing.files.push(name.to_string());
            }
        }

        Ok(listing)
    }
}

/// Strip a leading `/` and make a non-empty prefix end with `/`.
fn normalize_prefix(prefix: &str) -> String {
    let prefix = prefix.trim().trim_start_matches(DELIMITER);
    if prefix.is_empty() || prefix.ends_with(DELIMITER) {
        prefix.to_string()
    } else {
        format!("{prefix}{DELIMITER}")
    }
}

#[async_trait]
impl StorageBackend for ObjectStoreBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ObjectStore
    }

    async fn list(&self, dir: &RelativePath) -> Result<DirectoryListing, StorageError> {
        let dir_key = self.dir_key(dir);
        let mut listing = self.list_level(&dir_key).await?;
        listing.files.retain(|name| is_audio_file(name));

        debug!(
            prefix = %dir_key,
            dirs = listing.dirs.len(),
            files = listing.files.len(),
            "Listed object store prefix"
        );
        Ok(listing)
    }

    async fn enumerate_audio(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError> {
        self.find_audio(dir, "", usize::MAX).await
    }

    async fn find_audio(
        &self,
        dir: &RelativePath,
        lc_term: &str,
        limit: usize,
    ) -> Result<Vec<String>, StorageError> {
        let dir_key = self.dir_key(dir);
        // Pages are fetched lazily, so stopping early skips the remaining pages.
        let mut lister = self.operator.lister_with(&dir_key).recursive(true).await?;

        let mut found = Vec::new();
        while found.len() < limit {
            let Some(entry) = lister.try_next().await? else {
                break;
            };
            let key = entry.path();
            if key.ends_with(DELIMITER) || !is_audio_file(key) {
                continue;
            }
            if let Some(rel) = key.strip_prefix(self.prefix.as_str())
                && matches_term(rel, lc_term)
            {
                found.push(rel.to_string());
            }
        }
        Ok(found)
    }

    async fn enumerate_dirs(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError> {
        let mut dirs = Vec::new();
        let mut stack = vec![dir.clone()];

        // One listing call per discovered prefix, depth-first in listing order.
        // Discovered names are store data, not client input, and are not re-parsed.
        while let Some(current) = stack.pop() {
            let listing = self.list_level(&self.dir_key(&current)).await?;
            for name in listing.dirs.iter().rev() {
                stack.push(current.join_child(name));
            }
            dirs.push(current.as_str().to_string());
        }

        Ok(dirs)
    }

    async fn exists(&self, path: &RelativePath) -> Result<bool, StorageError> {
        match self.operator.stat(&self.key(path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn access_url(&self, key: &RelativePath) -> Result<AccessUrl, StorageError> {
        // No existence check: a missing object surfaces when the client
        // dereferences the URL.
        let full_key = self.key(key);
        let presigned = self
            .operator
            .presign_read(&full_key, self.presign_ttl)
            .await
            .map_err(|e| StorageError::backend_unavailable(format!("presign {full_key}: {e}")))?;

        Ok(AccessUrl::Presigned {
            url: presigned.uri().to_string(),
            expires_at: Utc::now()
                + chrono::Duration::seconds(
                    i64::try_from(self.presign_ttl.as_secs()).unwrap_or(i64::MAX),
                ),
        })
    }
}

//! The listing contract shared by the local and object-store backends.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StorageError;
use super::path::RelativePath;

/// Which backend is serving the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Local filesystem root.
    Local,
    /// Object store bucket and prefix.
    ObjectStore,
}

impl BackendKind {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::ObjectStore => "object_store",
        }
    }
}

/// One level of a directory: child directory names and audio file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    /// Child directory names, never containing a slash.
    pub dirs: Vec<String>,
    /// Child audio file names.
    pub files: Vec<String>,
}

impl DirectoryListing {
    /// Sort both lists in place.
    pub fn sort(&mut self) {
        self.dirs.sort();
        self.files.sort();
    }
}

/// Case-insensitive substring test; `lc_term` must already be lower-case.
///
/// The empty term matches everything.
#[must_use]
pub fn matches_term(candidate: &str, lc_term: &str) -> bool {
    candidate.to_lowercase().contains(lc_term)
}

/// A client-usable retrieval URL for one audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessUrl {
    /// Path served by this process from the local root. Never expires.
    Local {
        /// Server-relative URL.
        url: String,
    },
    /// Time-limited signed URL issued by the object store.
    Presigned {
        /// The presigned URL.
        url: String,
        /// When the URL expires.
        expires_at: DateTime<Utc>,
    },
}

impl AccessUrl {
    /// Returns the URL string.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Local { url } | Self::Presigned { url, .. } => url,
        }
    }
}

/// Storage backend trait.
///
/// All paths handed to a backend are already validated. Enumerations return
/// paths relative to the storage root, in backend walk order; the root
/// directory is reported as `""`.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> BackendKind;

    /// List one level of `dir`.
    async fn list(&self, dir: &RelativePath) -> Result<DirectoryListing, StorageError>;

    /// Every audio file below `dir`, recursively.
    async fn enumerate_audio(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError>;

    /// Audio files below `dir` whose path contains `lc_term`, at most `limit`.
    ///
    /// The walk stops as soon as `limit` matches are collected, so nothing
    /// past the last match is read.
    async fn find_audio(
        &self,
        dir: &RelativePath,
        lc_term: &str,
        limit: usize,
    ) -> Result<Vec<String>, StorageError>;

    /// `dir` itself followed by every directory below it, recursively.
    async fn enumerate_dirs(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError>;

    /// Whether `path` names an existing file.
    async fn exists(&self, path: &RelativePath) -> Result<bool, StorageError>;

    /// Produce a retrieval URL for the audio file at `key`.
    async fn access_url(&self, key: &RelativePath) -> Result<AccessUrl, StorageError>;

    /// Absolute location of a servable audio file, for backends that hand
    /// out bytes themselves.
    async fn local_file(&self, key: &RelativePath) -> Result<PathBuf, StorageError> {
        Err(StorageError::not_found(key.as_str()))
    }
}

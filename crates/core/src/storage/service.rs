//! Backend-agnostic storage facade.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use opendal::{Operator, services};
use tracing::{error, info};

use super::access::parse_key;
use super::backend::{AccessUrl, BackendKind, DirectoryListing, StorageBackend};
use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::local::LocalBackend;
use super::object_store::ObjectStoreBackend;
use super::path::RelativePath;

/// Storage service for browsing the music collection.
///
/// Holds exactly one backend, chosen once from configuration. All client
/// paths are validated here before the backend is consulted.
#[derive(Clone)]
pub struct StorageService {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("backend", &self.backend.kind())
            .finish()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let backend = Self::create_backend(config)?;
        info!(
            provider = config.provider.name(),
            backend = backend.kind().name(),
            "Storage backend selected"
        );
        Ok(Self { backend })
    }

    /// Create a storage service over an existing backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Build the backend for the configured provider.
    fn create_backend(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>, StorageError> {
        match &config.provider {
            StorageProvider::LocalFs { root } => Ok(Arc::new(LocalBackend::new(root)?)),
            StorageProvider::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                prefix,
            } => {
                let mut builder = services::S3::default().bucket(bucket).region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(key) = access_key_id {
                    builder = builder.access_key_id(key);
                }
                if let Some(secret) = secret_access_key {
                    builder = builder.secret_access_key(secret);
                }

                let operator = Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish();

                Ok(Arc::new(ObjectStoreBackend::new(
                    operator,
                    prefix,
                    Duration::from_secs(config.presign_ttl_secs),
                )))
            }
        }
    }

    /// Which backend is active.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// List one level of `dir`, both lists sorted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for a rejected path, otherwise the backend error.
    pub async fn list_directory(&self, dir: &str) -> Result<DirectoryListing, StorageError> {
        let path = RelativePath::parse(dir)?;
        let mut listing = self
            .backend
            .list(&path)
            .await
            .inspect_err(|e| error!(error = %e, dir = %dir, "Failed to list directory"))?;
        listing.sort();
        Ok(listing)
    }

    /// Every audio file below `dir`, in backend walk order.
    ///
    /// # Errors
    ///
    /// Returns the backend error; there are no partial results.
    pub async fn enumerate_audio(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError> {
        self.backend
            .enumerate_audio(dir)
            .await
            .inspect_err(|e| error!(error = %e, dir = %dir, "Failed to scan audio files"))
    }

    /// Up to `limit` audio files below `dir` whose path contains `lc_term`.
    ///
    /// The backend stops walking at the limit; matches keep walk order.
    ///
    /// # Errors
    ///
    /// Returns the backend error; there are no partial results.
    pub async fn find_audio(
        &self,
        dir: &RelativePath,
        lc_term: &str,
        limit: usize,
    ) -> Result<Vec<String>, StorageError> {
        self.backend
            .find_audio(dir, lc_term, limit)
            .await
            .inspect_err(|e| error!(error = %e, dir = %dir, "Failed to search audio files"))
    }

    /// Every directory in the collection, the root (`""`) first.
    ///
    /// # Errors
    ///
    /// Returns the backend error; there are no partial results.
    pub async fn enumerate_dirs(&self) -> Result<Vec<String>, StorageError> {
        self.backend
            .enumerate_dirs(&RelativePath::root())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to scan directories"))
    }

    /// Every audio file below `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` for a rejected path, otherwise the backend error.
    pub async fn list_all_audio(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let path = RelativePath::parse(dir)?;
        let mut files = self.enumerate_audio(&path).await?;
        files.sort();
        Ok(files)
    }

    /// De-duplicated, sorted union of [`Self::list_all_audio`] over `dirs`.
    ///
    /// # Errors
    ///
    /// Fails on the first directory that is rejected or cannot be scanned.
    pub async fn list_all_audio_across(&self, dirs: &[String]) -> Result<Vec<String>, StorageError> {
        let mut union = BTreeSet::new();
        for dir in dirs {
            let path = RelativePath::parse(dir)?;
            union.extend(self.enumerate_audio(&path).await?);
        }
        Ok(union.into_iter().collect())
    }

    /// Every directory, root first and the rest sorted.
    ///
    /// # Errors
    ///
    /// Returns the backend error.
    pub async fn list_all_directories(&self) -> Result<Vec<String>, StorageError> {
        let mut dirs = self.enumerate_dirs().await?;
        if dirs.len() > 1 {
            dirs[1..].sort();
        }
        Ok(dirs)
    }

    /// Resolve a retrieval URL for the audio file at `key`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`/`InvalidRequest` before any backend work for a
    /// rejected key, `NotFound` if a local file is missing, or
    /// `BackendUnavailable` if the store cannot sign the URL.
    pub async fn resolve_access_url(&self, key: &str) -> Result<AccessUrl, StorageError> {
        let key = parse_key(key)?;
        self.backend
            .access_url(&key)
            .await
            .inspect_err(|e| error!(error = %e, key = %key, "Failed to resolve access URL"))
    }

    /// Absolute path of a locally served audio file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`/`InvalidRequest` for a rejected key and
    /// `NotFound` if the file does not exist or the backend does not serve
    /// bytes itself.
    pub async fn local_file(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key = parse_key(key)?;
        self.backend.local_file(&key).await
    }
}

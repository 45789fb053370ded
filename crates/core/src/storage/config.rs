//! Storage configuration types.

use std::path::PathBuf;

use soundshelf_shared::StorageSettings;

use super::error::StorageError;

/// Storage provider configuration.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// Local filesystem directory.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO
    S3 {
        /// S3 bucket name.
        bucket: String,
        /// AWS region.
        region: String,
        /// Custom endpoint URL.
        endpoint: Option<String>,
        /// Access key ID.
        access_key_id: Option<String>,
        /// Secret access key.
        secret_access_key: Option<String>,
        /// Key prefix of the collection.
        prefix: String,
    },
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Create S3-compatible provider using the ambient credential chain.
    #[must_use]
    pub fn s3(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            prefix: String::new(),
        }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LocalFs { .. } => "local",
            Self::S3 { .. } => "s3",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Presigned retrieval URL TTL in seconds (default: 900 = 15 minutes).
    pub presign_ttl_secs: u64,
}

impl StorageConfig {
    /// Default retrieval TTL: 15 minutes.
    pub const DEFAULT_PRESIGN_TTL: u64 = StorageSettings::DEFAULT_PRESIGN_TTL;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            presign_ttl_secs: Self::DEFAULT_PRESIGN_TTL,
        }
    }

    /// Set presigned retrieval URL TTL.
    #[must_use]
    pub fn with_presign_ttl(mut self, secs: u64) -> Self {
        self.presign_ttl_secs = secs;
        self
    }

    /// Select the provider from application settings.
    ///
    /// A configured music directory wins; otherwise a bucket and region are
    /// required.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither backend is fully configured.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(String::from);

        let provider = if let Some(root) = settings.music_dir() {
            StorageProvider::local_fs(root)
        } else {
            let bucket = non_empty(&settings.bucket).ok_or_else(|| {
                StorageError::configuration("BUCKET must be set when MUSIC_DIR is not")
            })?;
            let region = non_empty(&settings.region).ok_or_else(|| {
                StorageError::configuration(
                    "object store region could not be found; set AWS_REGION",
                )
            })?;
            StorageProvider::S3 {
                bucket,
                region,
                endpoint: non_empty(&settings.endpoint),
                access_key_id: non_empty(&settings.access_key_id),
                secret_access_key: non_empty(&settings.secret_access_key),
                prefix: settings.prefix.clone(),
            }
        };

        Ok(Self::new(provider).with_presign_ttl(settings.presign_ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_dir_selects_local() {
        let settings = StorageSettings {
            music_dir: Some(PathBuf::from("/mp3")),
            bucket: Some("ignored".into()),
            ..StorageSettings::default()
        };
        let config = StorageConfig::from_settings(&settings).expect("config");
        assert_eq!(config.provider.name(), "local");
    }

    #[test]
    fn test_bucket_selects_s3() {
        let settings = StorageSettings {
            bucket: Some("music".into()),
            region: Some("us-east-1".into()),
            prefix: "library".into(),
            presign_ttl_secs: 600,
            ..StorageSettings::default()
        };
        let config = StorageConfig::from_settings(&settings).expect("config");
        assert_eq!(config.provider.name(), "s3");
        assert_eq!(config.presign_ttl_secs, 600);
        let StorageProvider::S3 { bucket, prefix, .. } = config.provider else {
            panic!("expected s3 provider");
        };
        assert_eq!(bucket, "music");
        assert_eq!(prefix, "library");
    }

    #[test]
    fn test_missing_bucket_is_configuration_error() {
        let err = StorageConfig::from_settings(&StorageSettings::default()).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_missing_region_is_configuration_error() {
        let settings = StorageSettings {
            bucket: Some("music".into()),
            ..StorageSettings::default()
        };
        let err = StorageConfig::from_settings(&settings).unwrap_err();
        assert!(matches!(err, StorageError::Configuration(_)));
    }

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::s3("music", "auto"));
        assert_eq!(config.presign_ttl_secs, StorageConfig::DEFAULT_PRESIGN_TTL);
        assert_eq!(config.presign_ttl_secs, 900);
    }
}

//! Application configuration management.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variables honored for compatibility with older deployments.
///
/// Each maps onto a `storage.*` key and wins over every other source.
const LEGACY_ENV_VARS: [(&str, &str); 5] = [
    ("MUSIC_DIR", "storage.music_dir"),
    ("BUCKET", "storage.bucket"),
    ("AWS_REGION", "storage.region"),
    ("S3_PREFIX", "storage.prefix"),
    ("S3_ENDPOINT", "storage.endpoint"),
];

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage configuration.
///
/// A configured `music_dir` selects the local filesystem backend; otherwise
/// the object store described by `bucket`/`region`/`prefix` is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Local music root directory.
    pub music_dir: Option<PathBuf>,
    /// Object store bucket name.
    pub bucket: Option<String>,
    /// Object store region.
    pub region: Option<String>,
    /// Custom S3-compatible endpoint.
    pub endpoint: Option<String>,
    /// Key prefix under which the music collection lives.
    pub prefix: String,
    /// Access key ID. Falls back to the ambient credential chain when unset.
    pub access_key_id: Option<String>,
    /// Secret access key.
    pub secret_access_key: Option<String>,
    /// Lifetime of presigned retrieval URLs in seconds.
    pub presign_ttl_secs: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            music_dir: None,
            bucket: None,
            region: None,
            endpoint: None,
            prefix: String::new(),
            access_key_id: None,
            secret_access_key: None,
            presign_ttl_secs: Self::DEFAULT_PRESIGN_TTL,
        }
    }
}

impl StorageSettings {
    /// Default presigned URL lifetime: 15 minutes.
    pub const DEFAULT_PRESIGN_TTL: u64 = 900;

    /// Returns the local music root, treating an empty path as unset.
    #[must_use]
    pub fn music_dir(&self) -> Option<&Path> {
        self.music_dir
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SOUNDSHELF").separator("__"));

        for (var, key) in LEGACY_ENV_VARS {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 7] = [
        "MUSIC_DIR",
        "BUCKET",
        "AWS_REGION",
        "S3_PREFIX",
        "S3_ENDPOINT",
        "SOUNDSHELF__STORAGE__MUSIC_DIR",
        "SOUNDSHELF__SERVER__PORT",
    ];

    fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
        ALL_VARS.iter().map(|v| (*v, None)).collect()
    }

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars(cleared(), || {
            let config = AppConfig::load().expect("should load");
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.server.port, 8080);
            assert!(config.storage.music_dir().is_none());
            assert_eq!(
                config.storage.presign_ttl_secs,
                StorageSettings::DEFAULT_PRESIGN_TTL
            );
        });
    }

    #[test]
    fn test_legacy_music_dir_selects_local() {
        let mut vars = cleared();
        vars.push(("MUSIC_DIR", Some("/mp3")));
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("should load");
            assert_eq!(config.storage.music_dir(), Some(Path::new("/mp3")));
        });
    }

    #[test]
    fn test_empty_legacy_var_is_ignored() {
        let mut vars = cleared();
        vars.push(("MUSIC_DIR", Some("")));
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("should load");
            assert!(config.storage.music_dir().is_none());
        });
    }

    #[test]
    fn test_prefixed_env_vars() {
        let mut vars = cleared();
        vars.push(("SOUNDSHELF__SERVER__PORT", Some("9000")));
        vars.push(("BUCKET", Some("music")));
        vars.push(("AWS_REGION", Some("eu-west-1")));
        vars.push(("S3_PREFIX", Some("library")));
        temp_env::with_vars(vars, || {
            let config = AppConfig::load().expect("should load");
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.storage.bucket.as_deref(), Some("music"));
            assert_eq!(config.storage.region.as_deref(), Some("eu-west-1"));
            assert_eq!(config.storage.prefix, "library");
        });
    }

    #[test]
    fn test_empty_music_dir_is_not_local() {
        let settings = StorageSettings {
            music_dir: Some(PathBuf::new()),
            ..StorageSettings::default()
        };
        assert!(settings.music_dir().is_none());
    }
}

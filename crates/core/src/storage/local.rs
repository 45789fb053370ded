//! Local filesystem backend.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, task};
use tracing::debug;
use walkdir::WalkDir;

use super::access::LOCAL_SERVE_PREFIX;
use super::audio::is_audio_file;
use super::backend::{AccessUrl, BackendKind, DirectoryListing, StorageBackend, matches_term};
use super::error::StorageError;
use super::path::{PathGuard, RelativePath};

/// Serves the collection from a directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    guard: PathGuard,
}

impl LocalBackend {
    /// Create a backend rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root cannot be made absolute.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let guard = PathGuard::new(root)?;
        debug!(root = %guard.root().display(), "Local backend rooted");
        Ok(Self { guard })
    }

    /// Depth-first pre-order walk of `base` in name order, on the blocking pool.
    ///
    /// Entries are reported relative to the root. `keep` receives each path
    /// and whether it is a directory; the walk stops once `limit` entries are
    /// kept. Symlinked directories are not followed. Any walk error aborts.
    async fn scan<F>(
        &self,
        base: PathBuf,
        limit: usize,
        keep: F,
    ) -> Result<Vec<String>, StorageError>
    where
        F: Fn(&str, bool) -> bool + Send + 'static,
    {
        let guard = self.guard.clone();
        let context = base.display().to_string();

        task::spawn_blocking(move || -> Result<Vec<String>, StorageError> {
            let mut kept = Vec::new();
            if limit == 0 {
                return Ok(kept);
            }

            for entry in WalkDir::new(&base).sort_by_file_name() {
                let entry = entry.map_err(|e| walk_error(&base, e))?;
                let Some(rel) = guard.relative_to_root(entry.path()) else {
                    continue;
                };
                if keep(&rel, entry.file_type().is_dir()) {
                    kept.push(rel);
                    if kept.len() >= limit {
                        break;
                    }
                }
            }
            Ok(kept)
        })
        .await
        .map_err(|e| StorageError::not_accessible(context, io::Error::other(e)))?
    }

    async fn is_file(path: &Path) -> Result<bool, StorageError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::not_accessible(path.display().to_string(), e)),
        }
    }
}

fn walk_error(base: &Path, err: walkdir::Error) -> StorageError {
    let path = err.path().unwrap_or(base).display().to_string();
    StorageError::not_accessible(path, io::Error::from(err))
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn list(&self, dir: &RelativePath) -> Result<DirectoryListing, StorageError> {
        let base = self.guard.resolve(dir)?;
        let context = || base.display().to_string();
        let mut entries = fs::read_dir(&base)
            .await
            .map_err(|e| StorageError::not_accessible(context(), e))?;

        let mut listing = DirectoryListing::default();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::not_accessible(context(), e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::not_accessible(entry.path().display().to_string(), e))?;

            if file_type.is_dir() {
                listing.dirs.push(name);
            } else if is_audio_file(&name) {
                listing.files.push(name);
            }
        }

        debug!(
            dir = %dir,
            dirs = listing.dirs.len(),
            files = listing.files.len(),
            "Listed local directory"
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
        let base = self.guard.resolve(dir)?;
        let term = lc_term.to_string();
        self.scan(base, limit, move |rel, is_dir| {
            !is_dir && is_audio_file(rel) && matches_term(rel, &term)
        })
        .await
    }

    async fn enumerate_dirs(&self, dir: &RelativePath) -> Result<Vec<String>, StorageError> {
        let base = self.guard.resolve(dir)?;
        self.scan(base, usize::MAX, |_, is_dir| is_dir).await
    }

    async fn exists(&self, path: &RelativePath) -> Result<bool, StorageError> {
        let resolved = self.guard.resolve(path)?;
        Self::is_file(&resolved).await
    }

    async fn access_url(&self, key: &RelativePath) -> Result<AccessUrl, StorageError> {
        self.local_file(key).await?;
        Ok(AccessUrl::Local {
            url: format!("{LOCAL_SERVE_PREFIX}{key}"),
        })
    }

    async fn local_file(&self, key: &RelativePath) -> Result<PathBuf, StorageError> {
        if key.is_root() || !is_audio_file(key.as_str()) {
            return Err(StorageError::not_found(key.as_str()));
        }

        let resolved = self.guard.resolve(key)?;
        if Self::is_file(&resolved).await? {
            Ok(resolved)
        } else {
            Err(StorageError::not_found(key.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, b"data").expect("write file");
    }

    fn fixture() -> (TempDir, LocalBackend) {
        let dir = TempDir::new().expect("temp dir");
        touch(dir.path(), "song1.mp3");
        touch(dir.path(), "song2.wav");
        touch(dir.path(), "readme.txt");
        touch(dir.path(), "artist1/album1/track1.mp3");
        touch(dir.path(), "artist1/album1/cover.jpg");
        touch(dir.path(), "artist1/track2.OGG");
        std::fs::create_dir_all(dir.path().join("artist2")).expect("mkdir");
        let backend = LocalBackend::new(dir.path()).expect("backend");
        (dir, backend)
    }

    fn rel(s: &str) -> RelativePath {
        RelativePath::parse(s).expect("valid path")
    }

    #[tokio::test]
    async fn test_list_root() {
        let (_dir, backend) = fixture();
        let mut listing = backend.list(&RelativePath::root()).await.expect("list");
        listing.sort();

        assert_eq!(listing.dirs, vec!["artist1", "artist2"]);
        assert_eq!(listing.files, vec!["song1.mp3", "song2.wav"]);
    }

    #[tokio::test]
    async fn test_list_subdirectory() {
        let (_dir, backend) = fixture();
        let listing = backend.list(&rel("artist1")).await.expect("list");

        assert_eq!(listing.dirs, vec!["album1"]);
        assert_eq!(listing.files, vec!["track2.OGG"]);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_not_accessible() {
        let (_dir, backend) = fixture();
        let err = backend.list(&rel("nope")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotAccessible { .. }));
    }

    #[tokio::test]
    async fn test_enumerate_audio_recursive_in_walk_order() {
        let (_dir, backend) = fixture();
        let files = backend
            .enumerate_audio(&RelativePath::root())
            .await
            .expect("enumerate");

        assert_eq!(
            files,
            vec![
                "artist1/album1/track1.mp3",
                "artist1/track2.OGG",
                "song1.mp3",
                "song2.wav",
            ]
        );
    }

    #[tokio::test]
    async fn test_enumerate_audio_scoped() {
        let (_dir, backend) = fixture();
        let files = backend
            .enumerate_audio(&rel("artist1/album1"))
            .await
            .expect("enumerate");
        assert_eq!(files, vec!["artist1/album1/track1.mp3"]);
    }

    #[tokio::test]
    async fn test_enumerate_audio_missing_dir_fails() {
        let (_dir, backend) = fixture();
        let err = backend.enumerate_audio(&rel("ghost")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotAccessible { .. }));
    }

    #[tokio::test]
    async fn test_enumerate_dirs_root_first() {
        let (_dir, backend) = fixture();
        let dirs = backend
            .enumerate_dirs(&RelativePath::root())
            .await
            .expect("enumerate");
        assert_eq!(dirs, vec!["", "artist1", "artist1/album1", "artist2"]);
    }

    #[tokio::test]
    async fn test_exists() {
        let (_dir, backend) = fixture();
        assert!(backend.exists(&rel("song1.mp3")).await.expect("stat"));
        assert!(!backend.exists(&rel("missing.mp3")).await.expect("stat"));
        assert!(!backend.exists(&rel("artist1")).await.expect("stat"));
    }

    #[tokio::test]
    async fn test_access_url_is_local_path() {
        let (_dir, backend) = fixture();
        let url = backend
            .access_url(&rel("artist1/album1/track1.mp3"))
            .await
            .expect("url");
        assert_eq!(
            url,
            AccessUrl::Local {
                url: "/localdisk/artist1/album1/track1.mp3".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_access_url_missing_or_non_audio() {
        let (_dir, backend) = fixture();
        let err = backend.access_url(&rel("missing.mp3")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        let err = backend.access_url(&rel("readme.txt")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_local_file_resolves_under_root() {
        let (_dir, backend) = fixture();
        let path = backend.local_file(&rel("song1.mp3")).await.expect("file");
        assert!(path.starts_with(backend.guard.root()));
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_sibling_directory_is_not_reachable() {
        let parent = TempDir::new().expect("temp dir");
        touch(parent.path(), "music/a.mp3");
        touch(parent.path(), "music-private/b.mp3");
        let backend = LocalBackend::new(parent.path().join("music")).expect("backend");

        let files = backend
            .enumerate_audio(&RelativePath::root())
            .await
            .expect("enumerate");
        assert_eq!(files, vec!["a.mp3"]);
    }

    #[tokio::test]
    async fn test_find_audio_stops_at_limit_in_walk_order() {
        let (_dir, backend) = fixture();
        let first = backend
            .find_audio(&RelativePath::root(), "", 2)
            .await
            .expect("find");
        assert_eq!(first, vec!["artist1/album1/track1.mp3", "artist1/track2.OGG"]);

        let none = backend
            .find_audio(&RelativePath::root(), "", 0)
            .await
            .expect("find");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_find_audio_filters_by_term() {
        let (_dir, backend) = fixture();
        let hits = backend
            .find_audio(&RelativePath::root(), "track", 10)
            .await
            .expect("find");
        assert_eq!(hits, vec!["artist1/album1/track1.mp3", "artist1/track2.OGG"]);

        let scoped = backend
            .find_audio(&rel("artist1/album1"), "song", 10)
            .await
            .expect("find");
        assert!(scoped.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_backslash_directory_is_browsable() {
        let (dir, backend) = fixture();
        touch(dir.path(), "AC\\DC/b.mp3");

        let dirs = backend
            .enumerate_dirs(&RelativePath::root())
            .await
            .expect("enumerate");
        assert!(dirs.contains(&"AC\\DC".to_string()));

        let listing = backend.list(&rel("AC\\DC")).await.expect("list");
        assert_eq!(listing.files, vec!["b.mp3"]);
    }
}

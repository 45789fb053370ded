//! Client path validation and containment.
//!
//! Every client-supplied location is parsed into a [`RelativePath`] before any
//! backend sees it. A parsed `RelativePath` never starts with `/`, never
//! contains a `..` segment and is stored in a canonical `a/b/c` form.
//! [`PathGuard::resolve`] still checks every segment, since backends build
//! child paths from names they discovered themselves.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::error::StorageError;

/// A validated, slash-separated location under the storage root.
///
/// The empty path denotes the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// The root location.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a client-supplied candidate.
    ///
    /// Empty and `.` segments are collapsed and a trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidPath`] if the candidate is absolute,
    /// contains a `..` segment or a NUL byte. Backslashes are ordinary name
    /// characters.
    pub fn parse(candidate: &str) -> Result<Self, StorageError> {
        if candidate.starts_with('/') {
            return Err(StorageError::invalid_path(candidate, "absolute path"));
        }
        if candidate.contains('\0') {
            return Err(StorageError::invalid_path(candidate, "forbidden character"));
        }

        let mut segments = Vec::new();
        for segment in candidate.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(StorageError::invalid_path(candidate, "parent traversal"));
                }
                s => segments.push(s),
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the canonical string form (`""` for the root).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the root location.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the path as a directory prefix: `""` for the root, `"a/b/"` otherwise.
    #[must_use]
    pub fn dir_prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            format!("{}/", self.0)
        }
    }

    /// Append a name reported by a backend listing, without re-validating it.
    ///
    /// A bad name from storage must not abort a whole enumeration; anything
    /// that reaches the local filesystem goes through [`PathGuard::resolve`].
    #[must_use]
    pub(crate) fn join_child(&self, name: &str) -> Self {
        Self(format!("{}{name}", self.dir_prefix()))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolves relative paths against a fixed local root.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Create a guard for `root`, made absolute against the working directory.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the root cannot be made absolute.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = std::path::absolute(root.as_ref()).map_err(|e| {
            StorageError::configuration(format!(
                "cannot resolve music root {}: {e}",
                root.as_ref().display()
            ))
        })?;
        Ok(Self {
            root: normalize_lexically(&root),
        })
    }

    /// Returns the absolute root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a validated path to an absolute location under the root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidPath`] if a segment is not a plain file
    /// name on this platform or the joined location is not contained in the
    /// root.
    pub fn resolve(&self, path: &RelativePath) -> Result<PathBuf, StorageError> {
        let mut resolved = self.root.clone();
        for segment in path.segments() {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(name)), None) => resolved.push(name),
                _ => return Err(StorageError::invalid_path(path.as_str(), "not a file name")),
            }
        }

        // Component-wise containment; a sibling such as `/music-old` does not
        // pass for a root of `/music`.
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(StorageError::invalid_path(path.as_str(), "escapes root"))
        }
    }

    /// Express an absolute location under the root as a slash-separated
    /// relative path. Returns `None` for locations outside the root.
    #[must_use]
    pub fn relative_to_root(&self, path: &Path) -> Option<String> {
        let rest = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<_> = rest
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(segments.join("/"))
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

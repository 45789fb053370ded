//! Search data types.

use serde::{Deserialize, Serialize};

/// A search hit enriched with display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Path relative to the collection root.
    pub path: String,
    /// File name without extension, underscores shown as spaces.
    pub title: String,
    /// Parent directory with a trailing slash, or `""` at the root.
    pub dir: String,
}

impl SearchMatch {
    /// Derive the display fields for `path`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let (dir, base) = match path.rfind('/') {
            Some(i) => (&path[..=i], &path[i + 1..]),
            None => ("", path),
        };
        let stem = base.rfind('.').map_or(base, |i| &base[..i]);

        Self {
            path: path.to_string(),
            title: stem.replace('_', " "),
            dir: dir.to_string(),
        }
    }
}

/// Request payload for a scoped search.
///
/// Encoded as `{"dir":"A/B/","term":"query","limit":200}`; every field is
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchWithinRequest {
    /// Directory to search below.
    pub dir: String,
    /// Search term.
    pub term: String,
    /// Maximum matches; non-positive means the default.
    pub limit: i64,
}

/// Result of a scoped search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchWithinResult {
    /// Matches in enumeration order.
    pub matches: Vec<SearchMatch>,
    /// Number of matches.
    pub count: usize,
}

impl SearchWithinResult {
    /// Wrap collected matches.
    #[must_use]
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        let count = matches.len();
        Self { matches, count }
    }
}

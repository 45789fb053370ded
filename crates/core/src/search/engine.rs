//! Search engine implementation.

use std::sync::Arc;

use tracing::debug;

use super::error::SearchError;
use super::types::{SearchMatch, SearchWithinRequest, SearchWithinResult};
use crate::storage::{self, RelativePath, StorageService};

/// Minimum number of non-whitespace characters in a search term.
pub const MIN_SEARCH_CHARS: usize = 1;
/// Cap on title and directory search results.
pub const MAX_SEARCH_RESULTS: usize = 100;
/// Scoped search limit when none is given.
pub const DEFAULT_WITHIN_LIMIT: usize = 200;
/// Hard cap on the scoped search limit.
pub const MAX_WITHIN_LIMIT: usize = 1000;

/// Searches file and directory names produced by the storage service.
///
/// Every query re-enumerates the backend; nothing is cached.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    storage: Arc<StorageService>,
}

impl SearchEngine {
    /// Create a new search engine.
    #[must_use]
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }

    /// Trim `term` and enforce the minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::TermTooShort`] for blank terms.
    pub fn validate_term(term: &str) -> Result<&str, SearchError> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_CHARS {
            return Err(SearchError::TermTooShort {
                min: MIN_SEARCH_CHARS,
            });
        }
        Ok(term)
    }

    /// Case-insensitive substring test; `lc_term` must already be lower-case.
    #[must_use]
    pub fn matches_term(candidate: &str, lc_term: &str) -> bool {
        storage::matches_term(candidate, lc_term)
    }

    /// Clamp a requested scoped-search limit.
    #[must_use]
    pub fn clamp_limit(requested: i64) -> usize {
        if requested <= 0 {
            DEFAULT_WITHIN_LIMIT
        } else {
            usize::try_from(requested).map_or(MAX_WITHIN_LIMIT, |n| n.min(MAX_WITHIN_LIMIT))
        }
    }

    /// Sanitize the scoping directory of a scoped search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidDirectory`] if the directory contains a
    /// `..` segment or is otherwise not a valid relative path.
    pub fn sanitize_dir(raw: &str) -> Result<RelativePath, SearchError> {
        let dir = raw.trim();
        let dir = dir.strip_prefix('/').unwrap_or(dir);
        RelativePath::parse(dir).map_err(|_| SearchError::InvalidDirectory(raw.to_string()))
    }

    /// Audio files anywhere in the collection whose path contains `term`.
    ///
    /// Sorted, then truncated to [`MAX_SEARCH_RESULTS`].
    ///
    /// # Errors
    ///
    /// Returns an error for a blank term or a failed enumeration.
    pub async fn search_titles(&self, term: &str) -> Result<Vec<String>, SearchError> {
        let lc_term = Self::validate_term(term)?.to_lowercase();
        let files = self.storage.enumerate_audio(&RelativePath::root()).await?;

        let mut titles: Vec<String> = files
            .into_iter()
            .filter(|f| Self::matches_term(f, &lc_term))
            .collect();
        titles.sort();
        titles.truncate(MAX_SEARCH_RESULTS);

        debug!(term = %lc_term, results = titles.len(), "Title search");
        Ok(titles)
    }

    /// Directories whose path contains `term`, each with a trailing slash.
    ///
    /// Sorted, then truncated to [`MAX_SEARCH_RESULTS`].
    ///
    /// # Errors
    ///
    /// Returns an error for a blank term or a failed enumeration.
    pub async fn search_directories(&self, term: &str) -> Result<Vec<String>, SearchError> {
        let lc_term = Self::validate_term(term)?.to_lowercase();
        let dirs = self.storage.enumerate_dirs().await?;

        let mut matches: Vec<String> = dirs
            .into_iter()
            .filter(|d| Self::matches_term(d, &lc_term))
            .map(|d| format!("{d}/"))
            .collect();
        matches.sort();
        matches.truncate(MAX_SEARCH_RESULTS);

        debug!(term = %lc_term, results = matches.len(), "Directory search");
        Ok(matches)
    }

    /// Audio files below `request.dir` whose path contains `request.term`.
    ///
    /// The backend stops walking as soon as the clamped limit is reached, so
    /// matches come in enumeration order rather than sorted.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank term, a rejected directory or a failed
    /// enumeration.
    pub async fn search_within(
        &self,
        request: &SearchWithinRequest,
    ) -> Result<SearchWithinResult, SearchError> {
        let lc_term = Self::validate_term(&request.term)?.to_lowercase();
        let dir = Self::sanitize_dir(&request.dir)?;
        let limit = Self::clamp_limit(request.limit);

        let files = self.storage.find_audio(&dir, &lc_term, limit).await?;
        let matches: Vec<SearchMatch> = files.iter().map(|f| SearchMatch::from_path(f)).collect();

        debug!(
            dir = %dir,
            term = %lc_term,
            limit,
            results = matches.len(),
            "Scoped search"
        );
        Ok(SearchWithinResult::new(matches))
    }
}

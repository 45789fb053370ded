//! Case-insensitive substring search over the collection.

pub mod engine;
pub mod error;
pub mod types;


pub use engine::{
    DEFAULT_WITHIN_LIMIT, MAX_SEARCH_RESULTS, MAX_WITHIN_LIMIT, MIN_SEARCH_CHARS, SearchEngine,
};
pub use error::SearchError;
pub use types::{SearchMatch, SearchWithinRequest, SearchWithinResult};

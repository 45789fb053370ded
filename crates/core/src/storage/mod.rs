//! Storage abstraction over a local music directory or an object store bucket.
//!
//! Both backends present the same logical directory tree:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        StorageService                          │
//! │        (validates client paths, sorts, logs failures)          │
//! ├───────────────────────────────┬───────────────────────────────┤
//! │ LocalBackend                  │ ObjectStoreBackend             │
//! │ walkdir + PathGuard           │ OpenDAL list / presign_read    │
//! └───────────────────────────────┴───────────────────────────────┘
//! ```

mod access;
mod audio;
mod backend;
mod config;
mod error;
mod local;
mod object_store;
mod path;
mod service;

pub use access::{LOCAL_SERVE_PREFIX, parse_key};
pub use audio::{AUDIO_EXTENSIONS, content_type, is_audio_file};
pub use backend::{AccessUrl, BackendKind, DirectoryListing, StorageBackend, matches_term};
pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use local::LocalBackend;
pub use object_store::ObjectStoreBackend;
pub use path::{PathGuard, RelativePath};
pub use service::StorageService;

//! Core browsing and search logic for Soundshelf.
//!
//! This crate contains the storage abstraction with ZERO web dependencies.
//!
//! # Modules
//!
//! - `storage` - Path safety, audio filtering and the local/object-store backends
//! - `search` - Case-insensitive substring search over the collection

pub mod search;
pub mod storage;

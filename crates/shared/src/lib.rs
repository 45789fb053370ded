//! Shared errors and configuration for Soundshelf.
//!
//! This crate provides the pieces every other crate agrees on:
//! - Application-wide error taxonomy with HTTP status mapping
//! - Configuration management (files, `SOUNDSHELF__*` and legacy env vars)

pub mod config;
pub mod error;

pub use config::{AppConfig, ServerConfig, StorageSettings};
pub use error::AppError;

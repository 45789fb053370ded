//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The `/api` function dispatcher used by the player front end
//! - Audio URL resolution and local file streaming
//! - Response logging middleware

pub mod middleware;
pub mod routes;

use axum::{Router, http::StatusCode};
use soundshelf_core::search::SearchEngine;
use soundshelf_core::storage::StorageService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage facade over the configured backend.
    pub storage: Arc<StorageService>,
    /// Name search over the same storage.
    pub search: Arc<SearchEngine>,
}

impl AppState {
    /// Build the state around a storage service.
    #[must_use]
    pub fn new(storage: StorageService) -> Self {
        let storage = Arc::new(storage);
        let search = Arc::new(SearchEngine::new(Arc::clone(&storage)));
        Self { storage, search }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            middleware::response_log::log_error_responses,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

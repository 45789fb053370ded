//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod api;
pub mod audio;
pub mod health;

/// Creates the router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(api::routes())
        .merge(audio::routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use axum::{Router, body::Body, http::Response};
    use http_body_util::BodyExt;
    use soundshelf_core::storage::{StorageConfig, StorageProvider, StorageService};
    use tempfile::TempDir;

    use crate::{AppState, create_router};

    pub fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, b"ID3 test bytes").expect("write file");
    }

    /// Router over a temporary local collection.
    pub fn local_app(files: &[&str]) -> (TempDir, Router) {
        let dir = TempDir::new().expect("temp dir");
        for f in files {
            touch(dir.path(), f);
        }
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let storage = StorageService::from_config(&config).expect("storage");
        (dir, create_router(AppState::new(storage)))
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes()
            .to_vec()
    }

    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).expect("json body")
    }
}

//! Audio retrieval routes.
//!
//! `/audio/{*path}` answers with the URL the player should fetch;
//! `/localdisk/{*path}` streams the bytes when the collection is on local disk.

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::warn;

use crate::AppState;
use soundshelf_core::storage::{StorageError, content_type};
use soundshelf_shared::AppError;

/// Creates the audio routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/audio/{*path}", get(audio_url))
        .route("/localdisk/{*path}", get(local_disk))
}

const NO_CACHE: [(header::HeaderName, &str); 3] = [
    (
        header::CACHE_CONTROL,
        "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0",
    ),
    (header::PRAGMA, "no-cache"),
    (header::EXPIRES, "0"),
];

/// Resolve the playback URL for one audio file.
async fn audio_url(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match state.storage.resolve_access_url(&path).await {
        Ok(url) => (NO_CACHE, Json(json!({ "url": url.url() }))).into_response(),
        Err(e) => audio_error(&path, e),
    }
}

/// Stream a file from the local collection.
async fn local_disk(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    let file = match state.storage.local_file(&path).await {
        Ok(file) => file,
        Err(e) => return audio_error(&path, e),
    };

    let mut response = match ServeFile::new(&file).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };
    if response.status().is_success() {
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type(&path)),
        );
    }
    response
}

/// Map a resolution failure to a response.
///
/// Rejected keys keep their own status; anything the backend could not
/// produce is reported as a missing file.
fn audio_error(path: &str, err: StorageError) -> Response {
    let err = AppError::from(err);
    let (status, message) = match &err {
        AppError::InvalidPath(_) | AppError::InvalidRequest(_) => (
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST),
            err.public_message(),
        ),
        _ => (StatusCode::NOT_FOUND, "Audio not found"),
    };

    warn!(path = %path, error = %err, "Audio lookup failed");
    (
        status,
        Json(json!({ "error": err.error_code(), "message": message })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_bytes, body_json, local_app};

    const LIBRARY: [&str; 3] = ["Artist1/song 1.mp3", "Artist1/notes.txt", "clip.ogg"];

    #[tokio::test]
    async fn test_audio_url_points_at_local_route() {
        let (_dir, app) = local_app(&LIBRARY);
        let response = app
            .oneshot(
                Request::get("/audio/Artist1/song%201.mp3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::PRAGMA], "no-cache");
        assert_eq!(response.headers()[header::EXPIRES], "0");
        assert!(
            response.headers()[header::CACHE_CONTROL]
                .to_str()
                .unwrap()
                .starts_with("no-store")
        );

        let json = body_json(response).await;
        assert_eq!(json["url"], "/localdisk/Artist1/song 1.mp3");
    }

    #[rstest]
    #[case("/audio/Artist1/missing.mp3", StatusCode::NOT_FOUND)]
    #[case("/audio/Artist1/notes.txt", StatusCode::NOT_FOUND)]
    #[case("/audio/Artist1/..%2F..%2Fsecret.mp3", StatusCode::BAD_REQUEST)]
    #[case("/localdisk/Artist1/missing.mp3", StatusCode::NOT_FOUND)]
    #[case("/localdisk/..%2Fsecret.mp3", StatusCode::BAD_REQUEST)]
    #[tokio::test]
    async fn test_audio_failures(#[case] uri: &str, #[case] expected: StatusCode) {
        let (_dir, app) = local_app(&LIBRARY);
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }

    #[tokio::test]
    async fn test_local_disk_serves_bytes_with_audio_type() {
        let (_dir, app) = local_app(&LIBRARY);
        let response = app
            .oneshot(Request::get("/localdisk/clip.ogg").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/ogg");
        assert_eq!(body_bytes(response).await, b"ID3 test bytes");
    }

    #[tokio::test]
    async fn test_local_disk_honours_ranges() {
        let (_dir, app) = local_app(&LIBRARY);
        let response = app
            .oneshot(
                Request::get("/localdisk/clip.ogg")
                    .header(header::RANGE, "bytes=0-2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body_bytes(response).await, b"ID3");
    }
}

//! The `/api` function dispatcher.
//!
//! The player posts `{"function": .., "data": ..}` as JSON, or the legacy
//! form fields `dffunc`/`dfdata`. Every recognised call answers HTTP 200
//! with a `status` of `"ok"` or `"error"`; only a body that cannot be
//! decoded at all gets a 400.

use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::AppState;
use soundshelf_core::search::{SearchError, SearchWithinRequest};
use soundshelf_shared::error::TXT_ACC_DIR;

/// Creates the dispatcher route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api", post(handle_request))
}

// ============================================================================
// Request Types
// ============================================================================

/// A single dispatcher call.
#[derive(Debug, Default, Deserialize)]
pub struct ApiRequest {
    /// Function name.
    #[serde(default, alias = "dffunc")]
    pub function: String,
    /// Function argument; some functions expect JSON inside this string.
    #[serde(default, alias = "dfdata")]
    pub data: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn handle_request(State(state): State<AppState>, request: Request) -> Response {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));

    let call = if is_json {
        match Json::<ApiRequest>::from_request(request, &state).await {
            Ok(Json(call)) => call,
            Err(e) => {
                debug!(error = %e, "Rejected JSON body");
                return bad_body("Invalid JSON");
            }
        }
    } else {
        match Form::<ApiRequest>::from_request(request, &state).await {
            Ok(Form(call)) => call,
            Err(e) => {
                debug!(error = %e, "Rejected form body");
                return bad_body("Invalid form data");
            }
        }
    };

    Json(dispatch(&state, &call).await).into_response()
}

fn bad_body(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

async fn dispatch(state: &AppState, call: &ApiRequest) -> Value {
    let data = call.data.as_str();
    match call.function.as_str() {
        "dir" => list_dir(state, data).await,
        "searchInDir" => search_in_dir(state, data).await,
        "searchTitle" => search_title(state, data).await,
        "searchDir" => search_dir(state, data).await,
        "getAllMp3" => all_audio(state).await,
        "getAllMp3InDir" => all_audio_in_dir(state, data).await,
        "getAllDirs" => all_dirs(state).await,
        "getAllMp3InDirs" => all_audio_in_dirs(state, data).await,
        "version" => json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }),
        other => {
            debug!(function = %other, "Unknown function");
            json!({ "status": "error", "message": "Unknown function" })
        }
    }
}

async fn list_dir(state: &AppState, dir: &str) -> Value {
    match state.storage.list_directory(dir).await {
        Ok(listing) => {
            debug!(
                dir = %dir,
                dirs = listing.dirs.len(),
                files = listing.files.len(),
                "Directory listed"
            );
            json!({
                "status": "ok",
                "dir": dir,
                "dirs": listing.dirs,
                "files": listing.files,
            })
        }
        Err(_) => json!({
            "status": "error",
            "message": TXT_ACC_DIR,
            "dir": dir,
            "dirs": [],
            "files": [],
        }),
    }
}

async fn search_title(state: &AppState, term: &str) -> Value {
    match state.search.search_titles(term).await {
        Ok(titles) => json!({ "status": "ok", "titles": titles }),
        Err(e @ SearchError::TermTooShort { .. }) => {
            json!({ "status": "error", "message": e.to_string(), "titles": [] })
        }
        Err(e) => {
            error!(error = %e, "Title search failed");
            json!({ "status": "error", "message": "Search error", "titles": [] })
        }
    }
}

async fn search_dir(state: &AppState, term: &str) -> Value {
    match state.search.search_directories(term).await {
        Ok(dirs) => json!({ "status": "ok", "dirs": dirs }),
        Err(e @ SearchError::TermTooShort { .. }) => {
            json!({ "status": "error", "message": e.to_string(), "dirs": [] })
        }
        Err(e) => {
            error!(error = %e, "Directory search failed");
            json!({ "status": "error", "message": "Search dir error", "dirs": [] })
        }
    }
}

async fn search_in_dir(state: &AppState, raw: &str) -> Value {
    let Ok(request) = serde_json::from_str::<SearchWithinRequest>(raw) else {
        return json!({ "status": "error", "message": "Invalid request" });
    };

    match state.search.search_within(&request).await {
        Ok(result) => json!({
            "status": "ok",
            "matches": result.matches,
            "count": result.count,
        }),
        Err(e @ SearchError::TermTooShort { .. }) => {
            json!({ "status": "error", "message": e.to_string(), "matches": [] })
        }
        Err(SearchError::InvalidDirectory(_)) => {
            json!({ "status": "error", "message": "Invalid directory" })
        }
        Err(e) => {
            error!(error = %e, "Scoped search failed");
            json!({ "status": "error", "message": "Search failed", "matches": [] })
        }
    }
}

async fn all_audio(state: &AppState) -> Value {
    match state.storage.list_all_audio("").await {
        Ok(files) => json!({ "status": "ok", "files": files }),
        Err(_) => json!({ "status": "error", "message": "Failed to scan music files" }),
    }
}

async fn all_audio_in_dir(state: &AppState, data: &str) -> Value {
    let Ok(dir) = serde_json::from_str::<String>(data) else {
        return json!({ "status": "error", "message": "Invalid directory path" });
    };

    match state.storage.list_all_audio(&dir).await {
        Ok(files) => json!({ "status": "ok", "files": files }),
        Err(_) => json!({ "status": "error", "message": "Failed to scan music directory" }),
    }
}

async fn all_dirs(state: &AppState) -> Value {
    match state.storage.list_all_directories().await {
        Ok(dirs) => json!({ "status": "ok", "dirs": dirs }),
        Err(_) => json!({ "status": "error", "message": "Failed to scan directories" }),
    }
}

async fn all_audio_in_dirs(state: &AppState, data: &str) -> Value {
    let Ok(dirs) = serde_json::from_str::<Vec<String>>(data) else {
        return json!({ "status": "error", "message": "Invalid folder data" });
    };

    match state.storage.list_all_audio_across(&dirs).await {
        Ok(files) => json!({ "status": "ok", "files": files }),
        Err(_) => json!({ "status": "error", "message": "Failed to scan music files" }),
    }
}

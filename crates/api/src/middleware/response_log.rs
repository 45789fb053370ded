//! Logging of failed responses.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::warn;

/// Logs every response with a status of 400 or above.
///
/// Successful responses pass through untouched; the request trace layer
/// already covers them.
pub async fn log_error_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            "Request failed"
        );
    }

    response
}

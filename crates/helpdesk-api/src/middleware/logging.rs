//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::auth::USER_ID_HEADER;

/// Logs one line per request: method, path, caller, status, duration.
///
/// Server errors log at warn so they stand out at the default filter
/// level.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        warn!(%method, path, user, status, duration_ms, "HTTP request failed");
    } else {
        info!(%method, path, user, status, duration_ms, "HTTP request");
    }

    response
}

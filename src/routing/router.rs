//! Request dispatch.
//!
//! # Route Table
//! - `GET /` → 302 to the configured external URL
//! - `GET {metadata_path}` → forwarded unchanged (no prefix stripping)
//! - any method on `{mount_prefix}` or `{mount_prefix}/...` → forwarded with the prefix stripped
//! - anything else → `404 {"error": "Not Found"}`
//!
//! # Design Decisions
//! - Mount matching happens in the fallback so every method and every depth is covered
//! - Upstream failures never escape as faults; they become JSON error responses

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::LOCATION, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::http::request::RequestIdExt;
use crate::http::response::{json_error, not_found};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::{ForwardError, PathRewrite};

/// Build the dispatch table.
pub fn routes(metadata_path: &str) -> Router<AppState> {
    Router::new()
        .route("/", get(root_redirect).fallback(fallback_not_found))
        .route(metadata_path, get(metadata).fallback(fallback_not_found))
        .fallback(mounted)
}

/// `GET /`: fixed redirect.
async fn root_redirect(State(state): State<AppState>) -> Response {
    (StatusCode::FOUND, [(LOCATION, state.root_redirect.clone())]).into_response()
}

async fn fallback_not_found() -> Response {
    not_found()
}

/// Forward anything under the mount prefix; 404 for the rest.
async fn mounted(State(state): State<AppState>, request: Request<Body>) -> Response {
    if !state.forwarder.mount().matches(request.uri().path()) {
        tracing::debug!(path = %request.uri().path(), "No route matched");
        return not_found();
    }

    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %request.uri().path(),
        "Proxying request"
    );

    let response = match state.forwarder.forward(request, PathRewrite::StripMount).await {
        Ok(response) => response,
        Err(e) => backend_error(&request_id, e),
    };

    metrics::record_request("mount", &method, response.status().as_u16(), start);
    response
}

/// `GET {metadata_path}`: same header policy, path unchanged.
async fn metadata(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();

    let response = match state.forwarder.forward(request, PathRewrite::Passthrough).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Metadata fetch failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch OpenAPI spec",
                Some(e.to_string()),
            )
        }
    };

    metrics::record_request("metadata", "GET", response.status().as_u16(), start);
    response
}

/// Map a forwarding failure onto the client-facing error response.
pub fn backend_error(request_id: &str, error: ForwardError) -> Response {
    let (status, message) = match &error {
        ForwardError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "Backend Timeout"),
        ForwardError::InvalidUri(_) => (StatusCode::BAD_REQUEST, "Invalid Request URI"),
        ForwardError::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"),
        ForwardError::Unreachable(_) | ForwardError::InvalidTarget(_) => {
            (StatusCode::BAD_GATEWAY, "Backend Connection Error")
        }
    };
    tracing::warn!(request_id = %request_id, status = status.as_u16(), error = %error, "Returning backend error");
    json_error(status, message, Some(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_maps_to_502() {
        let response = backend_error("r1", ForwardError::Unreachable("Connection refused".into()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Backend Connection Error", "details": "Connection refused"})
        );
    }

    #[tokio::test]
    async fn test_body_too_large_maps_to_413() {
        let response = backend_error("r1", ForwardError::BodyTooLarge);
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["error"], "Payload Too Large");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_504() {
        let response = backend_error("r1", ForwardError::Timeout(Duration::from_secs(30)));
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error"], "Backend Timeout");
    }
}

//! Response handling and transformation.
//!
//! # Responsibilities
//! - Rewrite upstream redirect `Location` headers back onto the edge mount prefix
//! - Build structured JSON error responses
//!
//! # Design Decisions
//! - Redirect rewriting is URL-aware: scheme, host and effective port must equal the upstream
//! - Relative or foreign locations are relayed untouched
//! - Only `Location` is ever modified; status, body and other headers are relayed verbatim

use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use url::Url;

use crate::routing::MountPrefix;
use crate::upstream::UpstreamTarget;

/// JSON error body: `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Build a JSON error response.
pub fn json_error(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

/// `404 {"error": "Not Found"}`.
pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found", None)
}

/// Maps upstream redirects back through the edge.
#[derive(Debug, Clone)]
pub struct RedirectRewriter {
    target: UpstreamTarget,
    mount: MountPrefix,
}

impl RedirectRewriter {
    pub fn new(target: UpstreamTarget, mount: MountPrefix) -> Self {
        Self { target, mount }
    }

    /// Rewrite `Location` in place for 3xx responses. Returns true if it changed.
    pub fn rewrite(&self, status: StatusCode, headers: &mut HeaderMap) -> bool {
        if !status.is_redirection() {
            return false;
        }

        let rewritten = headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| self.rewrite_location(location))
            .and_then(|location| HeaderValue::from_str(&location).ok());

        match rewritten {
            Some(value) => {
                headers.insert(LOCATION, value);
                true
            }
            None => false,
        }
    }

    /// Map an absolute upstream URL onto the mount prefix.
    ///
    /// Returns `None` for relative URLs and for URLs pointing anywhere else.
    pub fn rewrite_location(&self, location: &str) -> Option<String> {
        let url = Url::parse(location).ok()?;
        if !self.target.same_origin(&url) {
            tracing::debug!(location = %location, "Redirect does not reference upstream, relaying unchanged");
            return None;
        }

        let mut rewritten = format!("{}{}", self.mount.as_str(), url.path());
        if let Some(query) = url.query() {
            rewritten.push('?');
            rewritten.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            rewritten.push('#');
            rewritten.push_str(fragment);
        }
        Some(rewritten)
    }
}

//! Request body limits and forwarding policy.
//!
//! # Responsibilities
//! - Enforce maximum request body size (413 Payload Too Large)
//! - Decide which methods may carry a body upstream
//!
//! # Design Decisions
//! - Bodies of safe methods (GET/HEAD by default) are dropped, never forwarded
//! - Every other method forwards its body, including unknown/custom methods
//! - Configured method names are case-insensitive (`get` means `GET`)
//! - Bodies are streamed; the size limit is enforced while streaming

use axum::http::Method;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::{BodyConfig, ValidationError};

/// Decides whether an inbound body is sent upstream.
#[derive(Debug, Clone)]
pub struct BodyPolicy {
    safe_methods: Vec<Method>,
}

impl BodyPolicy {
    pub fn from_config(config: &BodyConfig) -> Result<Self, ValidationError> {
        let safe_methods = config
            .safe_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                    .map_err(|_| ValidationError::SafeMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { safe_methods })
    }

    /// Returns true if a request with this method forwards its body.
    pub fn forwards_body(&self, method: &Method) -> bool {
        !self.safe_methods.contains(method)
    }
}

impl Default for BodyPolicy {
    fn default() -> Self {
        Self {
            safe_methods: vec![Method::GET, Method::HEAD],
        }
    }
}

/// Layer rejecting bodies larger than `max_body_bytes`.
pub fn body_limit_layer(max_body_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(max_body_bytes)
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream target and mount prefix shapes
//! - Validate header names, header values and methods before they hit the hot path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ForwarderConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use url::Url;

use crate::config::schema::ForwarderConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url `{url}` is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("upstream.mount_prefix `{0}` must start with `/`, must not end with `/` and must not be `/`")]
    MountPrefix(String),

    #[error("upstream.metadata_path `{0}` must start with `/`, must not be `/` and must be a literal path")]
    MetadataPath(String),

    #[error("headers.user_agent is not a valid header value")]
    UserAgent,

    #[error("headers.denylist entry `{0}` is not a valid header name")]
    DenylistEntry(String),

    #[error("body.safe_methods entry `{0}` is not a valid HTTP method")]
    SafeMethod(String),

    #[error("routes.root_redirect must be a non-empty header value")]
    RootRedirect,

    #[error("limits.max_body_bytes must be greater than zero")]
    MaxBodyBytes,
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.base_url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.base_url.clone(),
            reason: reason.to_string(),
        });
    }

    let prefix = &config.upstream.mount_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::MountPrefix(prefix.clone()));
    }

    let metadata = &config.upstream.metadata_path;
    if !metadata.starts_with('/') || metadata == "/" || metadata.contains(|c: char| matches!(c, '{' | '}' | '*' | ':')) {
        errors.push(ValidationError::MetadataPath(config.upstream.metadata_path.clone()));
    }

    if HeaderValue::from_str(&config.headers.user_agent).is_err() {
        errors.push(ValidationError::UserAgent);
    }

    for name in &config.headers.denylist {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::DenylistEntry(name.clone()));
        }
    }

    for method in &config.body.safe_methods {
        if Method::from_bytes(method.to_ascii_uppercase().as_bytes()).is_err() {
            errors.push(ValidationError::SafeMethod(method.clone()));
        }
    }

    let redirect = &config.routes.root_redirect;
    if redirect.is_empty() || HeaderValue::from_str(redirect).is_err() {
        errors.push(ValidationError::RootRedirect);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::MaxBodyBytes);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(raw: &str) -> Result<(), &'static str> {
    let url = Url::parse(raw).map_err(|_| "not an absolute URL")?;
    if url.scheme() != "http" {
        return Err("only the http scheme is supported");
    }
    if url.host_str().is_none() {
        return Err("missing host");
    }
    if url.path() != "/" {
        return Err("must not carry a path");
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment");
    }
    Ok(())
}

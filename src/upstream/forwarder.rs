//! Request forwarding to the fixed upstream.
//!
//! # Responsibilities
//! - Rewrite the path (strip the mount prefix or pass through)
//! - Build the outbound header set and decide on the body
//! - Send exactly one request to the upstream, bounded by the deadline
//! - Rewrite redirect `Location` headers on the way back
//!
//! # Design Decisions
//! - The transport never follows redirects; 3xx responses reach the rewriter
//! - Bodies are streamed in both directions, never buffered
//! - No retries: a failure is returned to the caller as a `ForwardError`

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::{ConfigError, ForwarderConfig, ValidationError};
use crate::http::response::RedirectRewriter;
use crate::observability::metrics;
use crate::resilience::timeouts::{bound_from_secs, with_deadline};
use crate::routing::prefix::{join_path_and_query, MountPrefix};
use crate::security::{BodyPolicy, HeaderPolicy};
use crate::upstream::error::ForwardError;
use crate::upstream::target::UpstreamTarget;

/// HTTP client used for upstream calls.
pub type HttpClient = Client<HttpConnector, Body>;

/// How the inbound path maps to the upstream path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRewrite {
    /// Remove the mount prefix.
    StripMount,
    /// Send the inbound path unchanged.
    Passthrough,
}

/// Forwards requests to the single upstream origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    target: UpstreamTarget,
    mount: MountPrefix,
    headers: HeaderPolicy,
    body: BodyPolicy,
    redirects: RedirectRewriter,
    client: HttpClient,
    timeout: Option<Duration>,
}

impl Forwarder {
    /// Compile a forwarder from a validated configuration.
    pub fn from_config(config: &ForwarderConfig) -> Result<Self, ConfigError> {
        let invalid = |e: ValidationError| ConfigError::Validation(vec![e]);

        let target = UpstreamTarget::parse(&config.upstream.base_url).map_err(|e| {
            invalid(ValidationError::UpstreamUrl {
                url: config.upstream.base_url.clone(),
                reason: e.to_string(),
            })
        })?;
        let mount = MountPrefix::new(config.upstream.mount_prefix.clone());
        let headers = HeaderPolicy::from_config(&config.headers, &target).map_err(invalid)?;
        let body = BodyPolicy::from_config(&config.body).map_err(invalid)?;
        let redirects = RedirectRewriter::new(target.clone(), mount.clone());

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(bound_from_secs(config.timeouts.connect_secs));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        tracing::info!(
            upstream = %target.origin(),
            mount_prefix = %mount.as_str(),
            strategy = ?headers.strategy(),
            "Forwarder configured"
        );

        Ok(Self {
            target,
            mount,
            headers,
            body,
            redirects,
            client,
            timeout: bound_from_secs(config.timeouts.upstream_secs),
        })
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    pub fn mount(&self) -> &MountPrefix {
        &self.mount
    }

    /// Build the outbound request without sending it.
    pub fn outbound_request(
        &self,
        request: Request<Body>,
        rewrite: PathRewrite,
    ) -> Result<Request<Body>, ForwardError> {
        let (parts, body) = request.into_parts();

        let path_and_query = match rewrite {
            PathRewrite::StripMount => self.mount.rewrite(&parts.uri),
            PathRewrite::Passthrough => join_path_and_query(parts.uri.path(), parts.uri.query()),
        }
        .ok_or_else(|| ForwardError::InvalidUri(parts.uri.to_string()))?;
        let uri = self.target.uri_for(path_and_query)?;

        let forward_body = self.body.forwards_body(&parts.method);
        let headers = self.headers.outbound(&parts.headers, forward_body);
        let body = if forward_body { body } else { Body::empty() };

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(uri)
            .body(body)
            .map_err(|e| ForwardError::InvalidUri(e.to_string()))?;
        *outbound.headers_mut() = headers;
        Ok(outbound)
    }

    /// Forward a request and return the upstream response ready for relay.
    pub async fn forward(
        &self,
        request: Request<Body>,
        rewrite: PathRewrite,
    ) -> Result<Response<Body>, ForwardError> {
        let outbound = self.outbound_request(request, rewrite)?;
        let method = outbound.method().clone();
        let uri = outbound.uri().clone();
        let start = Instant::now();

        tracing::debug!(method = %method, upstream_uri = %uri, "Forwarding request");

        let result = with_deadline(self.timeout, async {
            self.client
                .request(outbound)
                .await
                .map_err(|e| ForwardError::from_send(&e))
        })
        .await;

        let response: Response<hyper::body::Incoming> = match result {
            Ok(response) => response,
            Err(ForwardError::BodyTooLarge) => {
                tracing::warn!(method = %method, upstream_uri = %uri, "Request body exceeded limit mid-stream");
                return Err(ForwardError::BodyTooLarge);
            }
            Err(e) => {
                metrics::record_upstream_error(e.kind());
                tracing::error!(
                    method = %method,
                    upstream_uri = %uri,
                    error = %e,
                    "Upstream request failed"
                );
                return Err(e);
            }
        };

        let (mut parts, body) = response.into_parts();
        if self.redirects.rewrite(parts.status, &mut parts.headers) {
            metrics::record_redirect_rewritten();
            tracing::debug!(upstream_uri = %uri, location = ?parts.headers.get("location"), "Rewrote redirect");
        }

        tracing::info!(
            method = %method,
            upstream_uri = %uri,
            status = parts.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

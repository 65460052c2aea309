//! The fixed upstream origin.

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

use crate::upstream::error::ForwardError;

/// A parsed, immutable upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    url: Url,
    authority: Authority,
    host: String,
    origin: String,
}

impl UpstreamTarget {
    /// Parse a base URL such as `http://backend:8001`.
    pub fn parse(raw: &str) -> Result<Self, ForwardError> {
        let invalid = |reason: &str| ForwardError::InvalidTarget(format!("{}: {}", raw, reason));

        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?.to_string();
        let authority_str = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.clone(),
        };
        let authority = Authority::try_from(authority_str.as_str())
            .map_err(|e| invalid(&e.to_string()))?;
        let origin = format!("{}://{}", url.scheme(), authority_str);

        Ok(Self {
            url,
            authority,
            host,
            origin,
        })
    }

    /// `host[:port]` as written in the base URL.
    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }

    /// Host without the port.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// `scheme://host[:port]` with no trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns true if `other` points at this origin (scheme, host and effective port).
    pub fn same_origin(&self, other: &Url) -> bool {
        other.scheme() == self.url.scheme()
            && other.host_str() == self.url.host_str()
            && other.port_or_known_default() == self.url.port_or_known_default()
    }

    /// Absolute upstream URI for the given path and query.
    pub fn uri_for(&self, path_and_query: PathAndQuery) -> Result<Uri, ForwardError> {
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(|e| ForwardError::InvalidUri(e.to_string()))
    }
}

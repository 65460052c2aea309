//! Outbound header rewriting.
//!
//! # Responsibilities
//! - Build the header set sent upstream from the inbound headers plus fixed policy values
//! - Hide edge fingerprints (client IP, geo, trace IDs) from the upstream
//! - Present a fixed browser identity (User-Agent, Host, Origin, Referer)
//! - Strip hop-by-hop headers
//!
//! # Design Decisions
//! - The outbound map is always a fresh value; the inbound map is only borrowed
//! - Two strategies, selected at configuration time:
//!   - passthrough minus denylist: copy everything, then delete and override
//!   - whitelist only: start empty, set Host/User-Agent, copy Content-Type/Authorization
//! - Host may be left to the transport, which derives it from the destination URI

use axum::http::header::{
    AUTHORIZATION, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, ORIGIN, REFERER,
    TRANSFER_ENCODING, USER_AGENT,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{HeaderPolicyConfig, HeaderStrategy, HostMode, ValidationError};
use crate::upstream::UpstreamTarget;

/// Connection-scoped headers that never cross a proxy.
const HOP_BY_HOP: [&str; 6] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "upgrade",
];

/// A compiled outbound header policy.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    strategy: HeaderStrategy,
    /// `None` lets the transport regenerate Host.
    host: Option<HeaderValue>,
    user_agent: HeaderValue,
    origin: Option<(HeaderValue, HeaderValue)>,
    denylist: Vec<HeaderName>,
    forward_authorization: bool,
}

impl HeaderPolicy {
    /// Compile the policy for a given upstream target.
    pub fn from_config(
        config: &HeaderPolicyConfig,
        target: &UpstreamTarget,
    ) -> Result<Self, ValidationError> {
        let host = match config.host {
            HostMode::Upstream => Some(target.authority()),
            HostMode::UpstreamHostOnly => Some(target.host()),
            HostMode::Transport => None,
        }
        .map(HeaderValue::from_str)
        .transpose()
        .map_err(|_| ValidationError::UpstreamUrl {
            url: target.origin().to_string(),
            reason: "host is not a valid header value".to_string(),
        })?;

        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| ValidationError::UserAgent)?;

        let origin = if config.spoof_origin {
            let origin = HeaderValue::from_str(target.origin());
            let referer = HeaderValue::from_str(&format!("{}/", target.origin()));
            match (origin, referer) {
                (Ok(o), Ok(r)) => Some((o, r)),
                _ => {
                    return Err(ValidationError::UpstreamUrl {
                        url: target.origin().to_string(),
                        reason: "origin is not a valid header value".to_string(),
                    })
                }
            }
        } else {
            None
        };

        let denylist = config
            .denylist
            .iter()
            .map(|name| {
                HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| ValidationError::DenylistEntry(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            strategy: config.strategy,
            host,
            user_agent,
            origin,
            denylist,
            forward_authorization: config.forward_authorization,
        })
    }

    pub fn strategy(&self) -> HeaderStrategy {
        self.strategy
    }

    /// Build the header set sent upstream.
    ///
    /// `forward_body` tells whether the request body goes upstream; when it does not,
    /// framing headers are dropped so the upstream does not wait for a body.
    pub fn outbound(&self, inbound: &HeaderMap, forward_body: bool) -> HeaderMap {
        match self.strategy {
            HeaderStrategy::PassthroughMinusDenylist => self.passthrough(inbound, forward_body),
            HeaderStrategy::WhitelistOnly => self.whitelist(inbound),
        }
    }

    fn passthrough(&self, inbound: &HeaderMap, forward_body: bool) -> HeaderMap {
        let mut headers = inbound.clone();

        // Headers listed in Connection are hop-by-hop too.
        let listed: Vec<HeaderName> = inbound
            .get_all(CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
            .collect();
        for name in listed {
            headers.remove(name);
        }
        for name in HOP_BY_HOP {
            headers.remove(name);
        }

        for name in &self.denylist {
            headers.remove(name);
        }

        if !forward_body {
            headers.remove(CONTENT_LENGTH);
            headers.remove(TRANSFER_ENCODING);
        }

        match &self.host {
            Some(host) => {
                headers.insert(HOST, host.clone());
            }
            None => {
                headers.remove(HOST);
            }
        }

        headers.insert(USER_AGENT, self.user_agent.clone());

        if let Some((origin, referer)) = &self.origin {
            headers.insert(ORIGIN, origin.clone());
            headers.insert(REFERER, referer.clone());
        }

        if !self.forward_authorization {
            headers.remove(AUTHORIZATION);
        }

        headers
    }

    fn whitelist(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(host) = &self.host {
            headers.insert(HOST, host.clone());
        }
        headers.insert(USER_AGENT, self.user_agent.clone());

        for value in inbound.get_all(CONTENT_TYPE) {
            headers.append(CONTENT_TYPE, value.clone());
        }
        if self.forward_authorization {
            for value in inbound.get_all(AUTHORIZATION) {
                headers.append(AUTHORIZATION, value.clone());
            }
        }

        headers
    }
}

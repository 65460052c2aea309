//! Upstream failure taxonomy.

use std::error::Error as StdError;
use std::time::Duration;

use http_body_util::LengthLimitError;

/// A failure to obtain a response from the upstream.
///
/// Upstream 4xx/5xx responses are not errors; they are relayed as-is.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// Connection refused, DNS failure or any other transport error.
    #[error("{0}")]
    Unreachable(String),

    /// No response headers within the configured bound.
    #[error("upstream did not respond within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The rewritten request URI could not be built.
    #[error("invalid upstream URI: {0}")]
    InvalidUri(String),

    /// The configured upstream base URL is unusable.
    #[error("invalid upstream target {0}")]
    InvalidTarget(String),

    /// The inbound body outgrew the size limit while it was streamed upstream.
    #[error("request body exceeds the configured limit")]
    BodyTooLarge,
}

impl ForwardError {
    /// Wrap a transport error, keeping its whole source chain as the detail.
    pub fn unreachable(err: &(dyn StdError + 'static)) -> Self {
        Self::Unreachable(error_chain(err))
    }

    /// Classify a client error: a tripped body limit is the caller's fault, anything else is transport.
    pub fn from_send(err: &(dyn StdError + 'static)) -> Self {
        if exceeds_body_limit(err) {
            Self::BodyTooLarge
        } else {
            Self::unreachable(err)
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::Timeout(_) => "timeout",
            Self::InvalidUri(_) => "invalid_uri",
            Self::InvalidTarget(_) => "invalid_target",
            Self::BodyTooLarge => "body_too_large",
        }
    }
}

fn exceeds_body_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Render an error and its sources as `outer: inner: root`.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !detail.ends_with(&text) {
            detail.push_str(": ");
            detail.push_str(&text);
        }
        source = cause.source();
    }
    detail
}

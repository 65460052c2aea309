//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → routing::prefix (strip mount prefix or pass through)
//!     → security::headers (build fresh outbound header set)
//!     → security::limits (drop body for safe methods)
//!     → forwarder.rs (single attempt, bounded by resilience::timeouts)
//!     → http::response (rewrite redirect Location)
//!     → Relay status, headers and body to the client
//! ```
//!
//! # Design Decisions
//! - One fixed upstream, known at startup, immutable afterwards
//! - No shared mutable state between requests
//! - Failures surface as `ForwardError` and are mapped to JSON at the HTTP layer

pub mod error;
pub mod forwarder;
pub mod target;

pub use error::ForwardError;
pub use forwarder::{Forwarder, HttpClient, PathRewrite};
pub use target::UpstreamTarget;

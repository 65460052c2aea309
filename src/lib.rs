//! Edge Forwarder Library
//!
//! A stateless HTTP forwarding layer: requests under a public mount prefix are
//! rewritten (path, headers) and forwarded to one fixed upstream origin, and the
//! upstream response is relayed back with redirects mapped through the edge.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::ForwarderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::Forwarder;

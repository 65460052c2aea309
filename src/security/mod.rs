//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size limit, body forwarding decision)
//!     → headers.rs (strip edge fingerprints, spoof identity)
//!     → Pass to upstream forwarder
//! ```
//!
//! # Design Decisions
//! - The upstream never sees edge-injected headers
//! - No trust in client input

pub mod headers;
pub mod limits;

pub use headers::HeaderPolicy;
pub use limits::BodyPolicy;

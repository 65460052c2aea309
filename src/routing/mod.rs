//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (static routes, metadata route, mount fallback)
//!     → prefix.rs (mount prefix match + strip)
//!     → Forwarder or structured 404
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod prefix;
pub mod router;

pub use prefix::MountPrefix;

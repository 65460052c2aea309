//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce response deadline)
//!     → On failure: map to a JSON error response, never retry
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline unless explicitly disabled
//! - Exactly one forwarding attempt per inbound request (fail fast)

pub mod timeouts;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing::router (dispatch)
//!     → upstream::Forwarder
//!     → response.rs (redirect rewrite, JSON errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{ErrorBody, RedirectRewriter};
pub use server::{AppState, HttpServer};

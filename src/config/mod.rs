//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI / environment overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → compiled once into the Forwarder at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::{
    BodyConfig, ForwarderConfig, HeaderPolicyConfig, HeaderStrategy, HostMode, ListenerConfig,
    LogFormat, ObservabilityConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! rauta.toml
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → RautaConfig (validated, immutable)
//!     → handed to Router, portal route table, logging init
//! ```
//!
//! # Design Decisions
//! - Every field has a default so an empty file (or no file) is valid
//! - Validation collects all problems instead of stopping at the first
//! - The route table itself is code, not configuration

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    IndicatorConfig, LogFormat, ObservabilityConfig, PortalConfig, RautaConfig, ReleasePolicy,
    RouterConfig,
};

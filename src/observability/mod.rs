//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: generation, url, route, query)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! logging.rs installs the subscriber once at process start (binary only;
//! the library never installs one itself).
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - Metrics are no-ops until the embedding application installs a recorder

pub mod logging;
pub mod metrics;

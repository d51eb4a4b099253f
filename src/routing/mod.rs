//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Route definitions (code)
//!     → RouteTableBuilder (registration order kept)
//!     → fallback(...) freezes an immutable RouteTable
//!
//! Navigation:
//!     URL
//!     → table.rs (scan in registration order)
//!     → route.rs (RouteDefinition::matches, may preload)
//!     → matcher.rs (evaluate path pattern / query conditions)
//!     → first Matched(MatchResult) wins, else the fallback's result
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Registration order is the only tie-break; specificity is never inferred
//! - The fallback has no predicate, so matching is total
//! - No regex in the hot path (segment comparison only)

pub mod matcher;
pub mod route;
pub mod table;

pub use matcher::{Matcher, Params, PathPattern, WithQuery};
pub use route::{Fallback, MatchResult, Renderer, Route, RouteDefinition, RouteMatch};
pub use table::{RouteTable, RouteTableBuilder};

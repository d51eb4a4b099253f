//! Preload subsystem (render-as-you-fetch).
//!
//! # Data Flow
//! ```text
//! RouteDefinition::matches (synchronous)
//!     → MatchContext::preload(query, variables)
//!     → Preloader → DataClient::preload (request starts here)
//!     → QueryHandle (owned by the MatchResult)
//!
//! Rendering layer:
//!     QueryReader::state() → Pending | Ready | Failed
//!
//! Release:
//!     MatchResult::dispose → QueryHandle::dispose → PreloadedQuery::dispose
//! ```
//!
//! # Design Decisions
//! - The only way to reach the preloader is through a `MatchContext`, so
//!   fetches can only start while a route is being matched
//! - Disposal is tied to `QueryHandle` ownership: consuming `dispose` or
//!   `Drop`, whichever comes first, releases exactly once
//! - Readers are separate from handles so render closures can look at data
//!   without being able to release it

pub mod client;
pub mod handle;
pub mod preloader;

pub use client::{DataClient, EchoClient, PreloadedQuery, QuerySpec, QueryState};
pub use handle::{HandleId, QueryHandle, QueryReader};
pub use preloader::{MatchContext, Preloader};

//! Client-side router and data-preloading coordinator.
//!
//! # Architecture Overview
//!
//! ```text
//!   popstate / link click / goto
//!              │
//!              ▼
//!   ┌─────────────────────┐      ┌──────────────────┐
//!   │ navigation::Router  │─────▶│ indicator        │  start / settle
//!   │ (generation, state) │      │ (idle/pending/   │
//!   └──────────┬──────────┘      │  settling)       │
//!              │                 └──────────────────┘
//!              ▼
//!   ┌─────────────────────┐      ┌──────────────────┐
//!   │ routing::RouteTable │─────▶│ preload          │  DataClient::preload
//!   │ (first match wins)  │      │ (QueryHandle)    │  at match time
//!   └──────────┬──────────┘      └──────────────────┘
//!              │ MatchResult
//!              ▼
//!   commit ──▶ ActiveRoute::render (view code)
//!          └─▶ lifecycle::ReleaseQueue (previous route disposed once)
//! ```
//!
//! `portal` is the video portal's own route table built on top of this.

pub mod config;
pub mod error;
pub mod indicator;
pub mod lifecycle;
pub mod navigation;
pub mod observability;
pub mod portal;
pub mod preload;
pub mod routing;

pub use config::RautaConfig;
pub use error::{DisposeError, NavigationError, PatternError};
pub use indicator::{IndicatorState, LoadingIndicator};
pub use navigation::{ActiveRoute, MemoryHistory, NavigationOutcome, Router};
pub use preload::{DataClient, QueryHandle, QuerySpec};
pub use routing::{MatchResult, Route, RouteMatch, RouteTable};

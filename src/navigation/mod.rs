//! Navigation subsystem.
//!
//! # Data Flow
//! ```text
//! goto / replace / link click (link.rs) / popstate (history.rs)
//!     → controller.rs
//!         → before-navigation listeners (listeners.rs), may veto
//!         → generation += 1, indicator start
//!         → RouteTable::match_route (preloads start here)
//!         → generation still latest?
//!               no:  dispose result, indicator settle
//!               yes: commit NavigationState (state.rs), update history,
//!                    indicator settle, ReleaseQueue::release(previous),
//!                    at-navigation listeners
//!
//! View code:
//!     ActiveRoute::render (active.rs) → current MatchResult's renderer
//! ```
//!
//! # Design Decisions
//! - One transition for every kind of navigation; only the history update
//!   differs
//! - The committed state is private to the controller; view code sees it
//!   only through `ActiveRoute` and `Location`
//! - The router is an explicit handle, never a global

pub mod active;
pub mod controller;
pub mod history;
pub mod link;
pub mod listeners;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use active::{ActiveRoute, MountToken};
pub use controller::Router;
pub use history::{History, MemoryHistory};
pub use link::{LinkActivation, LinkDisposition, Modifiers};
pub use listeners::{ListenerId, NavDecision, NavigationIntent};
pub use state::{Location, NavigationKind, NavigationOutcome, RouterStats};

//! Resource lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Router commits generation g:
//!     previous MatchResult → ReleaseQueue::release(previous, g)
//!         AfterCommit: dispose now
//!         AfterMount:  hold until mounted(g') with g' >= g
//!
//! Stale navigation (controller):
//!     discarded MatchResult → dispose_logged (never enters the queue)
//!
//! Router::shutdown:
//!     ReleaseQueue::flush + dispose current
//! ```
//!
//! # Design Decisions
//! - The queue only sees MatchResults, never individual query handles
//! - `MatchResult::dispose` consumes the result, so a second release is
//!   unrepresentable
//! - Disposal failures are logged and counted, never propagated

pub mod release;

pub use release::ReleaseQueue;

//! The video portal's routes.
//!
//! # Data Flow
//! ```text
//! PortalConfig (reserved paths)
//!     → routes.rs (route_table): one Route per page, registration order
//!       decides overlaps, NotFound fallback
//!     → RouteTable<Page> handed to the Router
//!
//! Matching /math/v/<key>:
//!     → preload RealmNavQuery + VideoPageQuery
//!     → MatchResult<Page> rendering PageKind::Video with both query states
//! ```
//!
//! # Design Decisions
//! - Pages are thin: a `PageKind` plus the states of the queries preloaded
//!   for it. Components proper live in the rendering layer
//! - Paths starting with `~` or `!` belong to the application, never to
//!   realms
//! - IDs in URLs are bare keys; the `ev`/`sr` kind prefix is added when
//!   building query variables

pub mod routes;

pub use routes::{is_valid_key, is_valid_realm_path, route_table};

use std::fmt;

use crate::preload::QueryState;

/// Which page a route renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// A realm page. The root realm has the path `""`.
    Realm { path: String },
    About,
    Login,
    /// `realm` is set for videos shown inside a realm.
    Video { id: String, realm: Option<String> },
    Series { id: String },
    Manage,
    ManageVideos,
    ManageVideo { id: String },
    ManageRealm { path: String },
    AddChild { parent: String },
    Upload,
    NotFound { path: String },
}

/// What a portal route renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    /// State of each preloaded query, in preload order.
    pub data: Vec<(&'static str, QueryState)>,
}

impl Page {
    /// True while any preloaded query is still in flight. The rendering
    /// layer suspends on this.
    pub fn is_loading(&self) -> bool {
        self.data.iter().any(|(_, state)| state.is_pending())
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Realm { path } if path.is_empty() => f.write_str("home"),
            PageKind::Realm { path } => write!(f, "realm {path}"),
            PageKind::About => f.write_str("about"),
            PageKind::Login => f.write_str("login"),
            PageKind::Video { id, realm: None } => write!(f, "video {id}"),
            PageKind::Video { id, realm: Some(realm) } => write!(f, "video {id} in {realm}"),
            PageKind::Series { id } => write!(f, "series {id}"),
            PageKind::Manage => f.write_str("manage"),
            PageKind::ManageVideos => f.write_str("manage videos"),
            PageKind::ManageVideo { id } => write!(f, "manage video {id}"),
            PageKind::ManageRealm { path } => write!(f, "manage realm {path}"),
            PageKind::AddChild { parent } => write!(f, "add child realm to {parent}"),
            PageKind::Upload => f.write_str("upload"),
            PageKind::NotFound { path } => write!(f, "not found {path}"),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if self.data.is_empty() {
            return Ok(());
        }
        let states: Vec<String> = self
            .data
            .iter()
            .map(|(query, state)| {
                let state = match state {
                    QueryState::Pending => "pending",
                    QueryState::Ready(_) => "ready",
                    QueryState::Failed(_) => "failed",
                };
                format!("{query}: {state}")
            })
            .collect();
        write!(f, " [{}]", states.join(", "))
    }
}

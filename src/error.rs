//! Error types shared across subsystems.

use thiserror::Error;

/// A route pattern rejected at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("empty parameter name in pattern {0:?}")]
    EmptyParam(String),

    #[error("duplicate parameter {name:?} in pattern {pattern:?}")]
    DuplicateParam { pattern: String, name: String },

    #[error("more than one wildcard in pattern {0:?}")]
    MultipleWildcards(String),

    #[error("missing argument {name:?} for pattern {pattern:?}")]
    MissingArgument { pattern: String, name: String },
}

/// A navigation target that could not be turned into a routable URL.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid navigation target {target:?}: {source}")]
    InvalidUrl {
        target: String,
        #[source]
        source: url::ParseError,
    },

    #[error("navigation target {0} is not on this origin")]
    CrossOrigin(String),
}

/// The data client failed to release a preloaded query.
#[derive(Debug, Clone, Error)]
#[error("failed to dispose query {query}: {reason}")]
pub struct DisposeError {
    pub query: String,
    pub reason: String,
}

impl DisposeError {
    pub fn new(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reason: reason.into(),
        }
    }
}

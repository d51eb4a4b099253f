//! Navigation state types.

use std::fmt;
use url::Url;

use crate::routing::MatchResult;

/// How a navigation touches the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKind {
    /// Link activation or `goto`: adds an entry.
    Push,
    /// `replace`: overwrites the current entry.
    Replace,
    /// Back/forward: the history already moved.
    Pop,
}

impl NavigationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationKind::Push => "push",
            NavigationKind::Replace => "replace",
            NavigationKind::Pop => "pop",
        }
    }
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The committed route. Owned by the controller, never handed out.
pub(crate) struct NavigationState<V> {
    pub current: MatchResult<V>,
    pub url: Url,
    pub generation: u64,
}

/// Public view of the committed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub url: Url,
    pub route: String,
}

/// Result of one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The target was matched and is now current.
    Committed { route: String },
    /// A newer navigation started while this one was matching. Its result
    /// was disposed without being rendered.
    Superseded,
    /// A before-navigation listener vetoed it.
    Prevented,
    /// Back/forward to the location that is already current (fragment
    /// changes only).
    Unchanged,
    /// The router was shut down.
    ShutDown,
}

impl NavigationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, NavigationOutcome::Committed { .. })
    }

    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            NavigationOutcome::Committed { .. } => "committed",
            NavigationOutcome::Superseded => "superseded",
            NavigationOutcome::Prevented => "prevented",
            NavigationOutcome::Unchanged => "unchanged",
            NavigationOutcome::ShutDown => "shut_down",
        }
    }
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Navigations started (the generation counter).
    pub started: u64,
    pub committed: u64,
    pub superseded: u64,
    pub prevented: u64,
    pub preloads: u64,
    /// Superseded routes disposed by the release queue.
    pub released: u64,
    /// Superseded routes still waiting for a mount signal.
    pub held: usize,
    /// Query releases that reported an error.
    pub dispose_failures: u64,
}

/// Same document location, ignoring the fragment.
pub(crate) fn same_document(a: &Url, b: &Url) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    a.set_fragment(None);
    b.set_fragment(None);
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_labels() {
        let outcomes = [
            NavigationOutcome::Committed { route: "a".into() },
            NavigationOutcome::Superseded,
            NavigationOutcome::Prevented,
            NavigationOutcome::Unchanged,
            NavigationOutcome::ShutDown,
        ];
        let labels: Vec<_> = outcomes.iter().map(NavigationOutcome::metric_label).collect();
        assert_eq!(labels, ["committed", "superseded", "prevented", "unchanged", "shut_down"]);
    }

    #[test]
    fn test_same_document_ignores_fragment() {
        let a = Url::parse("http://localhost/v/x#t=10").unwrap();
        let b = Url::parse("http://localhost/v/x").unwrap();
        let c = Url::parse("http://localhost/v/x?t=10").unwrap();
        assert!(same_document(&a, &b));
        assert!(!same_document(&b, &c));
    }
}

//! History seam.
//!
//! # Responsibilities
//! - Report the URL the history currently points at
//! - Record pushes and replacements made by the router
//!
//! # Design Decisions
//! - The router never reads back/forward state; `Pop` navigations take
//!   whatever `location()` returns after the history moved
//! - `MemoryHistory` is a cloneable handle so tests and the CLI can drive
//!   back/forward while the router owns another clone

use std::sync::{Arc, Mutex};
use url::Url;

use crate::error::NavigationError;

pub trait History: Send + Sync {
    /// Current location.
    fn location(&self) -> Result<Url, NavigationError>;

    fn push_state(&self, url: &Url);

    fn replace_state(&self, url: &Url);
}

#[derive(Debug)]
struct Stack {
    entries: Vec<Url>,
    index: usize,
}

/// In-process history stack with browser semantics: pushing drops the
/// forward entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Arc<Mutex<Stack>>,
}

impl MemoryHistory {
    pub fn new(initial: Url) -> Self {
        Self {
            stack: Arc::new(Mutex::new(Stack {
                entries: vec![initial],
                index: 0,
            })),
        }
    }

    /// Move one entry back. Returns the new location, or `None` at the
    /// start of the stack.
    pub fn back(&self) -> Option<Url> {
        let mut stack = self.lock();
        if stack.index == 0 {
            return None;
        }
        stack.index -= 1;
        Some(stack.entries[stack.index].clone())
    }

    pub fn forward(&self) -> Option<Url> {
        let mut stack = self.lock();
        if stack.index + 1 >= stack.entries.len() {
            return None;
        }
        stack.index += 1;
        Some(stack.entries[stack.index].clone())
    }

    pub fn entries(&self) -> Vec<Url> {
        self.lock().entries.clone()
    }

    pub fn index(&self) -> usize {
        self.lock().index
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Stack> {
        self.stack.lock().expect("history mutex poisoned")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Result<Url, NavigationError> {
        let stack = self.lock();
        Ok(stack.entries[stack.index].clone())
    }

    fn push_state(&self, url: &Url) {
        let mut stack = self.lock();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(url.clone());
        stack.index = keep;
    }

    fn replace_state(&self, url: &Url) {
        let mut stack = self.lock();
        let index = stack.index;
        stack.entries[index] = url.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("http://localhost:8030").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_push_back_forward() {
        let history = MemoryHistory::new(url("/"));
        history.push_state(&url("/a"));
        history.push_state(&url("/b"));
        assert_eq!(history.len(), 3);

        assert_eq!(history.back(), Some(url("/a")));
        assert_eq!(history.location().unwrap(), url("/a"));
        assert_eq!(history.forward(), Some(url("/b")));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let history = MemoryHistory::new(url("/"));
        history.push_state(&url("/a"));
        history.push_state(&url("/b"));
        history.back();
        history.back();

        history.push_state(&url("/c"));
        assert_eq!(history.entries(), vec![url("/"), url("/c")]);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn test_replace_keeps_length() {
        let history = MemoryHistory::new(url("/"));
        history.replace_state(&url("/x"));
        assert_eq!(history.entries(), vec![url("/x")]);
        assert_eq!(history.back(), None);
    }
}

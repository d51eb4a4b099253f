//! Before- and at-navigation listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::navigation::state::NavigationKind;

/// Verdict of a before-navigation listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    Allow,
    Prevent,
}

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A navigation about to start.
#[derive(Debug, Clone, Copy)]
pub struct NavigationIntent<'a> {
    pub from: &'a Url,
    pub to: &'a Url,
    pub kind: NavigationKind,
}

type BeforeListener = Arc<dyn Fn(&NavigationIntent<'_>) -> NavDecision + Send + Sync>;
type AtListener = Arc<dyn Fn(&Url, &str) + Send + Sync>;

/// Registered listeners. Callbacks run with no lock held, so they may
/// register, remove or navigate.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    before: Mutex<Vec<(ListenerId, BeforeListener)>>,
    at: Mutex<Vec<(ListenerId, AtListener)>>,
}

impl Listeners {
    pub fn add_before(&self, listener: BeforeListener) -> ListenerId {
        let id = self.next_id();
        self.before.lock().expect("listener mutex poisoned").push((id, listener));
        id
    }

    pub fn add_at(&self, listener: AtListener) -> ListenerId {
        let id = self.next_id();
        self.at.lock().expect("listener mutex poisoned").push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut removed = false;
        self.before
            .lock()
            .expect("listener mutex poisoned")
            .retain(|(other, _)| {
                let keep = *other != id;
                removed |= !keep;
                keep
            });
        self.at.lock().expect("listener mutex poisoned").retain(|(other, _)| {
            let keep = *other != id;
            removed |= !keep;
            keep
        });
        removed
    }

    /// True unless some listener prevents the navigation. Stops at the
    /// first veto.
    pub fn allow(&self, intent: &NavigationIntent<'_>) -> bool {
        let listeners: Vec<BeforeListener> = self
            .before
            .lock()
            .expect("listener mutex poisoned")
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        listeners
            .iter()
            .all(|listener| listener(intent) == NavDecision::Allow)
    }

    pub fn notify(&self, url: &Url, route: &str) {
        let listeners: Vec<AtListener> = self
            .at
            .lock()
            .expect("listener mutex poisoned")
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        for listener in listeners {
            listener(url, route);
        }
    }

    fn next_id(&self) -> ListenerId {
        ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

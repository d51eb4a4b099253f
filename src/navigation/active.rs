//! Active-route exposure.

use std::sync::Arc;
use url::Url;

use crate::navigation::controller::Shared;

/// Identifies the committed route a tree was rendered from. Passed back
/// through `Router::notify_mounted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountToken(u64);

impl MountToken {
    pub(crate) fn generation(&self) -> u64 {
        self.0
    }
}

/// Read-only accessor for whatever route is currently committed.
///
/// Renders never hold the router's lock, so a render closure may read other
/// router state. It must not navigate.
pub struct ActiveRoute<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for ActiveRoute<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V: 'static> ActiveRoute<V> {
    pub(crate) fn new(shared: Arc<Shared<V>>) -> Self {
        Self { shared }
    }

    /// Render the current route. `None` after shutdown.
    pub fn render(&self) -> Option<V> {
        self.render_with_token().map(|(view, _)| view)
    }

    /// Render the current route and get the token to report its mount.
    pub fn render_with_token(&self) -> Option<(V, MountToken)> {
        let (renderer, generation) = {
            let state = self.shared.state.lock().expect("navigation state mutex poisoned");
            let state = state.as_ref()?;
            (state.current.renderer(), state.generation)
        };
        Some((renderer(), MountToken(generation)))
    }

    /// Name of the current route.
    pub fn route(&self) -> Option<String> {
        let state = self.shared.state.lock().expect("navigation state mutex poisoned");
        state.as_ref().map(|s| s.current.route().to_string())
    }

    pub fn url(&self) -> Option<Url> {
        let state = self.shared.state.lock().expect("navigation state mutex poisoned");
        state.as_ref().map(|s| s.url.clone())
    }
}

//! Navigation controller.
//!
//! # Responsibilities
//! - Own the committed `NavigationState` and the generation counter
//! - Run every navigation (push, replace, back/forward, link clicks)
//!   through the same transition
//! - Discard results of superseded navigations without rendering them
//! - Hand superseded routes to the release queue after commit
//! - Drive the loading indicator with one start and one settle per attempt
//!
//! # Design Decisions
//! - Matching runs with no lock held, so route factories and data clients
//!   may start navigations of their own
//! - The generation is re-checked under the state lock right before commit;
//!   the last navigation to bump the counter is the only one that commits
//! - History is updated under the same lock so its order matches commits
//! - Disposal failures are logged and counted, they never block a commit

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use crate::config::RautaConfig;
use crate::error::{NavigationError, PatternError};
use crate::indicator::{LoadingIndicator, Timings};
use crate::lifecycle::release::dispose_logged;
use crate::lifecycle::ReleaseQueue;
use crate::navigation::active::{ActiveRoute, MountToken};
use crate::navigation::history::History;
use crate::navigation::link::{self, LinkActivation, LinkDisposition};
use crate::navigation::listeners::{ListenerId, Listeners, NavDecision, NavigationIntent};
use crate::navigation::state::{
    same_document, Location, NavigationKind, NavigationOutcome, NavigationState, RouterStats,
};
use crate::observability::metrics;
use crate::preload::{DataClient, Preloader};
use crate::routing::{MatchResult, RouteTable};

pub(crate) struct Shared<V> {
    table: RouteTable<V>,
    preloader: Preloader,
    history: Box<dyn History>,
    origin: Url,
    generation: AtomicU64,
    /// `None` once shut down.
    pub(crate) state: Mutex<Option<NavigationState<V>>>,
    location: ArcSwap<Location>,
    releases: ReleaseQueue<V>,
    indicator: LoadingIndicator,
    listeners: Listeners,
    committed: AtomicU64,
    superseded: AtomicU64,
    prevented: AtomicU64,
    discard_failures: AtomicU64,
}

enum Settled<V> {
    Committed {
        previous: MatchResult<V>,
        route: String,
    },
    Discarded {
        next: MatchResult<V>,
        outcome: NavigationOutcome,
    },
}

/// Handle to the router. Cheap to clone; all clones drive the same state.
pub struct Router<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Clone for Router<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V: 'static> Router<V> {
    /// Match the history's current location and make it the initial route.
    ///
    /// The initial match is generation 0. It has no predecessor to release
    /// and does not drive the loading indicator.
    pub fn start(
        table: RouteTable<V>,
        client: Arc<dyn DataClient>,
        history: impl History + 'static,
        config: &RautaConfig,
    ) -> Result<Self, NavigationError> {
        let origin =
            Url::parse(&config.router.origin).map_err(|source| NavigationError::InvalidUrl {
                target: config.router.origin.clone(),
                source,
            })?;
        let url = history.location()?;
        let preloader = Preloader::new(client);

        let current = table.match_route(&url, &preloader);
        let location = Location {
            url: url.clone(),
            route: current.route().to_string(),
        };
        tracing::info!(
            url = %url,
            route = %location.route,
            release = ?config.router.release,
            "Router started"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                table,
                preloader,
                history: Box::new(history),
                origin,
                generation: AtomicU64::new(0),
                state: Mutex::new(Some(NavigationState {
                    current,
                    url,
                    generation: 0,
                })),
                location: ArcSwap::from_pointee(location),
                releases: ReleaseQueue::new(config.router.release),
                indicator: LoadingIndicator::new(Timings::from(&config.indicator)),
                listeners: Listeners::default(),
                committed: AtomicU64::new(0),
                superseded: AtomicU64::new(0),
                prevented: AtomicU64::new(0),
                discard_failures: AtomicU64::new(0),
            }),
        })
    }

    /// Navigate and push a history entry.
    pub fn goto(&self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        let url = self.resolve(target)?;
        Ok(self.navigate(url, NavigationKind::Push))
    }

    /// Navigate and replace the current history entry.
    pub fn replace(&self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        let url = self.resolve(target)?;
        Ok(self.navigate(url, NavigationKind::Replace))
    }

    /// The history moved (back/forward). Navigates to its new location.
    pub fn handle_popstate(&self) -> Result<NavigationOutcome, NavigationError> {
        let url = self.shared.history.location()?;
        Ok(self.navigate(url, NavigationKind::Pop))
    }

    /// Route a link click through the router if it is an in-app link.
    pub fn activate_link(&self, link: &LinkActivation) -> LinkDisposition {
        let current = self.shared.location.load().url.clone();
        match link::intercept_target(link, &self.shared.origin, &current) {
            Some(url) => LinkDisposition::Intercepted(self.navigate(url, NavigationKind::Push)),
            None => {
                tracing::trace!(href = %link.href, "Link left to the browser");
                LinkDisposition::BrowserDefault
            }
        }
    }

    fn resolve(&self, target: &str) -> Result<Url, NavigationError> {
        let base = self.shared.location.load().url.clone();
        let url = base.join(target).map_err(|source| NavigationError::InvalidUrl {
            target: target.to_string(),
            source,
        })?;
        if url.origin() != self.shared.origin.origin() {
            return Err(NavigationError::CrossOrigin(url.to_string()));
        }
        Ok(url)
    }

    fn navigate(&self, to: Url, kind: NavigationKind) -> NavigationOutcome {
        let outcome = self.transition(to, kind);
        metrics::record_navigation(outcome.metric_label());
        outcome
    }

    fn transition(&self, to: Url, kind: NavigationKind) -> NavigationOutcome {
        let shared = &*self.shared;
        let from = shared.location.load().url.clone();

        if self.is_shut_down() {
            return NavigationOutcome::ShutDown;
        }
        if kind == NavigationKind::Pop && same_document(&from, &to) {
            tracing::debug!(url = %to, "Popstate to the current location, nothing to do");
            return NavigationOutcome::Unchanged;
        }

        let intent = NavigationIntent {
            from: &from,
            to: &to,
            kind,
        };
        if !shared.listeners.allow(&intent) {
            shared.prevented.fetch_add(1, Ordering::Relaxed);
            if kind == NavigationKind::Pop {
                // The browser already moved; put the committed URL back.
                tracing::warn!(
                    from = %from,
                    to = %to,
                    "Back/forward navigation prevented, restoring location"
                );
                shared.history.push_state(&from);
            } else {
                tracing::debug!(from = %from, to = %to, %kind, "Navigation prevented");
            }
            return NavigationOutcome::Prevented;
        }

        let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        shared.indicator.start();
        tracing::debug!(generation, url = %to, %kind, "Navigation started");

        let next = shared.table.match_route(&to, &shared.preloader);

        let settled = {
            let mut state = shared.state.lock().expect("navigation state mutex poisoned");
            let latest = shared.generation.load(Ordering::SeqCst);
            match state.as_mut() {
                None => Settled::Discarded {
                    next,
                    outcome: NavigationOutcome::ShutDown,
                },
                Some(_) if latest != generation => Settled::Discarded {
                    next,
                    outcome: NavigationOutcome::Superseded,
                },
                Some(state) => {
                    let route = next.route().to_string();
                    let previous = std::mem::replace(&mut state.current, next);
                    state.url = to.clone();
                    state.generation = generation;
                    shared.location.store(Arc::new(Location {
                        url: to.clone(),
                        route: route.clone(),
                    }));

                    match kind {
                        NavigationKind::Push => shared.history.push_state(&to),
                        NavigationKind::Replace => shared.history.replace_state(&to),
                        NavigationKind::Pop => {}
                    }
                    Settled::Committed { previous, route }
                }
            }
        };

        match settled {
            Settled::Discarded { next, outcome } => {
                tracing::debug!(
                    generation,
                    url = %to,
                    route = next.route(),
                    ?outcome,
                    "Navigation discarded"
                );
                let failed = dispose_logged(next, generation, "discarded");
                shared.discard_failures.fetch_add(failed as u64, Ordering::Relaxed);
                if outcome == NavigationOutcome::Superseded {
                    shared.superseded.fetch_add(1, Ordering::Relaxed);
                }
                shared.indicator.settle();
                outcome
            }
            Settled::Committed { previous, route } => {
                tracing::debug!(generation, url = %to, route = %route, "Navigation committed");
                shared.committed.fetch_add(1, Ordering::Relaxed);
                shared.indicator.settle();
                shared.releases.release(previous, generation);
                shared.listeners.notify(&to, &route);
                NavigationOutcome::Committed { route }
            }
        }
    }

    /// The rendering layer mounted the tree obtained with `token`.
    /// Releases routes held for it under `ReleasePolicy::AfterMount`.
    pub fn notify_mounted(&self, token: MountToken) -> usize {
        let released = self.shared.releases.mounted(token.generation());
        if released > 0 {
            tracing::debug!(
                generation = token.generation(),
                released,
                "Mount released superseded routes"
            );
        }
        released
    }

    /// Dispose the current route and everything still held. Further
    /// navigations return `ShutDown`. Idempotent.
    pub fn shutdown(&self) {
        let state = self
            .shared
            .state
            .lock()
            .expect("navigation state mutex poisoned")
            .take();
        let Some(state) = state else {
            return;
        };

        let flushed = self.shared.releases.flush();
        let failed = dispose_logged(state.current, state.generation, "shutdown");
        self.shared.discard_failures.fetch_add(failed as u64, Ordering::Relaxed);
        tracing::info!(
            generation = state.generation,
            url = %state.url,
            flushed,
            "Router shut down"
        );
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.state.lock().expect("navigation state mutex poisoned").is_none()
    }

    /// Read accessor for view code.
    pub fn active(&self) -> ActiveRoute<V> {
        ActiveRoute::new(Arc::clone(&self.shared))
    }

    /// Committed URL and route name.
    pub fn location(&self) -> Arc<Location> {
        self.shared.location.load_full()
    }

    pub fn indicator(&self) -> LoadingIndicator {
        self.shared.indicator.clone()
    }

    pub fn table(&self) -> &RouteTable<V> {
        &self.shared.table
    }

    /// Build an absolute link to a named route.
    pub fn url_for(&self, route: &str, args: &[(&str, &str)]) -> Option<Result<Url, PatternError>> {
        let path = self.shared.table.url_for(route, args)?;
        Some(path.map(|path| {
            let mut url = self.shared.origin.clone();
            url.set_path(&path);
            url
        }))
    }

    pub fn on_before_navigate<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&NavigationIntent<'_>) -> NavDecision + Send + Sync + 'static,
    {
        self.shared.listeners.add_before(Arc::new(listener))
    }

    pub fn on_navigate<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&Url, &str) + Send + Sync + 'static,
    {
        self.shared.listeners.add_at(Arc::new(listener))
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    pub fn stats(&self) -> RouterStats {
        let shared = &*self.shared;
        RouterStats {
            started: shared.generation.load(Ordering::SeqCst),
            committed: shared.committed.load(Ordering::Relaxed),
            superseded: shared.superseded.load(Ordering::Relaxed),
            prevented: shared.prevented.load(Ordering::Relaxed),
            preloads: shared.preloader.issued(),
            released: shared.releases.released(),
            held: shared.releases.held(),
            dispose_failures: shared.releases.failures()
                + shared.discard_failures.load(Ordering::Relaxed),
        }
    }
}

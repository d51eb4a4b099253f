//! Route table and lookup.
//!
//! # Responsibilities
//! - Store route definitions in registration order
//! - Return the first successful match, or the fallback's result
//! - Build links by route name
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan; route counts are small
//! - A table cannot be built without a fallback

use std::fmt;
use url::Url;

use crate::error::PatternError;
use crate::preload::{MatchContext, Preloader};
use crate::routing::route::{Fallback, MatchResult, RouteDefinition};

/// Ordered, immutable set of routes plus a fallback.
pub struct RouteTable<V> {
    routes: Vec<Box<dyn RouteDefinition<V>>>,
    fallback: Fallback<V>,
}

impl<V: 'static> RouteTable<V> {
    pub fn builder() -> RouteTableBuilder<V> {
        RouteTableBuilder { routes: Vec::new() }
    }

    /// Find the route for `url`. Never fails: unmatched URLs get the
    /// fallback's result.
    pub fn match_route(&self, url: &Url, preloader: &Preloader) -> MatchResult<V> {
        let ctx = MatchContext::new(url, preloader);

        for route in &self.routes {
            if let Some(result) = route.matches(&ctx).into_option() {
                tracing::debug!(url = %url, route = route.name(), "Route matched");
                return result;
            }
        }

        tracing::debug!(
            url = %url,
            route = self.fallback.name(),
            "No route matched, using fallback"
        );
        self.fallback.produce(&ctx)
    }

    /// Match without committing to anything: the result is disposed right
    /// away and only the winning route's name is returned.
    pub fn probe(&self, url: &Url, preloader: &Preloader) -> String {
        let result = self.match_route(url, preloader);
        let name = result.route().to_string();
        if let Err(errors) = result.dispose() {
            for e in errors {
                tracing::warn!(url = %url, error = %e, "Disposing probed route failed");
            }
        }
        name
    }

    /// Route names in registration order, fallback last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes
            .iter()
            .map(|r| r.name())
            .chain(std::iter::once(self.fallback.name()))
    }

    /// Number of routes, not counting the fallback.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Build a link to the first route registered under `name`.
    pub fn url_for(
        &self,
        name: &str,
        args: &[(&str, &str)],
    ) -> Option<Result<String, PatternError>> {
        self.routes
            .iter()
            .find(|r| r.name() == name)
            .and_then(|r| r.url_for(args))
    }
}

impl<V> fmt::Debug for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

/// Collects routes in order. Finished by [`RouteTableBuilder::fallback`].
pub struct RouteTableBuilder<V> {
    routes: Vec<Box<dyn RouteDefinition<V>>>,
}

impl<V: 'static> RouteTableBuilder<V> {
    /// Append a route. Earlier routes win over later ones.
    pub fn route(mut self, route: impl RouteDefinition<V> + 'static) -> Self {
        self.routes.push(Box::new(route));
        self
    }

    /// Set the fallback and freeze the table.
    pub fn fallback<F>(self, name: impl Into<String>, factory: F) -> RouteTable<V>
    where
        F: Fn(&MatchContext<'_>) -> MatchResult<V> + Send + Sync + 'static,
    {
        RouteTable {
            routes: self.routes,
            fallback: Fallback::new(name, factory),
        }
    }
}

//! Route definitions and match results.

use std::fmt;
use std::sync::Arc;

use crate::error::{DisposeError, PatternError};
use crate::preload::{MatchContext, QueryHandle};
use crate::routing::matcher::{Matcher, Params, PathPattern};

/// Shared render function of a matched route.
pub type Renderer<V> = Arc<dyn Fn() -> V + Send + Sync>;

/// What a successful match produces: something to render and the queries
/// to release once the route is no longer needed.
pub struct MatchResult<V> {
    route: String,
    render: Renderer<V>,
    queries: Vec<QueryHandle>,
}

impl<V> MatchResult<V> {
    pub fn new(route: impl Into<String>, render: impl Fn() -> V + Send + Sync + 'static) -> Self {
        Self {
            route: route.into(),
            render: Arc::new(render),
            queries: Vec::new(),
        }
    }

    /// Transfer ownership of a preloaded query into this result.
    pub fn with_query(mut self, handle: QueryHandle) -> Self {
        self.queries.push(handle);
        self
    }

    /// Name of the route that produced this result.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn render(&self) -> V {
        (self.render)()
    }

    pub(crate) fn renderer(&self) -> Renderer<V> {
        Arc::clone(&self.render)
    }

    /// Release every query this result owns. All queries are released even
    /// if some fail; the failures are returned together.
    pub fn dispose(self) -> Result<(), Vec<DisposeError>> {
        let errors: Vec<DisposeError> = self
            .queries
            .into_iter()
            .filter_map(|handle| handle.dispose().err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl<V> fmt::Debug for MatchResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchResult")
            .field("route", &self.route)
            .field("queries", &self.queries)
            .finish_non_exhaustive()
    }
}

/// Outcome of asking one route definition about a URL.
#[derive(Debug)]
pub enum RouteMatch<V> {
    Matched(MatchResult<V>),
    NoMatch,
}

impl<V> RouteMatch<V> {
    pub fn into_option(self) -> Option<MatchResult<V>> {
        match self {
            RouteMatch::Matched(result) => Some(result),
            RouteMatch::NoMatch => None,
        }
    }
}

impl<V> From<MatchResult<V>> for RouteMatch<V> {
    fn from(result: MatchResult<V>) -> Self {
        RouteMatch::Matched(result)
    }
}

impl<V> From<Option<MatchResult<V>>> for RouteMatch<V> {
    fn from(result: Option<MatchResult<V>>) -> Self {
        result.map_or(RouteMatch::NoMatch, RouteMatch::Matched)
    }
}

/// A registered route.
///
/// `matches` may allocate query handles through the context but must have
/// no other observable side effect: the table calls it speculatively.
pub trait RouteDefinition<V>: Send + Sync {
    fn name(&self) -> &str;

    fn matches(&self, ctx: &MatchContext<'_>) -> RouteMatch<V>;

    /// Build a link to this route. `None` if the route has no URL builder.
    fn url_for(&self, _args: &[(&str, &str)]) -> Option<Result<String, PatternError>> {
        None
    }
}

type Factory<V> = Box<dyn Fn(&Params, &MatchContext<'_>) -> RouteMatch<V> + Send + Sync>;

/// Route backed by a matcher and a factory closure.
pub struct Route<V> {
    name: String,
    matcher: Box<dyn Matcher>,
    pattern: Option<PathPattern>,
    factory: Factory<V>,
}

impl<V: 'static> Route<V> {
    /// Route on a path pattern. The pattern also serves as URL builder.
    pub fn new<F, R>(
        name: impl Into<String>,
        pattern: &str,
        factory: F,
    ) -> Result<Self, PatternError>
    where
        F: Fn(&Params, &MatchContext<'_>) -> R + Send + Sync + 'static,
        R: Into<RouteMatch<V>>,
    {
        let pattern = PathPattern::parse(pattern)?;
        Ok(Self {
            name: name.into(),
            matcher: Box::new(pattern.clone()),
            pattern: Some(pattern),
            factory: Box::new(move |params: &Params, ctx: &MatchContext<'_>| -> RouteMatch<V> {
                factory(params, ctx).into()
            }),
        })
    }

    /// Route on an arbitrary matcher. Has no URL builder.
    pub fn with_matcher<M, F, R>(name: impl Into<String>, matcher: M, factory: F) -> Self
    where
        M: Matcher + 'static,
        F: Fn(&Params, &MatchContext<'_>) -> R + Send + Sync + 'static,
        R: Into<RouteMatch<V>>,
    {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            pattern: None,
            factory: Box::new(move |params: &Params, ctx: &MatchContext<'_>| -> RouteMatch<V> {
                factory(params, ctx).into()
            }),
        }
    }
}

impl<V: 'static> RouteDefinition<V> for Route<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, ctx: &MatchContext<'_>) -> RouteMatch<V> {
        match self.matcher.matches(ctx.url()) {
            Some(params) => (self.factory)(&params, ctx),
            None => RouteMatch::NoMatch,
        }
    }

    fn url_for(&self, args: &[(&str, &str)]) -> Option<Result<String, PatternError>> {
        self.pattern.as_ref().map(|p| p.url_for(args))
    }
}

impl<V> fmt::Debug for Route<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// The route used when nothing else matches. It has no predicate.
pub struct Fallback<V> {
    name: String,
    factory: Box<dyn Fn(&MatchContext<'_>) -> MatchResult<V> + Send + Sync>,
}

impl<V> Fallback<V> {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&MatchContext<'_>) -> MatchResult<V> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            factory: Box::new(factory),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn produce(&self, ctx: &MatchContext<'_>) -> MatchResult<V> {
        (self.factory)(ctx)
    }
}

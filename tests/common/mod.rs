//! Shared utilities for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use rauta::error::DisposeError;
use rauta::preload::{DataClient, PreloadedQuery, QuerySpec, QueryState};
use rauta::routing::{MatchResult, Route, RouteTable};

pub const ORIGIN: &str = "http://localhost:8030";

pub const PAGE: QuerySpec =
    QuerySpec::new("PageQuery", "query PageQuery($route: String!) { page }");

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

type Hook = Arc<dyn Fn(&QuerySpec, &Value) + Send + Sync>;

/// One preload the stub saw.
#[derive(Debug, Clone)]
pub struct Record {
    pub query: &'static str,
    pub variables: Value,
    pub disposals: usize,
}

#[derive(Default)]
struct State {
    records: Mutex<Vec<Record>>,
    fail_disposals: AtomicBool,
    fail_queries: AtomicBool,
    resolved: AtomicBool,
    hook: Mutex<Option<Hook>>,
}

/// Data client stub that records every preload and counts releases per
/// preload. Queries stay pending until `resolve_all`.
#[derive(Clone, Default)]
pub struct CountingClient {
    state: Arc<State>,
}

impl CountingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.records.lock().unwrap().clone()
    }

    pub fn preloads(&self) -> usize {
        self.state.records.lock().unwrap().len()
    }

    /// Disposal counts of the preloads made for `route`, in preload order.
    pub fn disposals_for(&self, route: &str) -> Vec<usize> {
        self.records()
            .into_iter()
            .filter(|r| r.variables["route"] == route)
            .map(|r| r.disposals)
            .collect()
    }

    /// Preloads not released yet.
    pub fn outstanding(&self) -> usize {
        self.records().iter().filter(|r| r.disposals == 0).count()
    }

    pub fn fail_disposals(&self, fail: bool) {
        self.state.fail_disposals.store(fail, Ordering::SeqCst);
    }

    /// Make every query report `Failed`, as after a transport error.
    pub fn fail_queries(&self, fail: bool) {
        self.state.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn resolve_all(&self) {
        self.state.resolved.store(true, Ordering::SeqCst);
    }

    /// Run `hook` inside every subsequent preload call, before it returns.
    pub fn set_hook(&self, hook: impl Fn(&QuerySpec, &Value) + Send + Sync + 'static) {
        *self.state.hook.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn clear_hook(&self) {
        self.state.hook.lock().unwrap().take();
    }
}

impl DataClient for CountingClient {
    fn preload(&self, query: &QuerySpec, variables: &Value) -> Arc<dyn PreloadedQuery> {
        let index = {
            let mut records = self.state.records.lock().unwrap();
            records.push(Record {
                query: query.name,
                variables: variables.clone(),
                disposals: 0,
            });
            records.len() - 1
        };

        let hook = self.state.hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(query, variables);
        }

        Arc::new(StubQuery {
            index,
            query: query.name,
            variables: variables.clone(),
            state: Arc::clone(&self.state),
        })
    }
}

struct StubQuery {
    index: usize,
    query: &'static str,
    variables: Value,
    state: Arc<State>,
}

impl PreloadedQuery for StubQuery {
    fn state(&self) -> QueryState {
        if self.state.fail_queries.load(Ordering::SeqCst) {
            QueryState::Failed(format!("{}: connection refused", self.query))
        } else if self.state.resolved.load(Ordering::SeqCst) {
            QueryState::Ready(json!({ "query": self.query, "variables": self.variables }))
        } else {
            QueryState::Pending
        }
    }

    fn dispose(&self) -> Result<(), DisposeError> {
        self.state.records.lock().unwrap()[self.index].disposals += 1;
        if self.state.fail_disposals.load(Ordering::SeqCst) {
            Err(DisposeError::new(self.query, "injected failure"))
        } else {
            Ok(())
        }
    }
}

/// Names of routes whose render closure ran, in call order.
#[derive(Clone, Default)]
pub struct RenderLog(Arc<Mutex<Vec<String>>>);

impl RenderLog {
    pub fn record(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|n| *n == name).count()
    }

    pub fn total(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// A table with one route per `(name, pattern)`, in order, and a
/// `fallback` route. Every route preloads `PAGE` with its name and the
/// extracted parameters; renders return `"<name>"` or `"<name> <params>"`.
pub fn table(routes: &[(&'static str, &'static str)], log: &RenderLog) -> RouteTable<String> {
    let mut builder = RouteTable::builder();
    for &(name, pattern) in routes {
        let log = log.clone();
        builder = builder.route(
            Route::new(name, pattern, move |params, ctx| {
                let args: Vec<String> = params.iter().map(|(_, v)| v.to_string()).collect();
                let handle = ctx.preload(&PAGE, json!({ "route": name, "args": args }));
                let view = if args.is_empty() {
                    name.to_string()
                } else {
                    format!("{name} {}", args.join(" "))
                };
                let log = log.clone();
                MatchResult::new(name, move || {
                    log.record(name);
                    view.clone()
                })
                .with_query(handle)
            })
            .unwrap(),
        );
    }

    let log = log.clone();
    builder.fallback("fallback", move |_| {
        let log = log.clone();
        MatchResult::new("fallback", move || {
            log.record("fallback");
            "fallback".to_string()
        })
    })
}

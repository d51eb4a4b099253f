//! The data client seam.
//!
//! The GraphQL transport and cache live outside this crate. The router only
//! needs the `preload`/`dispose` half of the client; `state` is the polling
//! contract the rendering layer uses to suspend until data is ready.

use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::DisposeError;

/// A static GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuerySpec {
    pub name: &'static str,
    pub document: &'static str,
}

impl QuerySpec {
    pub const fn new(name: &'static str, document: &'static str) -> Self {
        Self { name, document }
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Observable state of a preloaded query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Pending,
    Ready(Value),
    Failed(String),
}

impl QueryState {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }
}

/// A query the data client has started.
pub trait PreloadedQuery: Send + Sync {
    /// Current state. Never blocks.
    fn state(&self) -> QueryState;

    /// Release the query. Called at most once, by the owning `QueryHandle`.
    /// Must be callable whether the fetch succeeded, failed or is still in
    /// flight.
    fn dispose(&self) -> Result<(), DisposeError>;
}

/// Client that starts fetches.
pub trait DataClient: Send + Sync {
    /// Start fetching `query`. Returns immediately; errors surface through
    /// `PreloadedQuery::state`.
    fn preload(&self, query: &QuerySpec, variables: &Value) -> Arc<dyn PreloadedQuery>;
}

/// A client that answers every query immediately with its own name and
/// variables. Used by the CLI and for wiring tests.
#[derive(Debug, Default)]
pub struct EchoClient;

impl DataClient for EchoClient {
    fn preload(&self, query: &QuerySpec, variables: &Value) -> Arc<dyn PreloadedQuery> {
        tracing::debug!(query = query.name, %variables, "Echo preload");
        Arc::new(EchoQuery {
            payload: json!({ "query": query.name, "variables": variables }),
            disposed: AtomicBool::new(false),
        })
    }
}

struct EchoQuery {
    payload: Value,
    disposed: AtomicBool,
}

impl PreloadedQuery for EchoQuery {
    fn state(&self) -> QueryState {
        if self.disposed.load(Ordering::Acquire) {
            QueryState::Failed("query was released".to_string())
        } else {
            QueryState::Ready(self.payload.clone())
        }
    }

    fn dispose(&self) -> Result<(), DisposeError> {
        self.disposed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: QuerySpec = QuerySpec::new("TestQuery", "query TestQuery { a }");

    #[test]
    fn test_echo_client() {
        let query = EchoClient.preload(&Q, &json!({ "id": 1 }));
        assert_eq!(
            query.state(),
            QueryState::Ready(json!({ "query": "TestQuery", "variables": { "id": 1 } }))
        );

        query.dispose().unwrap();
        assert!(matches!(query.state(), QueryState::Failed(_)));
    }
}

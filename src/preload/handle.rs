//! Query handles and readers.

use std::fmt;
use std::sync::Arc;

use crate::error::DisposeError;
use crate::observability::metrics;
use crate::preload::client::{PreloadedQuery, QueryState};

/// Identifier of one preload call, unique per `Preloader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Owning reference to a preloaded query.
///
/// Exactly one release reaches the data client: either through
/// [`QueryHandle::dispose`] or, if the handle is dropped first, from `Drop`.
pub struct QueryHandle {
    id: HandleId,
    query: &'static str,
    inner: Arc<dyn PreloadedQuery>,
    released: bool,
}

impl QueryHandle {
    pub(crate) fn new(id: HandleId, query: &'static str, inner: Arc<dyn PreloadedQuery>) -> Self {
        Self {
            id,
            query,
            inner,
            released: false,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn query(&self) -> &'static str {
        self.query
    }

    /// A read-only view for render closures.
    pub fn reader(&self) -> QueryReader {
        QueryReader {
            query: self.query,
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn state(&self) -> QueryState {
        self.inner.state()
    }

    /// Release the query.
    pub fn dispose(mut self) -> Result<(), DisposeError> {
        self.release()
    }

    fn release(&mut self) -> Result<(), DisposeError> {
        self.released = true;
        let result = self.inner.dispose();
        metrics::record_dispose(result.is_ok());
        tracing::trace!(
            handle = %self.id,
            query = self.query,
            ok = result.is_ok(),
            "Query released"
        );
        result
    }
}

impl Drop for QueryHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::debug!(
            handle = %self.id,
            query = self.query,
            "Query handle dropped without dispose"
        );
        if let Err(e) = self.release() {
            tracing::warn!(handle = %self.id, error = %e, "Releasing dropped query failed");
        }
    }
}

impl fmt::Debug for QueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryHandle")
            .field("id", &self.id)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// Read-only, cloneable view of a preloaded query. Cannot release it.
#[derive(Clone)]
pub struct QueryReader {
    query: &'static str,
    inner: Arc<dyn PreloadedQuery>,
}

impl QueryReader {
    pub fn query(&self) -> &'static str {
        self.query
    }

    pub fn state(&self) -> QueryState {
        self.inner.state()
    }
}

impl fmt::Debug for QueryReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryReader")
            .field("query", &self.query)
            .field("state", &self.state())
            .finish()
    }
}

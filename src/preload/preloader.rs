//! Preload trigger.

use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;

use crate::observability::metrics;
use crate::preload::client::{DataClient, QuerySpec};
use crate::preload::handle::{HandleId, QueryHandle};

/// Starts fetches on behalf of route definitions.
#[derive(Clone)]
pub struct Preloader {
    client: Arc<dyn DataClient>,
    next_id: Arc<AtomicU64>,
}

impl Preloader {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self {
            client,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn preload(&self, query: &QuerySpec, variables: &Value) -> QueryHandle {
        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(handle = %id, query = query.name, %variables, "Preloading query");
        metrics::record_preload(query.name);

        let inner = self.client.preload(query, variables);
        QueryHandle::new(id, query.name, inner)
    }

    /// Number of preloads issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed) - 1
    }
}

/// Everything a route definition sees while matching.
pub struct MatchContext<'a> {
    url: &'a Url,
    preloader: &'a Preloader,
}

impl<'a> MatchContext<'a> {
    pub(crate) fn new(url: &'a Url, preloader: &'a Preloader) -> Self {
        Self { url, preloader }
    }

    pub fn url(&self) -> &Url {
        self.url
    }

    /// Start fetching `query` now. The returned handle must end up in the
    /// `MatchResult` this match produces.
    pub fn preload(&self, query: &QuerySpec, variables: Value) -> QueryHandle {
        self.preloader.preload(query, &variables)
    }
}

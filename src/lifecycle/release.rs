//! Deferred release of superseded routes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::config::ReleasePolicy;
use crate::routing::MatchResult;

struct Held<V> {
    superseded_at: u64,
    result: MatchResult<V>,
}

/// Owns superseded routes until it is safe to dispose them.
pub struct ReleaseQueue<V> {
    policy: ReleasePolicy,
    held: Mutex<Vec<Held<V>>>,
    released: AtomicU64,
    failures: AtomicU64,
}

impl<V> ReleaseQueue<V> {
    pub fn new(policy: ReleasePolicy) -> Self {
        Self {
            policy,
            held: Mutex::new(Vec::new()),
            released: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Take over `previous`, which was superseded by the route committed at
    /// `generation`. Must only be called after that commit.
    pub fn release(&self, previous: MatchResult<V>, generation: u64) {
        match self.policy {
            ReleasePolicy::AfterCommit => self.dispose(previous, generation),
            ReleasePolicy::AfterMount => {
                tracing::debug!(
                    generation,
                    route = previous.route(),
                    "Holding superseded route until mount"
                );
                self.held.lock().expect("release queue mutex poisoned").push(Held {
                    superseded_at: generation,
                    result: previous,
                });
            }
        }
    }

    /// The route committed at `generation` is mounted. Releases everything
    /// superseded at or before it. Returns how many routes were disposed.
    pub fn mounted(&self, generation: u64) -> usize {
        let ready: Vec<Held<V>> = {
            let mut held = self.held.lock().expect("release queue mutex poisoned");
            let (ready, keep): (Vec<Held<V>>, Vec<Held<V>>) = held
                .drain(..)
                .partition(|h| h.superseded_at <= generation);
            *held = keep;
            ready
        };

        let count = ready.len();
        for h in ready {
            self.dispose(h.result, h.superseded_at);
        }
        count
    }

    /// Dispose everything still held, regardless of mount state.
    pub fn flush(&self) -> usize {
        let all: Vec<Held<V>> = std::mem::take(
            &mut *self.held.lock().expect("release queue mutex poisoned"),
        );
        let count = all.len();
        for h in all {
            self.dispose(h.result, h.superseded_at);
        }
        count
    }

    /// Number of routes waiting for a mount signal.
    pub fn held(&self) -> usize {
        self.held.lock().expect("release queue mutex poisoned").len()
    }

    /// Routes disposed by this queue so far.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }

    /// Query releases that failed so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn dispose(&self, result: MatchResult<V>, generation: u64) {
        let failed = dispose_logged(result, generation, "superseded");
        self.released.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(failed as u64, Ordering::Relaxed);
    }
}

/// Dispose `result`, logging each failure. Returns the number of failed
/// query releases.
pub(crate) fn dispose_logged<V>(
    result: MatchResult<V>,
    generation: u64,
    reason: &'static str,
) -> usize {
    let route = result.route().to_string();
    match result.dispose() {
        Ok(()) => {
            tracing::debug!(generation, route = %route, reason, "Route disposed");
            0
        }
        Err(errors) => {
            for e in &errors {
                tracing::warn!(
                    generation,
                    route = %route,
                    reason,
                    error = %e,
                    "Route disposal failed"
                );
            }
            errors.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisposeError;
    use crate::preload::{DataClient, PreloadedQuery, Preloader, QuerySpec, QueryState};
    use crate::routing::{Route, RouteTable};
    use serde_json::Value;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use url::Url;

    const Q: QuerySpec = QuerySpec::new("Q", "query Q { q }");

    struct Client {
        disposals: Arc<AtomicUsize>,
        fail: bool,
    }

    struct Query {
        disposals: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PreloadedQuery for Query {
        fn state(&self) -> QueryState {
            QueryState::Pending
        }

        fn dispose(&self) -> Result<(), DisposeError> {
            self.disposals.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DisposeError::new("Q", "cache gone"))
            } else {
                Ok(())
            }
        }
    }

    impl DataClient for Client {
        fn preload(&self, _: &QuerySpec, _: &Value) -> Arc<dyn PreloadedQuery> {
            Arc::new(Query {
                disposals: self.disposals.clone(),
                fail: self.fail,
            })
        }
    }

    fn results(fail: bool, n: usize) -> (Vec<MatchResult<()>>, Arc<AtomicUsize>) {
        let disposals = Arc::new(AtomicUsize::new(0));
        let preloader = Preloader::new(Arc::new(Client {
            disposals: disposals.clone(),
            fail,
        }));
        let table: RouteTable<()> = RouteTable::builder()
            .route(
                Route::new("page", "/", |_, ctx| {
                    MatchResult::new("page", || ()).with_query(ctx.preload(&Q, Value::Null))
                })
                .unwrap(),
            )
            .fallback("fallback", |_| MatchResult::new("fallback", || ()));
        let url = Url::parse("http://localhost/").unwrap();
        let results = (0..n).map(|_| table.match_route(&url, &preloader)).collect();
        (results, disposals)
    }

    #[test]
    fn test_after_commit_disposes_immediately() {
        let (mut results, disposals) = results(false, 1);
        let queue = ReleaseQueue::new(ReleasePolicy::AfterCommit);

        queue.release(results.remove(0), 1);
        assert_eq!(disposals.load(Ordering::SeqCst), 1);
        assert_eq!(queue.released(), 1);
        assert_eq!(queue.held(), 0);
    }

    #[test]
    fn test_after_mount_waits_for_generation() {
        let (results, disposals) = results(false, 3);
        let queue = ReleaseQueue::new(ReleasePolicy::AfterMount);

        for (result, generation) in results.into_iter().zip([1, 2, 3]) {
            queue.release(result, generation);
        }
        assert_eq!(disposals.load(Ordering::SeqCst), 0);
        assert_eq!(queue.held(), 3);

        assert_eq!(queue.mounted(2), 2);
        assert_eq!(disposals.load(Ordering::SeqCst), 2);

        // Mount signals for older generations release nothing new.
        assert_eq!(queue.mounted(1), 0);

        assert_eq!(queue.flush(), 1);
        assert_eq!(disposals.load(Ordering::SeqCst), 3);
        assert_eq!(queue.flush(), 0);
        assert_eq!(queue.released(), 3);
    }

    #[test]
    fn test_failures_are_counted_not_propagated() {
        let (mut results, disposals) = results(true, 1);
        let queue = ReleaseQueue::new(ReleasePolicy::AfterCommit);

        queue.release(results.remove(0), 1);
        assert_eq!(disposals.load(Ordering::SeqCst), 1);
        assert_eq!(queue.released(), 1);
        assert_eq!(queue.failures(), 1);
    }
}

//! Metrics collection.
//!
//! # Metrics
//! - `rauta_navigations_total` (counter): navigation attempts by outcome
//!   (`committed`, `superseded`, `prevented`, `unchanged`, `shut_down`)
//! - `rauta_preloads_total` (counter): preloads by query name
//! - `rauta_disposals_total` (counter): query releases by result (`ok`, `error`)

/// Record the outcome of one navigation attempt.
pub fn record_navigation(outcome: &'static str) {
    ::metrics::counter!("rauta_navigations_total", "outcome" => outcome).increment(1);
}

/// Record a preload issued during matching.
pub fn record_preload(query: &'static str) {
    ::metrics::counter!("rauta_preloads_total", "query" => query).increment(1);
}

/// Record one query release.
pub fn record_dispose(ok: bool) {
    let result = if ok { "ok" } else { "error" };
    ::metrics::counter!("rauta_disposals_total", "result" => result).increment(1);
}

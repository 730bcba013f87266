//! Prometheus metrics for the ticket store.

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter};

/// Time spent rewriting the ticket file.
pub static STORE_PERSIST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "ticketdesk_store_persist_duration_seconds",
            "Duration of full ticket file rewrites",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5, 1.0]),
    )
    .expect("valid metric definition")
});

/// Ticket file rewrites that failed.
pub static STORE_PERSIST_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketdesk_store_persist_failures_total",
        "Total failed ticket file rewrites",
    )
    .expect("valid metric definition")
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(STORE_PERSIST_DURATION.clone()),
        Box::new(STORE_PERSIST_FAILURES.clone()),
    ]
}

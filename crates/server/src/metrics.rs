//! Prometheus metrics for observability.
//!
//! HTTP request metrics plus ticket counters; store-level metrics come from
//! `ticketdesk_core::metrics` and are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};
use regex_lite::Regex;
use tracing::{error, warn};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "ticketdesk_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .expect("valid metric definition")
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ticketdesk_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("valid metric definition")
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "ticketdesk_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .expect("valid metric definition")
});

// =============================================================================
// Ticket Metrics
// =============================================================================

/// Tickets created total.
pub static TICKETS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketdesk_tickets_created_total",
        "Total tickets created since startup",
    )
    .expect("valid metric definition")
});

/// Tickets deleted total.
pub static TICKETS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "ticketdesk_tickets_deleted_total",
        "Total tickets deleted since startup",
    )
    .expect("valid metric definition")
});

/// Tickets currently stored (collected dynamically).
pub static TICKETS_STORED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("ticketdesk_tickets_stored", "Current number of stored tickets")
        .expect("valid metric definition")
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // HTTP
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        // Tickets
        Box::new(TICKETS_CREATED_TOTAL.clone()),
        Box::new(TICKETS_DELETED_TOTAL.clone()),
        Box::new(TICKETS_STORED.clone()),
    ];

    // Core metrics (ticket store persistence)
    for metric in metrics
        .into_iter()
        .chain(ticketdesk_core::metrics::all_metrics())
    {
        if let Err(e) = registry.register(metric) {
            warn!("Failed to register metric: {}", e);
        }
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &AppState) {
    if let Ok(tickets) = state.ticket_store().list() {
        TICKETS_STORED.set(tickets.len() as i64);
    }
}

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid path regex"));

/// Normalize a path for metric labels (replace ticket ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}

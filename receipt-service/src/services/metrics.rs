//! Prometheus metrics for receipt-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// Receipt creations by payment method.
pub static RECEIPTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "receiptr_receipts_total",
        "Total number of receipts created, by payment method",
        &["payment_method"]
    )
    .expect("Failed to register receipts_total")
});

/// Registrations and logins by outcome.
pub static AUTH_ATTEMPTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "receiptr_auth_attempts_total",
        "Authentication attempts by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("Failed to register auth_attempts_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "receiptr_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Receipt emails sent, by outcome.
pub static RECEIPT_EMAILS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "receiptr_receipt_emails_total",
        "Receipt emails attempted, by outcome",
        &["outcome"]
    )
    .expect("Failed to register receipt_emails_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&RECEIPTS_TOTAL);
    Lazy::force(&AUTH_ATTEMPTS_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&RECEIPT_EMAILS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}

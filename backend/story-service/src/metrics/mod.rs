//! Prometheus metrics for story-service.
//!
//! Store round-trips are counted and timed per operation; `/metrics` renders
//! the default registry in text format.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Instant;

lazy_static! {
    /// Store operations segmented by operation and outcome (hit, miss, error).
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "story_store_operations_total",
        "Resource store operations segmented by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("failed to register story_store_operations_total");

    /// Store round-trip latency per operation.
    pub static ref STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "story_store_operation_duration_seconds",
        "Resource store round-trip duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register story_store_operation_duration_seconds");
}

/// Record one store round-trip that started at `started`.
///
/// `Ok(Some(_))` counts as a hit, `Ok(None)` as a miss.
pub fn observe_store_op<T, E>(operation: &str, started: Instant, result: &Result<Option<T>, E>) {
    let outcome = match result {
        Ok(Some(_)) => "hit",
        Ok(None) => "miss",
        Err(_) => "error",
    };

    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

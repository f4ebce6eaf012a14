use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Submission log metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "store_operations_total",
        "Total number of submission log operations",
        &["operation", "status"]
    )
    .unwrap();

    // Reconcile cache: hit = status served from the session cache,
    // miss = first touch, a durable query was made
    pub static ref RECONCILE_CACHE_TOTAL: IntCounterVec = register_int_counter_vec!(
        "reconcile_cache_total",
        "Status cache hit/miss ratio during reconciliation",
        &["result"]
    )
    .unwrap();

    pub static ref RECONCILE_FALLBACKS_TOTAL: IntCounter = register_int_counter!(
        "reconcile_fallbacks_total",
        "Reconciliations that degraded to not-cleared after a query failure"
    )
    .unwrap();

    // Business metrics
    pub static ref SUBMISSIONS_RECORDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "submissions_recorded_total",
        "Graded submissions appended to the durable log",
        &["correct"]
    )
    .unwrap();

    pub static ref CLEARS_TOTAL: IntCounter = register_int_counter!(
        "clears_total",
        "First-time problem clears"
    )
    .unwrap();

    pub static ref LOCKOUTS_TOTAL: IntCounter = register_int_counter!(
        "lockouts_total",
        "Sessions that exhausted the attempt budget on a problem"
    )
    .unwrap();

    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "sessions_total",
        "Total number of team sessions",
        &["event"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sessions_active",
        "Currently active team sessions"
    )
    .unwrap();
}

pub fn record_store_operation(operation: &str, status: &str) {
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();
}

pub fn record_cache_hit() {
    RECONCILE_CACHE_TOTAL.with_label_values(&["hit"]).inc();
}

pub fn record_cache_miss() {
    RECONCILE_CACHE_TOTAL.with_label_values(&["miss"]).inc();
}

/// Render all registered metrics in the Prometheus text format.
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("metrics are not valid UTF-8: {}", e)))
}

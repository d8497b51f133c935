use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus 指标（默认 registry）
pub static REGISTRATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "helm_broker_registrations_total",
        "Total successful service registrations"
    )
    .expect("register registrations_total")
});

pub static PROVISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "helm_broker_provisions_total",
        "Total provision requests by outcome",
        &["outcome"]
    )
    .expect("register provisions_total")
});

pub static LAST_OPERATIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "helm_broker_last_operations_total",
        "Total last_operation polls answered"
    )
    .expect("register last_operations_total")
});

pub static INSTALL_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "helm_broker_install_duration_seconds",
        "Duration of provision requests including helm install, in seconds",
        vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]
    )
    .expect("register install_duration")
});

pub fn record_provision(success: bool, seconds: f64) {
    let outcome = if success { "success" } else { "failure" };
    PROVISIONS_TOTAL.with_label_values(&[outcome]).inc();
    INSTALL_DURATION.observe(seconds);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

pub async fn metrics_handler() -> (axum::http::StatusCode, String) {
    encode_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposition_contains_broker_metrics() {
        REGISTRATIONS_TOTAL.inc();
        record_provision(true, 0.2);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("helm_broker_registrations_total"));
        assert!(body.contains("helm_broker_provisions_total{outcome=\"success\"}"));
    }
}

// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::warn;

// The global recorder can be installed only once per process; tests build
// many routers, so the handle is shared.
static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install (once) the Prometheus recorder and publish static gauges.
    /// Returns `None` if another recorder already owns the process.
    pub fn init(model_loaded: bool, crisis_threshold: f64) -> Option<Self> {
        let handle = HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!(error = %e, "prometheus recorder not installed");
                    None
                }
            })
            .clone()?;

        gauge!("model_loaded").set(if model_loaded { 1.0 } else { 0.0 });
        gauge!("prediction_crisis_threshold").set(crisis_threshold);

        Some(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router<S>(&self) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_sentiment(method: &'static str) {
    counter!("sentiment_requests_total", "method" => method).increment(1);
}

pub fn record_prediction(label: &'static str, duration_ms: f64) {
    counter!("predictions_total", "label" => label).increment(1);
    histogram!("prediction_duration_ms").record(duration_ms);
}

pub fn record_crisis() {
    counter!("crisis_detections_total").increment(1);
}

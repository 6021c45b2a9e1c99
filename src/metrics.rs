use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once, from the binary.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
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

fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "gateway_upstream_requests_total",
            "Upstream calls by upstream and outcome."
        );
        describe_histogram!(
            "gateway_upstream_duration_ms",
            "Upstream call latency in milliseconds."
        );
    });
}

/// Record one upstream call. A no-op until a recorder is installed.
pub fn record_upstream(upstream: &'static str, outcome: &'static str, elapsed_ms: f64) {
    counter!("gateway_upstream_requests_total", "upstream" => upstream, "outcome" => outcome)
        .increment(1);
    histogram!("gateway_upstream_duration_ms", "upstream" => upstream).record(elapsed_ms);
}

use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::report::RiskAssessment;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("risk_assessments_total", "Total risk assessments computed.");
        describe_gauge!("risk_score_current", "Most recent overall risk score (0-100).");
        describe_gauge!(
            "risk_regime_code",
            "Most recent regime band (0=healthy .. 3=unwind)."
        );
    });
}

/// Record telemetry for one assessment. No-op when no recorder is installed
/// (library use, tests).
pub fn record_assessment(a: &RiskAssessment) {
    ensure_metrics_described();
    counter!("risk_assessments_total").increment(1);
    gauge!("risk_score_current").set(f64::from(a.overall_score));
    gauge!("risk_regime_code").set(f64::from(a.regime.code()));
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Call once, from the binary.
    pub fn init() -> Self {
        let builder = PrometheusBuilder::new();
        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");
        ensure_metrics_described();
        Self { handle }
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

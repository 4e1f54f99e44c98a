// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod history;
pub mod metrics;
pub mod providers;
pub mod report;
pub mod risk;
pub mod snapshot;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::report::{RiskAssessment, RiskDriver};
pub use crate::risk::regime::Regime;
pub use crate::risk::rules::RiskRuleSet;
pub use crate::risk::score::assess;
pub use crate::risk::weights::Weights;
pub use crate::risk::{MetricSet, RiskCategory, RiskInputs};

/// Build a router with demo data sources and default config paths.
/// This is what the binary serves and what router-level tests drive.
pub fn app() -> axum::Router {
    api::create_router(AppState::with_mock_sources())
}

/// Compute one assessment with the compiled-in seed rules and default
/// weights. The single-call library entry point.
pub fn compute_overall_score(inputs: &RiskInputs) -> RiskAssessment {
    assess(inputs, &RiskRuleSet::default_seed(), &Weights::default())
}

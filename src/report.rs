//! Assessment report types: the standardized output shape for an overall
//! score, its per-category breakdown, the regime band, and the weighted
//! drivers behind it (explainability for the dashboard's driver list).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::regime::Regime;
use crate::risk::RiskCategory;

/// One category's weighted contribution to the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskDriver {
    pub category: RiskCategory,
    /// The category score in [0, 100].
    pub score: u32,
    pub weight: f64,
    /// `score × weight`, rounded to two decimals for display.
    pub contribution: f64,
}

/// Complete assessment, the shape returned by the API and the library entry
/// point alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_score: u32,
    pub category_scores: BTreeMap<RiskCategory, u32>,
    pub regime: Regime,
    pub regime_color: String,
    /// Sorted by contribution, highest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drivers: Vec<RiskDriver>,
    pub generated_at: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn new(
        overall_score: u32,
        category_scores: BTreeMap<RiskCategory, u32>,
        drivers: Vec<RiskDriver>,
    ) -> Self {
        let regime = Regime::from_score(overall_score);
        Self {
            overall_score,
            category_scores,
            regime,
            regime_color: regime.color().to_string(),
            drivers,
            generated_at: Utc::now(),
        }
    }

    pub fn score_for(&self, cat: RiskCategory) -> u32 {
        self.category_scores.get(&cat).copied().unwrap_or(0)
    }

    /// Strongest driver, if any contributed at all.
    pub fn top_driver(&self) -> Option<&RiskDriver> {
        self.drivers.first()
    }
}

/// Round to two decimals for display-facing contribution values.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

//! Regime classifier: overall score → labeled risk band.
//!
//! Bands are inclusive-low/exclusive-high on the lower bound and cover every
//! integer in [0, 100]; classification is display-only and feeds nothing back
//! into the score.

use serde::{Deserialize, Serialize};

/// Ordered risk regimes, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Regime {
    #[serde(rename = "Healthy Expansion")]
    HealthyExpansion,
    #[serde(rename = "Late-Cycle Froth")]
    LateCycleFroth,
    #[serde(rename = "Bubble Risk Elevated")]
    BubbleRiskElevated,
    #[serde(rename = "Bubble / Unwind Risk")]
    BubbleUnwindRisk,
}

impl Regime {
    /// Classify an overall score. Total over the capped [0, 100] range;
    /// anything at or above 75 lands in the top band.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=34 => Regime::HealthyExpansion,
            35..=54 => Regime::LateCycleFroth,
            55..=74 => Regime::BubbleRiskElevated,
            _ => Regime::BubbleUnwindRisk,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Regime::HealthyExpansion => "Healthy Expansion",
            Regime::LateCycleFroth => "Late-Cycle Froth",
            Regime::BubbleRiskElevated => "Bubble Risk Elevated",
            Regime::BubbleUnwindRisk => "Bubble / Unwind Risk",
        }
    }

    /// Indicator color used by dashboards and gauges.
    pub fn color(&self) -> &'static str {
        match self {
            Regime::HealthyExpansion => "green",
            Regime::LateCycleFroth => "yellow",
            Regime::BubbleRiskElevated => "orange",
            Regime::BubbleUnwindRisk => "red",
        }
    }

    /// Numeric code 0-3 for the regime gauge metric.
    pub fn code(&self) -> u32 {
        match self {
            Regime::HealthyExpansion => 0,
            Regime::LateCycleFroth => 1,
            Regime::BubbleRiskElevated => 2,
            Regime::BubbleUnwindRisk => 3,
        }
    }
}

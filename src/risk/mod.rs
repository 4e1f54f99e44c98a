//! Risk scoring pipeline: metric inputs → category scores → overall score.
//!
//! Everything in this module tree is pure and I/O-free except the hot-reload
//! wrappers in `rules` and `weights`, which poll config file mtimes the same
//! way the rest of the runtime config does.

pub mod regime;
pub mod rules;
pub mod score;
pub mod weights;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The five risk categories, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Fundamentals,
    Valuation,
    Leverage,
    Options,
    Sentiment,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Fundamentals,
        RiskCategory::Valuation,
        RiskCategory::Leverage,
        RiskCategory::Options,
        RiskCategory::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Fundamentals => "fundamentals",
            RiskCategory::Valuation => "valuation",
            RiskCategory::Leverage => "leverage",
            RiskCategory::Options => "options",
            RiskCategory::Sentiment => "sentiment",
        }
    }
}

/// Named numeric metrics for one category.
///
/// Missing keys read as 0.0; rule evaluation never fails on absent input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet(BTreeMap<String, f64>);

impl MetricSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value for `name`, defaulting to 0.0 when the key is absent.
    pub fn metric(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for MetricSet {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One metric record per category; the full input to an assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskInputs {
    pub fundamentals: MetricSet,
    pub valuation: MetricSet,
    pub leverage: MetricSet,
    pub options: MetricSet,
    pub sentiment: MetricSet,
}

impl RiskInputs {
    pub fn category(&self, cat: RiskCategory) -> &MetricSet {
        match cat {
            RiskCategory::Fundamentals => &self.fundamentals,
            RiskCategory::Valuation => &self.valuation,
            RiskCategory::Leverage => &self.leverage,
            RiskCategory::Options => &self.options,
            RiskCategory::Sentiment => &self.sentiment,
        }
    }

    pub fn category_mut(&mut self, cat: RiskCategory) -> &mut MetricSet {
        match cat {
            RiskCategory::Fundamentals => &mut self.fundamentals,
            RiskCategory::Valuation => &mut self.valuation,
            RiskCategory::Leverage => &mut self.leverage,
            RiskCategory::Options => &mut self.options,
            RiskCategory::Sentiment => &mut self.sentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metric_reads_zero() {
        let m: MetricSet = [("pe_ratio", 65.0)].into_iter().collect();
        assert_eq!(m.metric("pe_ratio"), 65.0);
        assert_eq!(m.metric("price_to_sales"), 0.0);
    }

    #[test]
    fn empty_body_deserializes_to_empty_inputs() {
        let inputs: RiskInputs = serde_json::from_str("{}").unwrap();
        for cat in RiskCategory::ALL {
            assert!(inputs.category(cat).is_empty());
        }
    }

    #[test]
    fn category_names_round_trip_serde() {
        for cat in RiskCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
            let back: RiskCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cat);
        }
    }
}

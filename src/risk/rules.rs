//! Threshold rule sets for the five risk categories (hot-reloaded from
//! `config/risk_rules.json` or a TOML equivalent).
//!
//! Minimal DSL for conditions over named metrics:
//! - a `Rule` carries a list of `when` conditions; ALL must hold for the rule
//!   to fire (conjunction)
//! - each condition is `{metric, op, value}` with `op` either `above` or
//!   `below`, both strict comparisons
//! - a fired rule adds its non-negative `points`; rules within a category are
//!   independent and additive, and the category score is capped at 100
//!
//! Thresholds are calibration data, not business rules: the compiled-in
//! `default_seed()` is used when no config file exists, and the file is
//! hot-reloaded on mtime change at each `current()` call. A file that fails
//! to parse keeps the previous rule set.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

use anyhow::{Context, Result};
use tracing::warn;

use super::{MetricSet, RiskCategory};

pub const DEFAULT_RULES_PATH: &str = "config/risk_rules.json";
pub const ENV_RULES_PATH: &str = "RISK_RULES_PATH";

/// Strict comparison against a threshold value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Below,
}

/// One metric comparison, e.g. `pe_ratio above 50`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub metric: String,
    pub op: Comparison,
    pub value: f64,
}

impl Condition {
    /// Evaluate against a metric set; absent metrics read as 0.0.
    pub fn holds(&self, metrics: &MetricSet) -> bool {
        let v = metrics.metric(&self.metric);
        match self.op {
            Comparison::Above => v > self.value,
            Comparison::Below => v < self.value,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: Option<String>,
    pub when: Vec<Condition>,
    pub points: u32,
}

impl Rule {
    pub fn fires(&self, metrics: &MetricSet) -> bool {
        self.when.iter().all(|c| c.holds(metrics))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRules {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Rule lists for all five categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRuleSet {
    pub fundamentals: CategoryRules,
    pub valuation: CategoryRules,
    pub leverage: CategoryRules,
    pub options: CategoryRules,
    pub sentiment: CategoryRules,
}

impl RiskRuleSet {
    pub fn for_category(&self, cat: RiskCategory) -> &CategoryRules {
        match cat {
            RiskCategory::Fundamentals => &self.fundamentals,
            RiskCategory::Valuation => &self.valuation,
            RiskCategory::Leverage => &self.leverage,
            RiskCategory::Options => &self.options,
            RiskCategory::Sentiment => &self.sentiment,
        }
    }

    /// Compiled-in calibration used when no config file is present.
    pub fn default_seed() -> Self {
        fn cond(metric: &str, op: Comparison, value: f64) -> Condition {
            Condition {
                metric: metric.to_string(),
                op,
                value,
            }
        }
        fn rule(name: &str, when: Vec<Condition>, points: u32) -> Rule {
            Rule {
                name: Some(name.to_string()),
                when,
                points,
            }
        }

        Self {
            fundamentals: CategoryRules {
                rules: vec![
                    rule(
                        "negative_fcf_margin",
                        vec![cond("fcf_margin", Comparison::Below, 0.0)],
                        30,
                    ),
                    rule(
                        "growth_price_divergence",
                        vec![
                            cond("revenue_growth", Comparison::Below, 0.1),
                            cond("price_change", Comparison::Above, 0.2),
                        ],
                        25,
                    ),
                ],
            },
            valuation: CategoryRules {
                rules: vec![
                    rule(
                        "elevated_pe",
                        vec![cond("pe_ratio", Comparison::Above, 50.0)],
                        30,
                    ),
                    rule(
                        "stretched_price_to_sales",
                        vec![cond("price_to_sales", Comparison::Above, 20.0)],
                        25,
                    ),
                ],
            },
            leverage: CategoryRules {
                rules: vec![
                    rule(
                        "widening_credit_spreads",
                        vec![cond("credit_spreads", Comparison::Above, 2.0)],
                        30,
                    ),
                    rule(
                        "narrow_breadth",
                        vec![cond("breadth", Comparison::Below, 0.3)],
                        25,
                    ),
                ],
            },
            options: CategoryRules {
                rules: vec![
                    rule(
                        "complacent_iv",
                        vec![cond("iv_level", Comparison::Below, 0.2)],
                        30,
                    ),
                    rule("steep_skew", vec![cond("skew", Comparison::Above, 0.1)], 25),
                ],
            },
            sentiment: CategoryRules {
                rules: vec![
                    rule(
                        "euphoric_news",
                        vec![cond("news_sentiment", Comparison::Above, 0.8)],
                        20,
                    ),
                    rule(
                        "crowded_social",
                        vec![cond("social_sentiment", Comparison::Above, 0.9)],
                        20,
                    ),
                ],
            },
        }
    }
}

/// Load a rule set from an explicit path. Supports TOML or JSON formats.
pub fn load_rules_from(path: &Path) -> Result<RiskRuleSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading risk rules from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_rules(&content, ext.as_str())
}

fn parse_rules(s: &str, hint_ext: &str) -> Result<RiskRuleSet> {
    if hint_ext == "toml" {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    if hint_ext != "toml" {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    Err(anyhow::anyhow!("unsupported risk rules format"))
}

fn rules_path() -> PathBuf {
    std::env::var(ENV_RULES_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_RULES_PATH))
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
/// Starts from `default_seed()` until a file is seen.
#[derive(Debug)]
pub struct HotReloadRules {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    rules: RiskRuleSet,
    last_modified: Option<SystemTime>,
}

impl HotReloadRules {
    /// Create with a path (env `RISK_RULES_PATH` / default if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(rules_path);
        Self {
            path,
            inner: RwLock::new(State {
                rules: RiskRuleSet::default_seed(),
                last_modified: None,
            }),
        }
    }

    /// Get the latest rules, reloading if the config file changed.
    pub fn current(&self) -> RiskRuleSet {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().expect("rules lock poisoned");
                guard.last_modified != Some(mtime)
            }
            // No file: stay on whatever is loaded (seed by default).
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().expect("rules lock poisoned").rules.clone();
        }

        let mut guard = self.inner.write().expect("rules lock poisoned");
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    match load_rules_from(&self.path) {
                        Ok(rules) => {
                            guard.rules = rules;
                        }
                        Err(e) => {
                            warn!(error = ?e, path = %self.path.display(), "keeping previous risk rules");
                        }
                    }
                    // Either way, don't retry until the file changes again.
                    guard.last_modified = Some(mtime);
                }
            }
        }
        guard.rules.clone()
    }

    /// Drop the cached mtime so the next `current()` re-reads the file.
    pub fn force_reload(&self) {
        self.inner.write().expect("rules lock poisoned").last_modified = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_matches_calibration_table() {
        let seed = RiskRuleSet::default_seed();
        assert_eq!(seed.fundamentals.rules.len(), 2);
        assert_eq!(seed.fundamentals.rules[0].points, 30);
        assert_eq!(seed.fundamentals.rules[1].when.len(), 2);
        assert_eq!(seed.sentiment.rules[0].points, 20);
        assert_eq!(seed.sentiment.rules[1].points, 20);
    }

    #[test]
    fn conjunction_requires_all_conditions() {
        let seed = RiskRuleSet::default_seed();
        let divergence = &seed.fundamentals.rules[1];

        // revenue_growth 0.15 is not below 0.1 -> must not fire.
        let m: MetricSet = [("revenue_growth", 0.15), ("price_change", 0.25)]
            .into_iter()
            .collect();
        assert!(!divergence.fires(&m));

        let m: MetricSet = [("revenue_growth", 0.05), ("price_change", 0.25)]
            .into_iter()
            .collect();
        assert!(divergence.fires(&m));
    }

    #[test]
    fn strict_comparison_at_threshold() {
        let seed = RiskRuleSet::default_seed();
        let spreads = &seed.leverage.rules[0];
        let m: MetricSet = [("credit_spreads", 2.0)].into_iter().collect();
        assert!(!spreads.fires(&m), "exactly 2 is not above 2");
        let m: MetricSet = [("credit_spreads", 2.5)].into_iter().collect();
        assert!(spreads.fires(&m));
    }

    #[test]
    fn parses_json_and_toml() {
        let json = r#"{
            "valuation": { "rules": [
                { "name": "elevated_pe",
                  "when": [ { "metric": "pe_ratio", "op": "above", "value": 50.0 } ],
                  "points": 30 }
            ] }
        }"#;
        let rs = parse_rules(json, "json").unwrap();
        assert_eq!(rs.valuation.rules.len(), 1);
        assert!(rs.fundamentals.rules.is_empty());

        let toml_src = r#"
            [[valuation.rules]]
            name = "elevated_pe"
            points = 30
            when = [{ metric = "pe_ratio", op = "above", value = 50.0 }]
        "#;
        let rs = parse_rules(toml_src, "toml").unwrap();
        assert_eq!(rs.valuation.rules.len(), 1);
        assert_eq!(rs.valuation.rules[0].points, 30);
    }

    #[test]
    fn missing_file_keeps_seed() {
        let hot = HotReloadRules::new(Some(Path::new("does/not/exist.json")));
        let rules = hot.current();
        assert_eq!(rules.valuation.rules.len(), 2);
    }
}

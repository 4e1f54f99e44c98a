//! # Scoring core
//! Pure, testable logic that maps `(inputs, rules, weights)` → `RiskAssessment`.
//! No I/O, no hidden state; calling twice with identical inputs yields
//! identical category and overall scores.

use std::collections::BTreeMap;

use crate::report::{round2, RiskAssessment, RiskDriver};

use super::rules::{CategoryRules, RiskRuleSet};
use super::weights::Weights;
use super::{MetricSet, RiskCategory, RiskInputs};

/// Score one category: sum the points of every fired rule, cap at 100.
/// All contributions are non-negative, so no floor at 0 is needed.
pub fn score_category(rules: &CategoryRules, metrics: &MetricSet) -> u32 {
    let sum: u32 = rules
        .rules
        .iter()
        .filter(|r| r.fires(metrics))
        .map(|r| r.points)
        .sum();
    sum.min(100)
}

/// Score all five categories against their rule lists.
pub fn category_scores(ruleset: &RiskRuleSet, inputs: &RiskInputs) -> BTreeMap<RiskCategory, u32> {
    RiskCategory::ALL
        .iter()
        .map(|&cat| {
            (
                cat,
                score_category(ruleset.for_category(cat), inputs.category(cat)),
            )
        })
        .collect()
}

/// Weighted overall score: `min(100, floor(Σ scoreᵢ × wᵢ))`.
///
/// With validated weights (sum 1.0) and in-range category scores the pre-cap
/// sum is already ≤ 100; the cap only guards out-of-range configurations.
/// The small nudge before `floor` keeps an intended integer like 46.0 from
/// truncating to 45 when the binary representation lands at 45.999...96.
pub fn overall_score(scores: &BTreeMap<RiskCategory, u32>, weights: &Weights) -> u32 {
    let raw: f64 = RiskCategory::ALL
        .iter()
        .map(|&cat| {
            let s = scores.get(&cat).copied().unwrap_or(0);
            f64::from(s) * weights.weight_for(cat)
        })
        .sum();
    let truncated = (raw + 1e-9).floor() as u32;
    truncated.min(100)
}

/// Full assessment: category scores, weighted overall, regime band, and the
/// per-category drivers sorted by contribution.
pub fn assess(inputs: &RiskInputs, ruleset: &RiskRuleSet, weights: &Weights) -> RiskAssessment {
    let scores = category_scores(ruleset, inputs);
    let overall = overall_score(&scores, weights);

    let mut drivers: Vec<RiskDriver> = scores
        .iter()
        .map(|(&category, &score)| {
            let weight = weights.weight_for(category);
            RiskDriver {
                category,
                score,
                weight,
                contribution: round2(f64::from(score) * weight),
            }
        })
        .collect();
    // Highest contribution first; tie-break on category order for determinism.
    drivers.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.category.cmp(&b.category))
    });

    RiskAssessment::new(overall, scores, drivers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::regime::Regime;

    fn seed() -> RiskRuleSet {
        RiskRuleSet::default_seed()
    }

    #[test]
    fn fundamentals_rule_one_only() {
        // fcf_margin < 0 fires; revenue_growth 0.15 keeps the divergence
        // rule quiet even though price_change is above 0.2.
        let m: MetricSet = [
            ("fcf_margin", -0.02),
            ("revenue_growth", 0.15),
            ("price_change", 0.25),
        ]
        .into_iter()
        .collect();
        assert_eq!(score_category(&seed().fundamentals, &m), 30);
    }

    #[test]
    fn valuation_both_rules_additive() {
        let m: MetricSet = [("pe_ratio", 65.0), ("price_to_sales", 25.0)]
            .into_iter()
            .collect();
        assert_eq!(score_category(&seed().valuation, &m), 55);
    }

    #[test]
    fn empty_metrics_fire_default_zero_rules() {
        // All metrics default to 0.0: iv_level 0.0 < 0.2 fires, skew 0.0
        // does not exceed 0.1.
        let m = MetricSet::new();
        assert_eq!(score_category(&seed().options, &m), 30);
        // pe_ratio 0 and price_to_sales 0 are below both thresholds.
        assert_eq!(score_category(&seed().valuation, &m), 0);
    }

    #[test]
    fn category_score_capped_at_100() {
        use crate::risk::rules::{CategoryRules, Comparison, Condition, Rule};
        let rules = CategoryRules {
            rules: (0..3)
                .map(|_| Rule {
                    name: None,
                    when: vec![Condition {
                        metric: "x".into(),
                        op: Comparison::Above,
                        value: 1.0,
                    }],
                    points: 40,
                })
                .collect(),
        };
        let m: MetricSet = [("x", 2.0)].into_iter().collect();
        assert_eq!(score_category(&rules, &m), 100);
    }

    #[test]
    fn worked_example_overall_46() {
        let scores: BTreeMap<RiskCategory, u32> = [
            (RiskCategory::Fundamentals, 30),
            (RiskCategory::Valuation, 55),
            (RiskCategory::Leverage, 55),
            (RiskCategory::Options, 55),
            (RiskCategory::Sentiment, 40),
        ]
        .into_iter()
        .collect();
        // 9 + 13.75 + 11 + 8.25 + 4 = 46
        assert_eq!(overall_score(&scores, &Weights::default()), 46);
    }

    #[test]
    fn overall_range_holds_for_extremes() {
        let w = Weights::default();
        let zeros: BTreeMap<_, _> = RiskCategory::ALL.iter().map(|&c| (c, 0)).collect();
        assert_eq!(overall_score(&zeros, &w), 0);
        let maxed: BTreeMap<_, _> = RiskCategory::ALL.iter().map(|&c| (c, 100)).collect();
        assert_eq!(overall_score(&maxed, &w), 100);
    }

    #[test]
    fn assess_is_idempotent() {
        let mut inputs = RiskInputs::default();
        inputs.valuation = [("pe_ratio", 65.0), ("price_to_sales", 25.0)]
            .into_iter()
            .collect();
        let ruleset = seed();
        let w = Weights::default();
        let a = assess(&inputs, &ruleset, &w);
        let b = assess(&inputs, &ruleset, &w);
        assert_eq!(a.overall_score, b.overall_score);
        assert_eq!(a.category_scores, b.category_scores);
        assert_eq!(a.regime, b.regime);
    }

    #[test]
    fn drivers_sorted_by_contribution() {
        let mut inputs = RiskInputs::default();
        inputs.valuation = [("pe_ratio", 65.0), ("price_to_sales", 25.0)]
            .into_iter()
            .collect();
        inputs.sentiment = [("news_sentiment", 0.85)].into_iter().collect();
        // Options scores 30 via the zero-default iv rule.
        let a = assess(&inputs, &seed(), &Weights::default());

        // valuation 55×0.25=13.75 beats options 30×0.15=4.5 and sentiment 20×0.10=2.0
        assert_eq!(a.top_driver().unwrap().category, RiskCategory::Valuation);
        let contributions: Vec<f64> = a.drivers.iter().map(|d| d.contribution).collect();
        let mut sorted = contributions.clone();
        sorted.sort_by(|x, y| y.partial_cmp(x).unwrap());
        assert_eq!(contributions, sorted);
    }

    #[test]
    fn regime_follows_overall() {
        let mut inputs = RiskInputs::default();
        inputs.fundamentals = [
            ("fcf_margin", -0.02),
            ("revenue_growth", 0.15),
            ("price_change", 0.25),
        ]
        .into_iter()
        .collect();
        inputs.valuation = [("pe_ratio", 65.0), ("price_to_sales", 25.0)]
            .into_iter()
            .collect();
        inputs.leverage = [("credit_spreads", 2.5), ("breadth", 0.25)]
            .into_iter()
            .collect();
        inputs.options = [("iv_level", 0.18), ("skew", 0.12)].into_iter().collect();
        inputs.sentiment = [("news_sentiment", 0.85), ("social_sentiment", 0.92)]
            .into_iter()
            .collect();

        let a = assess(&inputs, &seed(), &Weights::default());
        assert_eq!(a.overall_score, 46);
        assert_eq!(a.regime, Regime::LateCycleFroth);
        assert_eq!(a.score_for(RiskCategory::Leverage), 55);
        assert_eq!(a.score_for(RiskCategory::Sentiment), 40);
    }
}

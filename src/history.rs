//! In-memory log of recent assessments for quick diagnostics. Capped,
//! RAM-only; nothing is persisted.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::report::RiskAssessment;
use crate::risk::regime::Regime;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub ts_unix: u64,
    pub overall_score: u32,
    pub regime: Regime,
    /// Top driver categories, strongest first (at most 3).
    pub top_drivers: Vec<String>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, a: &RiskAssessment) {
        let entry = HistoryEntry {
            ts_unix: now_unix(),
            overall_score: a.overall_score,
            regime: a.regime,
            top_drivers: a
                .drivers
                .iter()
                .take(3)
                .map(|d| d.category.as_str().to_string())
                .collect(),
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::rules::RiskRuleSet;
    use crate::risk::score::assess;
    use crate::risk::weights::Weights;
    use crate::snapshot::demo_inputs;

    #[test]
    fn push_and_snapshot_respect_cap() {
        let h = History::with_capacity(2);
        let a = assess(
            &demo_inputs(),
            &RiskRuleSet::default_seed(),
            &Weights::default(),
        );
        h.push(&a);
        h.push(&a);
        h.push(&a);

        let rows = h.snapshot_last_n(10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].overall_score, 46);
        assert!(!rows[0].top_drivers.is_empty());
    }
}

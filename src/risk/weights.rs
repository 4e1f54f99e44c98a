//! Category weights for the overall score, hot-reloaded from
//! `config/weights.json` (or a TOML equivalent).
//!
//! Invariant: weights are non-negative and sum to exactly 1.0. It is enforced
//! at construction via `validated()`, so the aggregator can rely on the
//! weighted sum of in-range category scores never exceeding 100 before the
//! cap. Files that fail validation are rejected and the previous weights kept.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

use anyhow::{bail, Context, Result};
use tracing::warn;

use super::RiskCategory;

pub const DEFAULT_WEIGHTS_PATH: &str = "config/weights.json";
pub const ENV_WEIGHTS_PATH: &str = "RISK_WEIGHTS_PATH";

const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub fundamentals: f64,
    pub valuation: f64,
    pub leverage: f64,
    pub options: f64,
    pub sentiment: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            fundamentals: 0.30,
            valuation: 0.25,
            leverage: 0.20,
            options: 0.15,
            sentiment: 0.10,
        }
    }
}

impl Weights {
    pub fn weight_for(&self, cat: RiskCategory) -> f64 {
        match cat {
            RiskCategory::Fundamentals => self.fundamentals,
            RiskCategory::Valuation => self.valuation,
            RiskCategory::Leverage => self.leverage,
            RiskCategory::Options => self.options,
            RiskCategory::Sentiment => self.sentiment,
        }
    }

    pub fn sum(&self) -> f64 {
        RiskCategory::ALL
            .iter()
            .map(|&c| self.weight_for(c))
            .sum()
    }

    /// Enforce the construction-time invariant: every weight non-negative,
    /// sum equal to 1.0 within a small tolerance.
    pub fn validated(self) -> Result<Self> {
        for cat in RiskCategory::ALL {
            let w = self.weight_for(cat);
            if !w.is_finite() || w < 0.0 {
                bail!("weight for {} must be a non-negative number, got {w}", cat.as_str());
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            bail!("weights must sum to 1.0, got {sum}");
        }
        Ok(self)
    }
}

/// Load weights directly (no caching). Public for tests/tools.
/// Supports TOML or JSON by extension; the result is validated.
pub fn load_weights_file(path: &Path) -> Result<Weights> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading weights from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let w: Weights = if ext == "toml" {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    w.validated()
}

fn weights_path() -> PathBuf {
    std::env::var(ENV_WEIGHTS_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEIGHTS_PATH))
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: Weights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (env `RISK_WEIGHTS_PATH` / default if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(weights_path);
        Self {
            path,
            inner: RwLock::new(State {
                weights: Weights::default(),
                last_modified: None,
            }),
        }
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> Weights {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().expect("weights lock poisoned");
                guard.last_modified != Some(mtime)
            }
            // If file isn't there, we keep defaults; no reload.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().expect("weights lock poisoned").weights;
        }

        let mut guard = self.inner.write().expect("weights lock poisoned");
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    match load_weights_file(&self.path) {
                        Ok(w) => guard.weights = w,
                        Err(e) => {
                            warn!(error = ?e, path = %self.path.display(), "keeping previous weights");
                        }
                    }
                    guard.last_modified = Some(mtime);
                }
            }
        }
        guard.weights
    }

    /// Drop the cached mtime so the next `current()` re-reads the file.
    pub fn force_reload(&self) {
        self.inner
            .write()
            .expect("weights lock poisoned")
            .last_modified = None;
    }
}

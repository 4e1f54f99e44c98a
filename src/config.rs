//! API credentials for the external quote/news services.
//!
//! Presence or absence of a key is a display and logging concern only: the
//! data sources return the same shape either way, and scoring never consults
//! credentials. Raw key material never reaches the logs; only a short SHA-256
//! fingerprint does.

use tracing::info;

pub const ENV_ALPHA_VANTAGE_KEY: &str = "ALPHA_VANTAGE_API_KEY";
pub const ENV_NEWSDATA_KEY: &str = "NEWSDATA_API_KEY";

#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    alpha_vantage: Option<String>,
    newsdata: Option<String>,
}

impl ApiCredentials {
    pub fn new(alpha_vantage: Option<String>, newsdata: Option<String>) -> Self {
        Self {
            alpha_vantage: non_empty(alpha_vantage),
            newsdata: non_empty(newsdata),
        }
    }

    /// Read both keys from the environment (call after dotenv).
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ENV_ALPHA_VANTAGE_KEY).ok(),
            std::env::var(ENV_NEWSDATA_KEY).ok(),
        )
    }

    /// True when at least one live-data key is configured.
    pub fn live_keys(&self) -> bool {
        self.alpha_vantage.is_some() || self.newsdata.is_some()
    }

    /// Log configured/missing status with fingerprints, never raw keys.
    pub fn log_status(&self) {
        for (label, key) in [
            ("alpha_vantage", &self.alpha_vantage),
            ("newsdata", &self.newsdata),
        ] {
            match key {
                Some(k) => info!(service = label, key = %fingerprint(k), "api key configured"),
                None => info!(service = label, "no api key, serving demo data"),
            }
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Short hex fingerprint of a secret for log lines.
fn fingerprint(secret: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

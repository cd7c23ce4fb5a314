use openfinance_core::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_HOME_INSTITUTION};
use openfinance_core::summary::StaleRecordPolicy;

/// Server configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to (`OPENFIN_LISTEN_ADDR`).
    pub listen_addr: String,
    /// Currency reported for empty summaries (`OPENFIN_BASE_CURRENCY`).
    pub base_currency: String,
    /// Institution id standing for the internal ledger
    /// (`OPENFIN_HOME_INSTITUTION`).
    pub home_institution: String,
    /// Whether summaries include records with an unknown observation
    /// date (`OPENFIN_STALE_POLICY`, `include` or `exclude`).
    pub stale_policy: StaleRecordPolicy,
    /// Seed the demo user and institutions on startup (`OPENFIN_SEED`).
    pub seed_demo: bool,
    /// Per-IP request budget per minute; 0 disables rate limiting
    /// (`OPENFIN_RATE_LIMIT_PER_MINUTE`).
    pub rate_limit_per_minute: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            listen_addr: env_or("OPENFIN_LISTEN_ADDR", "0.0.0.0:8000"),
            base_currency: env_or("OPENFIN_BASE_CURRENCY", DEFAULT_BASE_CURRENCY),
            home_institution: env_or("OPENFIN_HOME_INSTITUTION", DEFAULT_HOME_INSTITUTION),
            stale_policy: std::env::var("OPENFIN_STALE_POLICY")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            seed_demo: env_flag("OPENFIN_SEED", true),
            rate_limit_per_minute: std::env::var("OPENFIN_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(60),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

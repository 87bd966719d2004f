//! Process configuration, read once from the environment in `main`.

use std::time::Duration;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 secret for staff tokens.
    pub jwt_secret: String,
    /// Shared credential gate readers present on every read.
    pub gate_key: String,
    /// Listen address.
    pub bind_addr: String,
    /// Hard deadline for the gate decision path.
    pub decision_budget: Duration,
}

impl Config {
    /// Read configuration from the environment, falling back to insecure dev
    /// defaults (with a warning) where secrets are missing.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        let gate_key = std::env::var("GATE_KEY").unwrap_or_else(|_| {
            tracing::warn!("GATE_KEY not set; using insecure dev default");
            "dev-gate-key".to_string()
        });
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let decision_budget = std::env::var("GATE_DECISION_BUDGET_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(250));

        Self {
            jwt_secret,
            gate_key,
            bind_addr,
            decision_budget,
        }
    }
}

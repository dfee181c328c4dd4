//! Auth Config

use std::time::Duration;

use clap::Args;

use strm_app::{
    auth::{
        BypassRules, SigningSecret,
        bypass::{DEFAULT_BYPASS_PATHS, DEFAULT_BYPASS_PREFIXES},
    },
    context::AuthSettings,
};

/// Session authentication settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Session signing secret; `secret` is used when unset or empty
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Comma-separated paths served without a credential (exact match)
    #[arg(long, env = "AUTH_BYPASS_PATHS", value_delimiter = ',')]
    pub auth_bypass_paths: Vec<String>,

    /// Comma-separated path prefixes served without a credential
    #[arg(long, env = "AUTH_BYPASS_PREFIXES", value_delimiter = ',')]
    pub auth_bypass_prefixes: Vec<String>,

    /// Seconds between revocation registry sweeps
    #[arg(
        long,
        env = "REVOCATION_SWEEP_INTERVAL_SECONDS",
        default_value_t = 3_600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub revocation_sweep_interval_seconds: u64,
}

impl AuthConfig {
    /// Resolve into application settings. Empty bypass lists fall back to the defaults.
    #[must_use]
    pub fn settings(&self) -> AuthSettings {
        let paths = or_defaults(&self.auth_bypass_paths, DEFAULT_BYPASS_PATHS);
        let prefixes = or_defaults(&self.auth_bypass_prefixes, DEFAULT_BYPASS_PREFIXES);

        AuthSettings {
            secret: SigningSecret::from_config(self.jwt_secret.as_deref()),
            bypass: BypassRules::new(paths, prefixes),
            sweep_interval: Duration::from_secs(self.revocation_sweep_interval_seconds),
        }
    }
}

fn or_defaults(configured: &[String], defaults: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        defaults.iter().map(ToString::to_string).collect()
    } else {
        configured.iter().map(|path| path.trim().to_string()).collect()
    }
}

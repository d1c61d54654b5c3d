use crate::services::POLL_INTERVAL_SECS;
use crate::types::{Locale, OperatorRights};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Local API host address.
    pub host: String,
    /// Local API port.
    pub port: u16,
    /// Base URL of the lighting backend.
    pub api_base_url: String,
    /// Bearer token of the signed-in operator.
    pub access_token: Option<String>,
    /// Rights of the signed-in operator.
    pub operator_rights: OperatorRights,
    /// Feed refresh interval.
    pub poll_interval: Duration,
    /// Backend request timeout.
    pub http_timeout: Duration,
    /// Directory holding persisted operator state.
    pub state_dir: PathBuf,
    /// Display language.
    pub locale: Locale,
    /// Run the terminal console.
    pub tui: bool,
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "true" || v == "1")
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            access_token: env::var("ACCESS_TOKEN").ok().filter(|t| !t.is_empty()),
            operator_rights: env::var("OPERATOR_RIGHTS")
                .map(|r| OperatorRights::parse(&r))
                .unwrap_or_default(),
            poll_interval: Duration::from_secs(
                env::var("POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|v| *v > 0)
                    .unwrap_or(POLL_INTERVAL_SECS),
            ),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            state_dir: env::var("STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".lantern_watch")),
            locale: env::var("LOCALE")
                .map(|l| Locale::parse(&l))
                .unwrap_or_default(),
            tui: flag("TUI").unwrap_or(false),
        }
    }

    /// Address the local API binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Admin panel client configuration.

use super::env_or;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Server the panel talks to, without trailing slash
    pub base_url: String,
    pub reset_path: String,
    pub refresh_path: String,
    pub stats_path: String,
    /// Time an alert stays visible
    pub alert_timeout_ms: u64,
    /// Time between hiding an alert and removing it
    pub alert_fade_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            reset_path: "/reset-password".to_string(),
            refresh_path: "/refresh-sheet".to_string(),
            stats_path: "/api/stats".to_string(),
            alert_timeout_ms: 5000,
            alert_fade_ms: 150,
        }
    }
}

impl PanelConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let base_url = env::var("PANEL_BASE_URL").unwrap_or(defaults.base_url);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            alert_timeout_ms: env_or("PANEL_ALERT_TIMEOUT_MS", defaults.alert_timeout_ms),
            alert_fade_ms: env_or("PANEL_ALERT_FADE_MS", defaults.alert_fade_ms),
            ..defaults
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn alert_timeout(&self) -> Duration {
        Duration::from_millis(self.alert_timeout_ms)
    }

    pub fn alert_fade(&self) -> Duration {
        Duration::from_millis(self.alert_fade_ms)
    }
}

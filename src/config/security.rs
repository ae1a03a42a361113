//! Security headers configuration.

use super::{env_flag, env_or};
use std::env;

/// Configuration for the security headers middleware
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub referrer_policy: String,
    /// Send `Cache-Control: no-store`
    pub no_store: bool,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            // The dashboard page carries an inline stylesheet and nothing else.
            csp_directives: "default-src 'none'; style-src 'unsafe-inline'; frame-ancestors 'none'"
                .to_string(),
            hsts_enabled: false,
            hsts_max_age: 31536000,
            frame_options: "DENY".to_string(),
            content_type_options: true,
            referrer_policy: "same-origin".to_string(),
            no_store: true,
        }
    }
}

impl SecurityHeadersConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env::var("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env_or("HSTS_MAX_AGE", defaults.hsts_max_age),
            frame_options: env::var("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag(
                "X_CONTENT_TYPE_OPTIONS",
                defaults.content_type_options,
            ),
            referrer_policy: env::var("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
            no_store: env_flag("CACHE_CONTROL_NO_STORE", defaults.no_store),
        }
    }
}

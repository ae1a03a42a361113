//! Environment loading for the outbound HTTP client.

use super::{env_flag, env_or};
use crate::services::resilient_client::{CircuitBreakerConfig, ResilientClientConfig, RetryConfig};
use std::env;

impl ResilientClientConfig {
    /// Load configuration from `RESILIENT_CLIENT_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            read_timeout_seconds: env_or("RESILIENT_CLIENT_READ_TIMEOUT", defaults.read_timeout_seconds),
            write_timeout_seconds: env_or(
                "RESILIENT_CLIENT_WRITE_TIMEOUT",
                defaults.write_timeout_seconds,
            ),
            connect_timeout_seconds: env_or(
                "RESILIENT_CLIENT_CONNECT_TIMEOUT",
                defaults.connect_timeout_seconds,
            ),
            retry: RetryConfig::from_env(),
            circuit_breaker: CircuitBreakerConfig::from_env(),
            enable_detailed_logging: env_flag(
                "RESILIENT_CLIENT_DETAILED_LOGGING",
                defaults.enable_detailed_logging,
            ),
        }
    }
}

impl RetryConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Comma-separated list, e.g. "500,502,503"
        let retry_on_status = env::var("RESILIENT_CLIENT_RETRY_ON_STATUS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or(defaults.retry_on_status);

        Self {
            max_attempts: env_or("RESILIENT_CLIENT_RETRY_MAX_ATTEMPTS", defaults.max_attempts),
            initial_delay_ms: env_or(
                "RESILIENT_CLIENT_RETRY_INITIAL_DELAY_MS",
                defaults.initial_delay_ms,
            ),
            max_delay_ms: env_or("RESILIENT_CLIENT_RETRY_MAX_DELAY_MS", defaults.max_delay_ms),
            jitter_factor: env_or("RESILIENT_CLIENT_RETRY_JITTER_FACTOR", defaults.jitter_factor),
            retry_on_status,
        }
    }
}

impl CircuitBreakerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            failure_threshold: env_or(
                "RESILIENT_CLIENT_CB_FAILURE_THRESHOLD",
                defaults.failure_threshold,
            ),
            success_threshold: env_or(
                "RESILIENT_CLIENT_CB_SUCCESS_THRESHOLD",
                defaults.success_threshold,
            ),
            timeout_seconds: env_or("RESILIENT_CLIENT_CB_TIMEOUT_SECONDS", defaults.timeout_seconds),
        }
    }
}

//! Configuration structures and loading utilities.
//!
//! Every concern reads its own environment variables and falls back to
//! defaults, so the service starts in demo mode with no configuration at all.

pub mod metrics;
pub mod panel;
pub mod resilient_client;
pub mod security;
pub mod server;
pub mod sheets;
pub mod twilio;

pub use metrics::*;
pub use panel::*;
pub use security::*;
pub use server::*;
pub use sheets::*;
pub use twilio::*;

use std::env;
use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is
/// missing or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a boolean flag; only a case-insensitive "true" enables it.
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

/// Read a non-empty string variable.
pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

//! Twilio SMS configuration.

use super::env_non_empty;
use std::env;

#[derive(Clone, Default)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_phone: Option<String>,
    pub api_base: String,
}

impl TwilioConfig {
    pub fn from_env() -> Self {
        Self {
            account_sid: env_non_empty("TWILIO_ACCOUNT_SID"),
            auth_token: env_non_empty("TWILIO_AUTH_TOKEN"),
            from_phone: env_non_empty("TWILIO_PHONE_NUMBER"),
            api_base: env::var("TWILIO_API_BASE")
                .unwrap_or_else(|_| "https://api.twilio.com".to_string()),
        }
    }

    /// SMS delivery needs all three credentials.
    pub fn is_complete(&self) -> bool {
        self.account_sid.is_some() && self.auth_token.is_some() && self.from_phone.is_some()
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("from_phone", &self.from_phone)
            .field("api_base", &self.api_base)
            .finish()
    }
}

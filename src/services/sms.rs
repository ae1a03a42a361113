//! SMS delivery of assigned passwords through Twilio.

use crate::{
    config::TwilioConfig,
    services::resilient_client::{
        OutboundRequest, ResilientClient, ResilientClientConfig, ResilientClientError,
        ResilientClientMetrics,
    },
};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("SMS delivery is not configured")]
    NotConfigured,

    #[error("SMS request failed: {0}")]
    Request(#[from] ResilientClientError),

    #[error("SMS provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected SMS provider response: {0}")]
    Decode(String),
}

/// Outbound SMS capability used by the password manager.
#[async_trait]
pub trait SmsSender: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Send `body` to `to_phone`, returning the provider's message id.
    async fn send_sms(&self, to_phone: &str, body: &str) -> Result<String, SmsError>;
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Twilio Messages API client
pub struct TwilioService {
    config: TwilioConfig,
    client: Option<Mutex<ResilientClient>>,
}

impl TwilioService {
    pub fn new(config: TwilioConfig, metrics: Option<ResilientClientMetrics>) -> Self {
        if !config.is_complete() {
            warn!("Twilio service not fully configured. SMS functionality will be disabled.");
            return Self {
                config,
                client: None,
            };
        }

        let client = match ResilientClient::new(ResilientClientConfig::from_env(), metrics) {
            Ok(client) => {
                info!("Twilio service initialized");
                Some(Mutex::new(client))
            }
            Err(e) => {
                error!(error = %e, "Failed to create Twilio HTTP client; SMS disabled");
                None
            }
        };

        Self { config, client }
    }

    /// Service that never sends anything
    pub fn disabled() -> Self {
        Self {
            config: TwilioConfig::default(),
            client: None,
        }
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base.trim_end_matches('/'),
            account_sid
        )
    }
}

#[async_trait]
impl SmsSender for TwilioService {
    fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    async fn send_sms(&self, to_phone: &str, body: &str) -> Result<String, SmsError> {
        let (Some(client), Some(sid), Some(token), Some(from)) = (
            &self.client,
            &self.config.account_sid,
            &self.config.auth_token,
            &self.config.from_phone,
        ) else {
            return Err(SmsError::NotConfigured);
        };

        let to = normalize_phone(to_phone);
        let request = OutboundRequest::post_form(
            self.messages_url(sid),
            vec![
                ("To".to_string(), to.clone()),
                ("From".to_string(), from.clone()),
                ("Body".to_string(), body.to_string()),
            ],
        )
        .with_basic_auth(sid, token);

        let response = client.lock().await.send(request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SmsError::Decode(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<TwilioErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let message: TwilioMessage =
            serde_json::from_str(&text).map_err(|e| SmsError::Decode(e.to_string()))?;
        info!(sid = %message.sid, to = %to, "SMS sent successfully");
        Ok(message.sid)
    }
}

/// Twilio expects E.164 numbers; add the leading `+` when it is missing.
pub fn normalize_phone(phone: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("+{phone}")
    }
}

/// Text sent along with an assigned password
pub fn password_sms_body(vendor: &str, password: &str) -> String {
    format!("Olá! Sua senha para {vendor} é: {password}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("5511999990000"), "+5511999990000");
        assert_eq!(normalize_phone("+5511999990000"), "+5511999990000");
        assert_eq!(normalize_phone(" 5511 "), "+5511");
    }

    #[test]
    fn test_password_sms_body() {
        assert_eq!(
            password_sms_body("Ambev", "ambev-7731"),
            "Olá! Sua senha para Ambev é: ambev-7731"
        );
    }

    #[tokio::test]
    async fn test_incomplete_config_disables_sms() {
        let service = TwilioService::new(
            TwilioConfig {
                account_sid: Some("AC123".to_string()),
                auth_token: None,
                from_phone: Some("+15550001111".to_string()),
                api_base: "https://api.twilio.com".to_string(),
            },
            None,
        );

        assert!(!service.is_configured());
        assert!(matches!(
            service.send_sms("5511999990000", "hi").await,
            Err(SmsError::NotConfigured)
        ));
    }

    #[test]
    fn test_messages_url() {
        let service = TwilioService {
            config: TwilioConfig {
                api_base: "https://api.twilio.com/".to_string(),
                ..Default::default()
            },
            client: None,
        };
        assert_eq!(
            service.messages_url("AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}

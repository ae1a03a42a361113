//! HTTP side of the admin panel.

use crate::{
    config::PanelConfig,
    models::{PanelReply, PasswordStatistics},
    utils::redact::redact_sensitive_data,
};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The two backend calls the panel makes.
#[async_trait]
pub trait PanelApi: Send + Sync {
    async fn reset_password(&self, vendor: &str, password: &str) -> Result<PanelReply, PanelError>;

    async fn refresh_sheet(&self) -> Result<PanelReply, PanelError>;
}

/// Interpret a reply body.
///
/// Only a JSON `true` in `success` counts as success. A string `message` is
/// kept as is, any other value becomes its JSON text.
pub fn decode_reply(body: &str) -> Result<PanelReply, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;

    let success = value.get("success") == Some(&Value::Bool(true));
    let message = value.get("message").map(|message| match message {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    });

    Ok(PanelReply { success, message })
}

/// `PanelApi` over reqwest.
///
/// The body is decoded whatever the HTTP status, so a 404 carrying
/// `{success: false, message}` is a declared failure rather than a transport
/// error. No timeout and no retry.
#[derive(Debug, Clone)]
pub struct HttpPanelApi {
    client: reqwest::Client,
    config: PanelConfig,
}

impl HttpPanelApi {
    pub fn new(config: PanelConfig) -> Result<Self, PanelError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("vendor-vault-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    async fn read_reply(response: reqwest::Response) -> Result<PanelReply, PanelError> {
        let status = response.status();
        let body = response.text().await?;

        decode_reply(&body).map_err(|e| {
            warn!(
                status = status.as_u16(),
                body = %redact_sensitive_data(&body),
                "Undecodable panel reply"
            );
            PanelError::Decode(e)
        })
    }

    /// Dashboard statistics shown on the page
    pub async fn fetch_stats(&self) -> Result<PasswordStatistics, PanelError> {
        let body = self
            .client
            .get(self.config.url(&self.config.stats_path))
            .send()
            .await?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PanelApi for HttpPanelApi {
    async fn reset_password(&self, vendor: &str, password: &str) -> Result<PanelReply, PanelError> {
        let response = self
            .client
            .post(self.config.url(&self.config.reset_path))
            .json(&json!({ "vendor": vendor, "password": password }))
            .send()
            .await?;
        Self::read_reply(response).await
    }

    async fn refresh_sheet(&self) -> Result<PanelReply, PanelError> {
        let response = self
            .client
            .get(self.config.url(&self.config.refresh_path))
            .send()
            .await?;
        Self::read_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reply_success_requires_true() {
        assert!(decode_reply(r#"{"success": true}"#).unwrap().success);
        assert!(!decode_reply(r#"{"success": "true"}"#).unwrap().success);
        assert!(!decode_reply(r#"{"success": 1}"#).unwrap().success);
        assert!(!decode_reply(r#"{"message": "x"}"#).unwrap().success);
        assert!(!decode_reply("[true]").unwrap().success);
    }

    #[test]
    fn test_decode_reply_message_rendering() {
        let reply = decode_reply(r#"{"success": false, "message": "Vendor not found"}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some("Vendor not found"));

        let reply = decode_reply(r#"{"success": false, "message": {"code": 7}}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some(r#"{"code":7}"#));

        let reply = decode_reply(r#"{"success": false}"#).unwrap();
        assert_eq!(reply.message, None);
    }

    #[test]
    fn test_decode_reply_rejects_non_json() {
        assert!(decode_reply("<html>502 Bad Gateway</html>").is_err());
        assert!(decode_reply("").is_err());
    }
}

//! Typebot webhook payload and reply.

use super::SmsStatus;
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Variables Typebot posts to the webhook
///
/// Any JSON object is accepted. Keys other than the three known ones are
/// only counted, so an object with unrelated keys still counts as data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct TypebotWebhook {
    pub vendor: Option<String>,
    pub user_id: Option<String>,
    pub phone_number: Option<String>,
    /// Keys in the posted object
    #[serde(skip)]
    pub key_count: usize,
}

impl TypebotWebhook {
    /// False for an empty object
    pub fn has_data(&self) -> bool {
        self.key_count > 0
            || self.vendor.is_some()
            || self.user_id.is_some()
            || self.phone_number.is_some()
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<Map<String, Value>> for TypebotWebhook {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            vendor: text_field(&map, "vendor"),
            user_id: text_field(&map, "userId"),
            phone_number: text_field(&map, "phoneNumber"),
            key_count: map.len(),
        }
    }
}

/// Reply rendered back into the chatbot flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct TypebotReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_password: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_status: Option<SmsStatus>,
    /// Set only for malformed payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TypebotReply {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

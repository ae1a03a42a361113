//! Password inventory request and response models.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Body of the admin reset endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of the password request endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct GetPasswordRequest {
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// SMS delivery outcome reported to API callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(rename_all = "lowercase")]
pub enum SmsStatus {
    Sent,
    Failed,
}

impl SmsStatus {
    pub fn from_sent(sent: bool) -> Self {
        if sent { SmsStatus::Sent } else { SmsStatus::Failed }
    }
}

/// A password handed out to a requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct PasswordAssignment {
    /// Vendor name as written in the sheet
    pub vendor: String,
    pub password: String,
    /// Password column the value came from (always 1, column B)
    pub password_number: u64,
    /// 1-based sheet row
    pub row_index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_sent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_status: Option<SmsStatus>,
}

/// Per-vendor usage, in sheet order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct VendorStats {
    pub vendor: String,
    /// 1 when the row holds a password, 0 otherwise
    pub total_passwords: u64,
    pub used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct PasswordStatistics {
    pub total_vendors: u64,
    pub available_passwords: u64,
    pub used_passwords: u64,
    pub vendor_stats: Vec<VendorStats>,
}

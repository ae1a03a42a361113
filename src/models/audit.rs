//! Audit trail for password inventory changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Inventory events worth an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordEventType {
    PasswordAssigned,
    PasswordReset,
    SheetRefreshed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordEventOutcome {
    Success,
    Failure,
}

impl PasswordEventOutcome {
    pub fn from_success(success: bool) -> Self {
        if success {
            PasswordEventOutcome::Success
        } else {
            PasswordEventOutcome::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordEventOutcome::Success => "success",
            PasswordEventOutcome::Failure => "failure",
        }
    }
}

/// Structured audit log entry. Password values never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordAuditEvent {
    pub event_type: PasswordEventType,
    pub outcome: PasswordEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub endpoint: String,
    pub vendor: Option<String>,
    pub requester: Option<String>,
    pub request_id: Option<String>,
    pub detail: Option<String>,
}

impl PasswordAuditEvent {
    pub fn new(
        event_type: PasswordEventType,
        outcome: PasswordEventOutcome,
        ip_address: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            endpoint,
            vendor: None,
            requester: None,
            request_id: None,
            detail: None,
        }
    }

    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor;
        self
    }

    /// Caller-supplied identity, e.g. the Typebot user id
    pub fn with_requester(mut self, requester: Option<String>) -> Self {
        self.requester = requester;
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Emit the event on the `audit` target
    pub fn log(&self) {
        let event_json = serde_json::to_string(self)
            .unwrap_or_else(|_| "Failed to serialize audit event".to_string());

        match self.outcome {
            PasswordEventOutcome::Success => info!(
                target: "audit",
                event_type = ?self.event_type,
                outcome = self.outcome.as_str(),
                vendor = ?self.vendor,
                ip_address = %self.ip_address,
                request_id = ?self.request_id,
                audit_event = %event_json,
                "Password inventory event"
            ),
            PasswordEventOutcome::Failure => warn!(
                target: "audit",
                event_type = ?self.event_type,
                outcome = self.outcome.as_str(),
                vendor = ?self.vendor,
                ip_address = %self.ip_address,
                request_id = ?self.request_id,
                audit_event = %event_json,
                "Password inventory event"
            ),
        }
    }
}

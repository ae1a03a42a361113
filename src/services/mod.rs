//! Business logic and service layer modules.
//!
//! The password inventory and its integrations (spreadsheet, SMS, Typebot)
//! plus the outbound HTTP client and the metrics registry.

pub mod metrics;
pub mod password_manager;
pub mod resilient_client;
pub mod sheets;
pub mod sms;
pub mod typebot;

pub use metrics::*;
pub use password_manager::*;
pub use resilient_client::{
    ResilientClient, ResilientClientConfig, ResilientClientError, ResilientClientMetrics,
};
pub use sheets::{DemoSheet, GoogleSheetSource, SheetError, SheetSource, sheet_source_from_config};
pub use sms::{SmsError, SmsSender, TwilioService};
pub use typebot::*;

//! HTTP request handlers for API endpoints.
//!
//! Admin panel endpoints, the password API, the Typebot webhook, the HTML
//! dashboard and the ambient health/version/metrics endpoints.

pub mod admin;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod passwords;
pub mod typebot;
pub mod version;

pub use admin::{refresh_sheet, reset_password};
pub use dashboard::*;
pub use error::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use passwords::*;
pub use typebot::*;
pub use version::*;

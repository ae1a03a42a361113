//! Vendor Vault - one guest password per vendor, served from a spreadsheet
//!
//! Passwords live in a sheet (vendor, password, status). Clients ask for a
//! vendor's password over HTTP or through a Typebot webhook; the service
//! hands it out, marks it `Usada` and can text it by SMS. Administrators use
//! the panel to put a password back into circulation and to reload the
//! sheet.
//!
//! ## Architecture
//!
//! - `services/` - password manager, sheet sources, SMS, Typebot, outbound HTTP, metrics
//! - `handlers/` - actix-web endpoints and the app factory
//! - `panel/` - the admin panel controller and its terminal page
//! - `middleware/` - security headers, request ids, request metrics
//! - `models/` - request/response and audit types
//! - `config/` - environment-driven configuration
//! - `templates` - askama templates for the dashboard and alert banners
//! - `utils/` - request inspection, redaction
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use vendor_vault::{AppMetrics, AppState, DemoSheet, PasswordManager, TwilioService, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let manager = PasswordManager::new(Arc::new(DemoSheet::new()), Arc::new(TwilioService::disabled()))
//!         .await
//!         .map_err(std::io::Error::other)?;
//!     let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
//!     let state = AppState::new(Arc::new(manager), metrics);
//!
//!     actix_web::HttpServer::new(move || create_app(state.clone()))
//!         .bind(("127.0.0.1", 5000))?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod panel;
pub mod services;
pub mod telemetry;
pub mod templates;
pub mod utils;

pub use config::{
    MetricsConfig, PanelConfig, SecurityHeadersConfig, ServerConfig, SheetsConfig, TwilioConfig,
};
pub use handlers::{AppState, ApiError, create_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders};
pub use models::{
    ErrorResponse, GetPasswordRequest, HealthResponse, PanelReply, PasswordAssignment,
    PasswordStatistics, ResetPasswordRequest, SmsStatus, TypebotReply, TypebotWebhook,
    VendorStats, VersionResponse,
};
pub use panel::{AdminPanelController, AlertBoard, HttpPanelApi, PanelApi, PanelError, Severity};
pub use services::{
    AppMetrics, DemoSheet, GoogleSheetSource, PasswordManager, ResilientClient,
    ResilientClientConfig, ResilientClientError, ResilientClientMetrics, SheetError, SheetSource,
    SmsSender, TwilioService, TypebotService,
};
pub use utils::{extract_client_ip, extract_route_pattern, redact_sensitive_data};

//! OpenAPI specification generation and app factory.

use crate::{
    config::{MetricsConfig, SecurityHeadersConfig},
    handlers::{
        dashboard, get_metrics, get_password, health, json_error_handler, not_found,
        refresh_sheet, reset_password, stats, typebot_webhook, version,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    services::{AppMetrics, PasswordManager},
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use std::sync::Arc;

/// Shared state handed to every worker's app instance
#[derive(Clone)]
pub struct AppState {
    pub passwords: Arc<PasswordManager>,
    pub metrics: AppMetrics,
}

impl AppState {
    pub fn new(passwords: Arc<PasswordManager>, metrics: AppMetrics) -> Self {
        Self { passwords, metrics }
    }
}

pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Vendor Vault".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Dispenses one guest password per vendor from a spreadsheet.\n\n\
                ## Sheet layout\n\
                Column A holds the vendor, column B the password and column C the status. \
                A password is used when column C reads `Usada`. Row 1 is a header.\n\
                \n\
                ## Clients\n\
                - The admin panel uses `/reset-password` and `/refresh-sheet`; replies are \
                `{success, message}`.\n\
                - Typebot posts `{vendor, userId, phoneNumber}` to `/api/typebot-webhook`.\n\
                - Other clients use `/api/get-password` and `/api/stats`.\n\
                \n\
                ## SMS\n\
                When Twilio is configured and a phone number is supplied, the assigned \
                password is also sent by SMS."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Build the application around the shared state.
///
/// Used by the server binary for each worker and by the integration tests.
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let security_config = SecurityHeadersConfig::from_env();
    let metrics_config = MetricsConfig::from_env();

    App::new()
        .default_service(actix_web::web::to(not_found))
        .wrap(SecurityHeaders::new(security_config))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(actix_web::web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::Data::from(state.passwords))
        .app_data(web::Data::new(state.metrics))
        .app_data(web::Data::new(metrics_config))
        .service(web::resource("/").route(web::get().to(dashboard)))
        .service(web::resource("/reset-password").route(web::post().to(reset_password)))
        .service(web::resource("/refresh-sheet").route(web::get().to(refresh_sheet)))
        .service(web::resource("/api/reset-password").route(web::post().to(reset_password)))
        .service(web::resource("/api/refresh-sheet").route(web::post().to(refresh_sheet)))
        .service(web::resource("/api/get-password").route(web::post().to(get_password)))
        .service(web::resource("/api/typebot-webhook").route(web::post().to(typebot_webhook)))
        .service(web::resource("/api/sync-typebot").route(web::post().to(typebot_webhook)))
        .service(web::resource("/api/stats").route(web::get().to(stats)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}

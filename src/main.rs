use actix_web::HttpServer;
use std::sync::Arc;
use vendor_vault::{
    AppMetrics, AppState, PasswordManager, ResilientClientMetrics, ServerConfig, SheetsConfig,
    TwilioConfig, TwilioService, create_app,
    services::sheet_source_from_config,
    telemetry::init_tracing,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let server_config = ServerConfig::from_env();
    let sheets_config = SheetsConfig::from_env();

    let metrics = AppMetrics::new().map_err(std::io::Error::other)?;
    let client_metrics =
        ResilientClientMetrics::new(&metrics.registry).map_err(std::io::Error::other)?;

    let sheet = sheet_source_from_config(&sheets_config, Some(client_metrics.clone()))
        .map_err(std::io::Error::other)?;
    let sms = Arc::new(TwilioService::new(TwilioConfig::from_env(), Some(client_metrics)));

    let manager = PasswordManager::new(sheet, sms).await.map_err(|e| {
        tracing::error!(error = %e, "Could not load the password sheet");
        std::io::Error::other(e)
    })?;

    let state = AppState::new(Arc::new(manager), metrics);
    tracing::info!(
        host = %server_config.host,
        port = server_config.port,
        sheet_source = state.passwords.sheet_source_name(),
        demo_mode = sheets_config.demo_mode(),
        "Server starting"
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind(server_config.bind_address())?
        .run()
        .await
}

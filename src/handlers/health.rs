//! Health check endpoint handler.

use crate::{handlers::admin::password_manager, models::HealthResponse};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Reports which sheet source backs the inventory. Does not call the sheet.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the API in JSON format.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse),
        (status = 503, description = "Password service not available")
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let manager = password_manager(&req)?;

    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
        sheet_source: manager.sheet_source_name().to_string(),
    }))
}

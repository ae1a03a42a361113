//! Server-rendered password dashboard.

use crate::{
    handlers::{admin::password_manager, error::ApiError},
    templates::DashboardTemplate,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result};
use askama::Template;
use paperclip::actix::api_v2_operation;
use tracing::error;

#[api_v2_operation(
    summary = "Dashboard",
    description = "HTML overview of vendors and password usage.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "HTML page", content_type = "text/html")
    )
)]
pub async fn dashboard(req: HttpRequest) -> Result<HttpResponse, Error> {
    let manager = password_manager(&req)?;
    let stats = manager.statistics().await;

    let page = DashboardTemplate::new(&stats, manager.sheet_source_name())
        .render()
        .map_err(|e| {
            error!(error = %e, "Failed to render dashboard");
            ApiError::Internal("Failed to render dashboard".to_string())
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page))
}

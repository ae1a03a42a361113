//! Admin panel endpoints: password reset and forced sheet refresh.

use crate::{
    handlers::error::ApiError,
    models::{
        PanelReply, PasswordAuditEvent, PasswordEventOutcome, PasswordEventType,
        ResetPasswordRequest,
    },
    services::{AppMetrics, PasswordManager},
    utils::http::{extract_client_ip, request_id},
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

pub(crate) fn password_manager(req: &HttpRequest) -> Result<&web::Data<PasswordManager>, ApiError> {
    req.app_data::<web::Data<PasswordManager>>()
        .ok_or(ApiError::Unavailable)
}

fn audit(req: &HttpRequest, event_type: PasswordEventType, success: bool) -> PasswordAuditEvent {
    PasswordAuditEvent::new(
        event_type,
        PasswordEventOutcome::from_success(success),
        extract_client_ip(req),
        req.path().to_string(),
    )
    .with_request_id(request_id(req))
}

/// Put a used password back into circulation
///
/// Served on both `/reset-password` (the admin page) and
/// `/api/reset-password`.
#[api_v2_operation(
    summary = "Reset Password",
    description = "Clears the usage status of a vendor password so it can be handed out again.",
    tags("Admin"),
    responses(
        (status = 200, description = "Password reset", body = PanelReply),
        (status = 400, description = "Vendor or password missing", body = PanelReply),
        (status = 404, description = "Vendor/password pair not found", body = PanelReply)
    )
)]
pub async fn reset_password(
    req: HttpRequest,
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, Error> {
    let manager = password_manager(&req)?;
    let payload = payload.into_inner();

    let (Some(vendor), Some(password)) = (
        payload.vendor.filter(|v| !v.is_empty()),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Vendor and password are required".to_string()).into());
    };

    let success = manager.reset_password(&vendor, &password).await;

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_reset(PasswordEventOutcome::from_success(success).as_str());
    }
    audit(&req, PasswordEventType::PasswordReset, success)
        .with_vendor(Some(vendor.clone()))
        .log();

    if !success {
        return Err(ApiError::NotFound(format!("Password not found for vendor: {vendor}")).into());
    }

    Ok(HttpResponse::Ok().json(PanelReply::ok("Password reset successfully")))
}

/// Re-read the spreadsheet into the cache
#[api_v2_operation(
    summary = "Refresh Sheet Data",
    description = "Reloads vendors and passwords from the spreadsheet.",
    tags("Admin"),
    responses(
        (status = 200, description = "Sheet reloaded", body = PanelReply),
        (status = 500, description = "Sheet could not be read", body = PanelReply)
    )
)]
pub async fn refresh_sheet(req: HttpRequest) -> Result<HttpResponse, Error> {
    let manager = password_manager(&req)?;
    let result = manager.refresh_data().await;

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_refresh(PasswordEventOutcome::from_success(result.is_ok()).as_str());
    }

    match result {
        Ok(vendors) => {
            audit(&req, PasswordEventType::SheetRefreshed, true)
                .with_detail(format!("{vendors} vendors"))
                .log();
            Ok(HttpResponse::Ok().json(PanelReply::ok("Sheet data refreshed")))
        }
        Err(e) => {
            audit(&req, PasswordEventType::SheetRefreshed, false)
                .with_detail(e.to_string())
                .log();
            Err(ApiError::Internal("Failed to refresh sheet data".to_string()).into())
        }
    }
}

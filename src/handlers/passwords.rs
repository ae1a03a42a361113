//! Password dispensing and statistics endpoints.

use crate::{
    handlers::admin::password_manager,
    models::{
        ErrorResponse, GetPasswordRequest, PasswordAssignment, PasswordAuditEvent,
        PasswordEventOutcome, PasswordEventType, PasswordStatistics,
    },
    services::AppMetrics,
    utils::http::{extract_client_ip, request_id},
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Hand out the next password for a vendor
///
/// The password is marked as used in the sheet before it is returned. With a
/// phone number the password is also sent by SMS when delivery is configured.
#[api_v2_operation(
    summary = "Get Password",
    description = "Assigns the vendor's password, marks it used and optionally sends it by SMS.",
    tags("Passwords"),
    responses(
        (status = 200, description = "Password assigned", body = PasswordAssignment),
        (status = 400, description = "Vendor missing", body = ErrorResponse),
        (status = 404, description = "No password available", body = ErrorResponse)
    )
)]
pub async fn get_password(
    req: HttpRequest,
    payload: web::Json<GetPasswordRequest>,
) -> Result<HttpResponse, Error> {
    let manager = password_manager(&req)?;
    let payload = payload.into_inner();

    let Some(vendor) = payload.vendor.filter(|v| !v.is_empty()) else {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse::new("Vendor parameter is required")));
    };

    let assignment = manager
        .auto_assign_next_password(&vendor, payload.phone_number.as_deref())
        .await;

    PasswordAuditEvent::new(
        PasswordEventType::PasswordAssigned,
        PasswordEventOutcome::from_success(assignment.is_some()),
        extract_client_ip(&req),
        req.path().to_string(),
    )
    .with_vendor(Some(vendor.clone()))
    .with_requester(payload.user_id)
    .with_request_id(request_id(&req))
    .log();

    match assignment {
        Some(assignment) => {
            if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
                metrics.record_assignment("api");
            }
            Ok(HttpResponse::Ok().json(assignment))
        }
        None => Ok(HttpResponse::NotFound().json(ErrorResponse::new(format!(
            "No available passwords for vendor: {vendor}"
        )))),
    }
}

/// Usage statistics over the cached sheet
#[api_v2_operation(
    summary = "Password Statistics",
    description = "Returns per-vendor usage plus totals of used and available passwords.",
    tags("Passwords"),
    responses(
        (status = 200, description = "Statistics", body = PasswordStatistics)
    )
)]
pub async fn stats(req: HttpRequest) -> Result<web::Json<PasswordStatistics>, Error> {
    let manager = password_manager(&req)?;
    Ok(web::Json(manager.statistics().await))
}

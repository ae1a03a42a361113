//! Typebot chatbot webhook.

use crate::{
    handlers::admin::password_manager,
    models::{PasswordAuditEvent, PasswordEventOutcome, PasswordEventType, TypebotReply, TypebotWebhook},
    services::{AppMetrics, TypebotService},
    utils::http::{extract_client_ip, request_id},
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Typebot webhook
///
/// Also mounted at `/api/sync-typebot` for flows configured against the
/// older path.
#[api_v2_operation(
    summary = "Typebot Webhook",
    description = "Assigns a vendor password on behalf of a Typebot conversation and optionally sends it by SMS.",
    tags("Typebot"),
    responses(
        (status = 200, description = "Request processed; see `success` and `error`", body = TypebotReply)
    )
)]
pub async fn typebot_webhook(
    req: HttpRequest,
    payload: web::Json<TypebotWebhook>,
) -> Result<HttpResponse, Error> {
    let manager = password_manager(&req)?;
    let payload = payload.into_inner();

    let reply = TypebotService::new().process_webhook(&payload, manager).await;

    // Typebot maps the reply into flow variables only on a 2xx status.
    if reply.error.is_some() {
        return Ok(HttpResponse::Ok().json(reply));
    }

    let assigned = reply.has_password == Some(true);
    if assigned && let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_assignment("typebot");
    }

    PasswordAuditEvent::new(
        PasswordEventType::PasswordAssigned,
        PasswordEventOutcome::from_success(assigned),
        extract_client_ip(&req),
        req.path().to_string(),
    )
    .with_vendor(payload.vendor)
    .with_requester(payload.user_id)
    .with_request_id(request_id(&req))
    .log();

    Ok(HttpResponse::Ok().json(reply))
}

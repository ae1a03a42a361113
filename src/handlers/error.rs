//! Error type shared by the JSON handlers.

use crate::models::{ErrorResponse, PanelReply, TypebotReply};
use actix_web::{HttpRequest, HttpResponse, ResponseError, error::JsonPayloadError, http::StatusCode};

/// Failures surfaced by the admin panel endpoints.
///
/// Rendered as a `{success: false, message}` body so the panel can show the
/// message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("Password service is not available")]
    Unavailable,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(PanelReply::failed(self.to_string()))
    }
}

/// Error handler for malformed JSON bodies.
///
/// Each route family keeps its own reply shape, so the body depends on the
/// request path. Typebot replies are always 200.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = %req.path(), error = %err, "Rejected request body");

    let response = match req.path() {
        "/api/typebot-webhook" | "/api/sync-typebot" => {
            HttpResponse::Ok().json(TypebotReply::error("No data provided"))
        }
        "/api/get-password" => {
            HttpResponse::BadRequest().json(ErrorResponse::new("Invalid JSON body"))
        }
        _ => HttpResponse::BadRequest().json(PanelReply::failed("Invalid JSON body")),
    };

    actix_web::error::InternalError::from_response(err, response).into()
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(PanelReply::failed("Page not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_api_error_renders_panel_reply() {
        let response = ApiError::NotFound("Password not found for vendor: Acme".to_string())
            .error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let reply: PanelReply = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply, PanelReply::failed("Password not found for vendor: Acme"));
    }

    #[actix_web::test]
    async fn test_json_error_handler_keeps_typebot_replies_ok() {
        let req = actix_web::test::TestRequest::post()
            .uri("/api/sync-typebot")
            .to_http_request();
        let err = json_error_handler(JsonPayloadError::ContentType, &req);
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body()).await.unwrap();
        let reply: TypebotReply = serde_json::from_slice(&body).unwrap();
        assert_eq!(reply, TypebotReply::error("No data provided"));

        let req = actix_web::test::TestRequest::post()
            .uri("/reset-password")
            .to_http_request();
        let response = json_error_handler(JsonPayloadError::ContentType, &req).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

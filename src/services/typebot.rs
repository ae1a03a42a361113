//! Typebot webhook processing.

use crate::{
    models::{SmsStatus, TypebotReply, TypebotWebhook},
    services::password_manager::PasswordManager,
};
use tracing::info;

/// Turns chatbot webhook calls into password assignments
#[derive(Debug, Clone, Copy, Default)]
pub struct TypebotService;

impl TypebotService {
    pub fn new() -> Self {
        Self
    }

    pub async fn process_webhook(
        &self,
        payload: &TypebotWebhook,
        manager: &PasswordManager,
    ) -> TypebotReply {
        if !payload.has_data() {
            return TypebotReply::error("No data provided");
        }

        let Some(vendor) = payload.vendor.as_deref().filter(|v| !v.is_empty()) else {
            return TypebotReply::error("No vendor specified");
        };
        let phone_number = payload
            .phone_number
            .as_deref()
            .filter(|p| !p.trim().is_empty());

        info!(
            vendor,
            user_id = payload.user_id.as_deref().unwrap_or("unknown"),
            with_phone = phone_number.is_some(),
            "Typebot password request"
        );

        let Some(assignment) = manager.auto_assign_next_password(vendor, phone_number).await else {
            return TypebotReply {
                success: Some(false),
                message: Some(format!(
                    "Todas as senhas para {vendor} já foram utilizadas. Por favor, contate o administrador."
                )),
                has_password: Some(false),
                ..Default::default()
            };
        };

        let mut message = format!("Senha para {} enviada com sucesso!", assignment.vendor);
        let sms_status = phone_number.map(|phone| {
            let sent = assignment.sms_sent == Some(true);
            if sent {
                message.push_str(&format!(" SMS enviado para {phone}."));
            } else if manager.sms_configured() {
                // Without SMS configured the failure is expected and not worth mentioning.
                message.push_str(&format!(" Falha ao enviar SMS para {phone}."));
            }
            SmsStatus::from_sent(sent)
        });

        TypebotReply {
            success: Some(true),
            message: Some(message),
            has_password: Some(true),
            vendor: Some(assignment.vendor),
            password: Some(assignment.password),
            sms_status,
            error: None,
        }
    }
}

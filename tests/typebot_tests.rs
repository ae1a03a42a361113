//! Typebot webhook replies, including the SMS variants.

mod common;

use common::{RecordingSms, demo_manager, manager_with_sms};
use std::sync::Arc;
use vendor_vault::{SmsStatus, TypebotReply, TypebotService, TypebotWebhook};

fn webhook(vendor: Option<&str>, user_id: Option<&str>, phone: Option<&str>) -> TypebotWebhook {
    TypebotWebhook {
        vendor: vendor.map(str::to_string),
        user_id: user_id.map(str::to_string),
        phone_number: phone.map(str::to_string),
        key_count: [vendor, user_id, phone].iter().flatten().count(),
    }
}

#[tokio::test]
async fn test_malformed_payloads() {
    let (manager, _) = demo_manager().await;
    let service = TypebotService::new();

    let reply = service.process_webhook(&webhook(None, None, None), &manager).await;
    assert_eq!(reply, TypebotReply::error("No data provided"));

    let reply = service
        .process_webhook(&webhook(None, Some("u-1"), Some("5511999990000")), &manager)
        .await;
    assert_eq!(reply, TypebotReply::error("No vendor specified"));

    let reply = service.process_webhook(&webhook(Some(""), Some("u-1"), None), &manager).await;
    assert_eq!(reply, TypebotReply::error("No vendor specified"));
}

#[tokio::test]
async fn test_unrelated_keys_count_as_data() {
    let (manager, _) = demo_manager().await;
    let payload: TypebotWebhook = serde_json::from_str(r#"{"foo": 1}"#).unwrap();

    let reply = TypebotService::new().process_webhook(&payload, &manager).await;
    assert_eq!(reply, TypebotReply::error("No vendor specified"));
}

#[tokio::test]
async fn test_exhausted_vendor() {
    let (manager, _) = demo_manager().await;

    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("Unilever"), None, None), &manager)
        .await;

    assert_eq!(reply.success, Some(false));
    assert_eq!(reply.has_password, Some(false));
    assert_eq!(
        reply.message.as_deref(),
        Some("Todas as senhas para Unilever já foram utilizadas. Por favor, contate o administrador.")
    );
    assert!(reply.password.is_none());
}

#[tokio::test]
async fn test_sms_sent() {
    let sms = Arc::new(RecordingSms::new(true, true));
    let (manager, _) = manager_with_sms(sms.clone()).await;

    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("ambev"), Some("u-1"), Some("5511999990000")), &manager)
        .await;

    assert_eq!(reply.success, Some(true));
    assert_eq!(reply.vendor.as_deref(), Some("Ambev"));
    assert_eq!(reply.password.as_deref(), Some("ambev-7731"));
    assert_eq!(reply.sms_status, Some(SmsStatus::Sent));
    assert_eq!(
        reply.message.as_deref(),
        Some("Senha para Ambev enviada com sucesso! SMS enviado para 5511999990000.")
    );
    assert_eq!(sms.sent().len(), 1);
}

#[tokio::test]
async fn test_sms_failed_is_reported_only_when_configured() {
    let failing = Arc::new(RecordingSms::new(true, false));
    let (manager, _) = manager_with_sms(failing).await;
    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("Ambev"), None, Some("5511999990000")), &manager)
        .await;
    assert_eq!(reply.sms_status, Some(SmsStatus::Failed));
    assert_eq!(
        reply.message.as_deref(),
        Some("Senha para Ambev enviada com sucesso! Falha ao enviar SMS para 5511999990000.")
    );

    let (manager, _) = demo_manager().await;
    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("Ambev"), None, Some("5511999990000")), &manager)
        .await;
    assert_eq!(reply.sms_status, Some(SmsStatus::Failed));
    assert_eq!(reply.message.as_deref(), Some("Senha para Ambev enviada com sucesso!"));
}

#[tokio::test]
async fn test_empty_phone_is_ignored() {
    let sms = Arc::new(RecordingSms::new(true, true));
    let (manager, _) = manager_with_sms(sms.clone()).await;

    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("Nestle"), None, Some("")), &manager)
        .await;

    assert_eq!(reply.success, Some(true));
    assert_eq!(reply.sms_status, None);
    assert!(sms.sent().is_empty());
}

#[tokio::test]
async fn test_whitespace_phone_is_ignored() {
    let sms = Arc::new(RecordingSms::new(true, true));
    let (manager, _) = manager_with_sms(sms.clone()).await;

    let reply = TypebotService::new()
        .process_webhook(&webhook(Some("Nestle"), None, Some("   ")), &manager)
        .await;

    assert_eq!(reply.success, Some(true));
    assert_eq!(reply.sms_status, None);
    assert_eq!(reply.message.as_deref(), Some("Senha para Nestle enviada com sucesso!"));
    assert!(sms.sent().is_empty());
}

#[test]
fn test_webhook_payload_uses_camel_case() {
    let payload: TypebotWebhook =
        serde_json::from_str(r#"{"vendor": "Ambev", "userId": "u-1", "phoneNumber": "5511"}"#).unwrap();
    assert_eq!(payload.user_id.as_deref(), Some("u-1"));
    assert_eq!(payload.phone_number.as_deref(), Some("5511"));
}

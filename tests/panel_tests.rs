//! Behaviour of the admin panel controller against test doubles, and of the
//! HTTP panel client against a canned server.

mod common;

use async_trait::async_trait;
use common::{FakeServer, closed_port_url};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vendor_vault::{
    AdminPanelController, AlertBoard, HttpPanelApi, PanelApi, PanelConfig, PanelError, PanelReply,
    Severity,
    panel::{FormFields, PageReloader},
};

type Reply = Result<PanelReply, PanelError>;

fn decode_error() -> PanelError {
    PanelError::Decode(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
}

#[derive(Default)]
struct MockApi {
    reset_replies: Mutex<VecDeque<Reply>>,
    refresh_replies: Mutex<VecDeque<Reply>>,
    reset_calls: Mutex<Vec<(String, String)>>,
    refresh_calls: AtomicUsize,
}

impl MockApi {
    fn new(reset: Vec<Reply>, refresh: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            reset_replies: Mutex::new(reset.into()),
            refresh_replies: Mutex::new(refresh.into()),
            ..Default::default()
        })
    }

    fn reset_calls(&self) -> Vec<(String, String)> {
        self.reset_calls.lock().unwrap().clone()
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PanelApi for MockApi {
    async fn reset_password(&self, vendor: &str, password: &str) -> Reply {
        self.reset_calls
            .lock()
            .unwrap()
            .push((vendor.to_string(), password.to_string()));
        self.reset_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected reset request")
    }

    async fn refresh_sheet(&self) -> Reply {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected refresh request")
    }
}

struct MockForm {
    fields: Mutex<(String, String)>,
}

impl MockForm {
    fn new(vendor: &str, password: &str) -> Arc<Self> {
        Arc::new(Self {
            fields: Mutex::new((vendor.to_string(), password.to_string())),
        })
    }
}

impl FormFields for MockForm {
    fn vendor(&self) -> String {
        self.fields.lock().unwrap().0.clone()
    }

    fn password(&self) -> String {
        self.fields.lock().unwrap().1.clone()
    }

    fn clear_password(&self) {
        self.fields.lock().unwrap().1.clear();
    }
}

#[derive(Default)]
struct MockReloader {
    reloads: AtomicUsize,
}

#[async_trait]
impl PageReloader for MockReloader {
    async fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

type TestController = AdminPanelController<Arc<MockApi>, Arc<MockForm>, Arc<MockReloader>>;

fn controller(api: &Arc<MockApi>, form: &Arc<MockForm>, reloader: &Arc<MockReloader>) -> TestController {
    AdminPanelController::new(
        api.clone(),
        form.clone(),
        reloader.clone(),
        AlertBoard::new(Duration::from_millis(5000), Duration::from_millis(150)),
    )
}

fn messages(controller: &TestController) -> Vec<(String, Severity)> {
    controller
        .alerts()
        .snapshot()
        .into_iter()
        .map(|a| (a.message, a.severity))
        .collect()
}

#[tokio::test]
async fn test_empty_fields_never_send_a_request() {
    for (vendor, password) in [("", "secret"), ("Ambev", ""), ("", "")] {
        let api = MockApi::new(vec![], vec![]);
        let form = MockForm::new(vendor, password);
        let reloader = Arc::new(MockReloader::default());
        let panel = controller(&api, &form, &reloader);

        panel.submit_reset().await;

        assert!(api.reset_calls().is_empty());
        assert_eq!(api.refresh_calls(), 0);
        assert_eq!(
            messages(&panel),
            vec![("Por favor, preencha todos os campos".to_string(), Severity::Danger)]
        );
    }
}

#[tokio::test]
async fn test_successful_reset_clears_password_and_refreshes_once() {
    let api = MockApi::new(
        vec![Ok(PanelReply::ok("Password reset successfully"))],
        vec![Ok(PanelReply::ok("Sheet data refreshed"))],
    );
    let form = MockForm::new("Ambev", "ambev-7731");
    let reloader = Arc::new(MockReloader::default());
    let panel = controller(&api, &form, &reloader);

    panel.submit_reset().await;

    assert_eq!(api.reset_calls(), vec![("Ambev".to_string(), "ambev-7731".to_string())]);
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(form.password(), "");
    assert_eq!(form.vendor(), "Ambev");
    assert_eq!(reloader.reloads.load(Ordering::SeqCst), 1);
    assert_eq!(
        messages(&panel),
        vec![
            ("Dados atualizados com sucesso!".to_string(), Severity::Success),
            ("Senha resetada com sucesso!".to_string(), Severity::Success),
        ]
    );
}

#[tokio::test]
async fn test_declared_reset_failure_keeps_password() {
    let api = MockApi::new(vec![Ok(PanelReply::failed("X"))], vec![]);
    let form = MockForm::new("Ambev", "typo");
    let reloader = Arc::new(MockReloader::default());
    let panel = controller(&api, &form, &reloader);

    panel.submit_reset().await;

    assert_eq!(form.password(), "typo");
    assert_eq!(api.refresh_calls(), 0);
    assert_eq!(messages(&panel), vec![("Erro: X".to_string(), Severity::Danger)]);
}

#[tokio::test]
async fn test_declared_failure_without_message() {
    let api = MockApi::new(
        vec![Ok(PanelReply {
            success: false,
            message: None,
        })],
        vec![],
    );
    let form = MockForm::new("Ambev", "typo");
    let panel = controller(&api, &form, &Arc::new(MockReloader::default()));

    panel.submit_reset().await;

    assert_eq!(messages(&panel), vec![("Erro: ".to_string(), Severity::Danger)]);
}

#[tokio::test]
async fn test_refresh_success_reloads_and_failure_does_not() {
    let api = MockApi::new(
        vec![],
        vec![
            Ok(PanelReply::ok("Sheet data refreshed")),
            Ok(PanelReply::failed("Failed to refresh sheet data")),
        ],
    );
    let form = MockForm::new("", "");
    let reloader = Arc::new(MockReloader::default());
    let panel = controller(&api, &form, &reloader);

    panel.refresh().await;
    assert_eq!(reloader.reloads.load(Ordering::SeqCst), 1);

    panel.refresh().await;
    assert_eq!(reloader.reloads.load(Ordering::SeqCst), 1);
    assert_eq!(
        messages(&panel)[0],
        ("Erro: Failed to refresh sheet data".to_string(), Severity::Danger)
    );
}

#[tokio::test]
async fn test_communication_errors_show_generic_alert() {
    let api = MockApi::new(vec![Err(decode_error())], vec![Err(decode_error())]);
    let form = MockForm::new("Ambev", "ambev-7731");
    let reloader = Arc::new(MockReloader::default());
    let panel = controller(&api, &form, &reloader);

    panel.submit_reset().await;
    panel.refresh().await;

    assert_eq!(form.password(), "ambev-7731");
    assert_eq!(reloader.reloads.load(Ordering::SeqCst), 0);
    assert_eq!(
        messages(&panel),
        vec![
            ("Erro ao comunicar com o servidor".to_string(), Severity::Danger),
            ("Erro ao comunicar com o servidor".to_string(), Severity::Danger),
        ]
    );
}

#[tokio::test]
async fn test_vendor_change_does_nothing() {
    let api = MockApi::new(vec![], vec![]);
    let form = MockForm::new("Ambev", "");
    let panel = controller(&api, &form, &Arc::new(MockReloader::default()));

    panel.on_vendor_change();

    assert!(panel.alerts().is_empty());
    assert!(api.reset_calls().is_empty());
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_alert_hides_then_disappears() {
    let board = AlertBoard::new(Duration::from_millis(5000), Duration::from_millis(150));
    let id = board.show("Senha resetada com sucesso!", Severity::Success);

    tokio::time::sleep(Duration::from_millis(4990)).await;
    assert!(board.snapshot()[0].shown);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let alert = &board.snapshot()[0];
    assert_eq!(alert.id, id);
    assert!(!alert.shown);
    assert_eq!(alert.css_class(), "alert alert-success alert-dismissible fade");

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(board.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_every_alert_is_gone_within_timeout_plus_fade() {
    let board = AlertBoard::new(Duration::from_millis(5000), Duration::from_millis(150));
    board.show("one", Severity::Info);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    board.show("two", Severity::Danger);
    let manual = board.show("three", Severity::Success);
    assert!(board.dismiss(manual));
    assert_eq!(board.len(), 2);

    tokio::time::sleep(Duration::from_millis(5150 - 1000 + 10)).await;
    assert_eq!(board.len(), 1);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(board.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clear_discards_alerts_and_pending_timers_are_harmless() {
    let board = AlertBoard::new(Duration::from_millis(5000), Duration::from_millis(150));
    board.show("one", Severity::Info);
    board.clear();
    let kept = board.show("after reload", Severity::Info);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(board.snapshot().len(), 1);
    assert_eq!(board.snapshot()[0].id, kept);
}

fn panel_config(base_url: &str) -> PanelConfig {
    PanelConfig {
        base_url: base_url.to_string(),
        ..PanelConfig::default()
    }
}

#[tokio::test]
async fn test_http_panel_api_sends_reset_body_and_reads_error_statuses() {
    let server = FakeServer::start(vec![(
        404,
        r#"{"success": false, "message": "Password not found for vendor: Ambev"}"#,
    )])
    .await;
    let api = HttpPanelApi::new(panel_config(&server.base_url)).unwrap();

    let reply = api.reset_password("Ambev", "typo").await.unwrap();
    assert_eq!(reply, PanelReply::failed("Password not found for vendor: Ambev"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/reset-password");
    assert!(requests[0].header("content-type").unwrap().contains("application/json"));
    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body, serde_json::json!({"vendor": "Ambev", "password": "typo"}));
}

#[tokio::test]
async fn test_http_panel_api_refresh_and_decode_errors() {
    let server = FakeServer::start(vec![
        (200, r#"{"success": true, "message": "Sheet data refreshed"}"#),
        (502, "Bad Gateway"),
    ])
    .await;
    let api = HttpPanelApi::new(panel_config(&server.base_url)).unwrap();

    assert!(api.refresh_sheet().await.unwrap().success);
    assert!(matches!(api.refresh_sheet().await, Err(PanelError::Decode(_))));

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/refresh-sheet");
}

#[tokio::test]
async fn test_unreachable_server_is_a_communication_error() {
    let base_url = closed_port_url().await;
    let api = Arc::new(HttpPanelApi::new(panel_config(&base_url)).unwrap());
    assert!(matches!(api.refresh_sheet().await, Err(PanelError::Transport(_))));

    let form = MockForm::new("Ambev", "ambev-7731");
    let reloader = Arc::new(MockReloader::default());
    let panel = AdminPanelController::new(
        api,
        form.clone(),
        reloader.clone(),
        AlertBoard::new(Duration::from_millis(5000), Duration::from_millis(150)),
    );

    panel.submit_reset().await;

    assert_eq!(form.password(), "ambev-7731");
    let alerts = panel.alerts().snapshot();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].message, "Erro ao comunicar com o servidor");
    assert_eq!(alerts[0].severity, Severity::Danger);
}

//! Test doubles shared by the integration suites.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use vendor_vault::{
    DemoSheet, PasswordManager, SheetError, SheetSource, SmsSender, TwilioService,
    services::{SmsError, sheets::SheetRow},
};

/// A request as seen by [`FakeServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// One-connection-per-request HTTP server answering with canned responses in
/// order. Once the list runs out it keeps repeating the last one.
pub struct FakeServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
    pub async fn start(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                recorded.lock().unwrap().push(request);

                let (status, body) = responses
                    .get(served)
                    .or(responses.last())
                    .copied()
                    .unwrap_or((500, "{}"));
                served += 1;

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let body = String::from_utf8_lossy(&buffer[header_end..]).to_string();
    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Address nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Sheet whose reads and writes can be switched to fail
pub struct FlakySheet {
    pub inner: DemoSheet,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakySheet {
    pub fn new() -> Self {
        Self {
            inner: DemoSheet::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SheetSource for FlakySheet {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(SheetError::Status(503));
        }
        self.inner.fetch_rows().await
    }

    async fn mark_used(&self, row_number: usize) -> Result<(), SheetError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetError::Status(403));
        }
        self.inner.mark_used(row_number).await
    }

    async fn mark_unused(&self, row_number: usize) -> Result<(), SheetError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SheetError::Status(403));
        }
        self.inner.mark_unused(row_number).await
    }
}

/// SMS sender that records messages instead of sending them
pub struct RecordingSms {
    pub configured: bool,
    pub succeed: bool,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSms {
    pub fn new(configured: bool, succeed: bool) -> Self {
        Self {
            configured,
            succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send_sms(&self, to_phone: &str, body: &str) -> Result<String, SmsError> {
        if !self.configured {
            return Err(SmsError::NotConfigured);
        }
        self.sent
            .lock()
            .unwrap()
            .push((to_phone.to_string(), body.to_string()));
        if self.succeed {
            Ok("SM0001".to_string())
        } else {
            Err(SmsError::Rejected {
                status: 400,
                message: "Invalid 'To' Phone Number".to_string(),
            })
        }
    }
}

pub async fn demo_manager() -> (Arc<PasswordManager>, Arc<DemoSheet>) {
    let sheet = Arc::new(DemoSheet::new());
    let manager = PasswordManager::new(sheet.clone(), Arc::new(TwilioService::disabled()))
        .await
        .unwrap();
    (Arc::new(manager), sheet)
}

pub async fn manager_with_sms(sms: Arc<RecordingSms>) -> (Arc<PasswordManager>, Arc<DemoSheet>) {
    let sheet = Arc::new(DemoSheet::new());
    let manager = PasswordManager::new(sheet.clone(), sms).await.unwrap();
    (Arc::new(manager), sheet)
}

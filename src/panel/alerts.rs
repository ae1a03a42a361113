//! Dismissible alert banners of the admin page.

use crate::templates::AlertTemplate;
use askama::Template;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    /// False once the alert has started fading out
    pub shown: bool,
}

impl Alert {
    pub fn css_class(&self) -> String {
        let mut class = format!("alert alert-{} alert-dismissible fade", self.severity.as_str());
        if self.shown {
            class.push_str(" show");
        }
        class
    }

    /// Banner markup with a close button
    pub fn to_html(&self) -> askama::Result<String> {
        AlertTemplate {
            css_class: self.css_class(),
            message: self.message.clone(),
        }
        .render()
    }
}

#[derive(Debug, Default)]
struct BoardState {
    /// Most recent first
    alerts: Vec<Alert>,
    next_id: u64,
}

/// Container the alerts are rendered into.
///
/// Each shown alert hides itself after `timeout` and disappears `fade` later.
/// Cloning yields another handle to the same container.
#[derive(Debug, Clone)]
pub struct AlertBoard {
    state: Arc<Mutex<BoardState>>,
    timeout: Duration,
    fade: Duration,
}

impl AlertBoard {
    pub fn new(timeout: Duration, fade: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState::default())),
            timeout,
            fade,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert an alert at the top and schedule its removal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = {
            let mut state = self.lock();
            state.next_id += 1;
            let id = state.next_id;
            state.alerts.insert(
                0,
                Alert {
                    id,
                    message: message.into(),
                    severity,
                    shown: true,
                },
            );
            id
        };

        let board = self.clone();
        tokio::spawn(async move {
            sleep(board.timeout).await;
            board.hide(id);
            sleep(board.fade).await;
            board.dismiss(id);
        });

        id
    }

    fn hide(&self, id: u64) {
        if let Some(alert) = self.lock().alerts.iter_mut().find(|a| a.id == id) {
            alert.shown = false;
        }
    }

    /// Remove an alert right away. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut state = self.lock();
        let before = state.alerts.len();
        state.alerts.retain(|a| a.id != id);
        state.alerts.len() != before
    }

    /// Drop every alert, as a page reload does
    pub fn clear(&self) {
        self.lock().alerts.clear();
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.lock().alerts.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text rendering for the terminal page
    pub fn render(&self) -> String {
        self.lock()
            .alerts
            .iter()
            .map(|alert| {
                let fading = if alert.shown { "" } else { " (fading)" };
                format!(
                    "#{} [{}] {}{}",
                    alert.id,
                    alert.severity.as_str(),
                    alert.message,
                    fading
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

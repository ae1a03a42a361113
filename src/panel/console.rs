//! Terminal rendition of the admin page.

use crate::{
    models::PasswordStatistics,
    panel::{
        alerts::AlertBoard,
        api::HttpPanelApi,
        controller::{FormFields, PageReloader},
    },
};
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Vendor(String),
    Password(String),
    Reset,
    Refresh,
    Dismiss(u64),
    Show,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("`dismiss` expects an alert number, got {0:?}")]
    InvalidAlertId(String),
}

pub const HELP: &str = "\
commands:
  vendor <name>      select a vendor
  password <value>   type the password
  reset              submit the reset form
  refresh            reload the sheet data
  dismiss <n>        close alert #n
  show               redraw the page
  quit";

impl std::str::FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line.trim(), ""),
        };

        match word {
            "vendor" => Ok(Command::Vendor(rest.trim().to_string())),
            // Passwords are taken as typed, surrounding spaces included.
            "password" => Ok(Command::Password(rest.to_string())),
            "reset" => Ok(Command::Reset),
            "refresh" => Ok(Command::Refresh),
            "dismiss" => rest
                .trim()
                .parse()
                .map(Command::Dismiss)
                .map_err(|_| CommandError::InvalidAlertId(rest.trim().to_string())),
            "show" | "" => Ok(Command::Show),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    vendor: String,
    password: String,
    stats: Option<PasswordStatistics>,
}

/// Page state: the form inputs, the last loaded statistics and the alerts.
pub struct ConsolePage {
    state: Mutex<PageState>,
    api: HttpPanelApi,
    alerts: AlertBoard,
}

impl ConsolePage {
    pub fn new(api: HttpPanelApi, alerts: AlertBoard) -> Self {
        Self {
            state: Mutex::new(PageState::default()),
            api,
            alerts,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_vendor(&self, vendor: String) {
        self.lock().vendor = vendor;
    }

    pub fn set_password(&self, password: String) {
        self.lock().password = password;
    }

    pub fn render(&self) -> String {
        let state = self.lock();
        let mut page = String::from("=== Vendor Vault :: Admin ===\n");

        match &state.stats {
            Some(stats) => {
                let _ = writeln!(
                    page,
                    "vendors: {}  available: {}  used: {}",
                    stats.total_vendors, stats.available_passwords, stats.used_passwords
                );
                for vendor in &stats.vendor_stats {
                    let status = match (vendor.total_passwords, vendor.used) {
                        (0, _) => "sem senha",
                        (_, true) => "usada",
                        (_, false) => "disponível",
                    };
                    let _ = writeln!(page, "  {:<24} {}", vendor.vendor, status);
                }
            }
            None => page.push_str("statistics unavailable\n"),
        }

        let _ = writeln!(
            page,
            "\nvendor: [{}]  password: [{}]",
            state.vendor,
            "*".repeat(state.password.chars().count())
        );

        let alerts = self.alerts.render();
        if !alerts.is_empty() {
            let _ = writeln!(page, "\n{alerts}");
        }
        page
    }
}

impl FormFields for ConsolePage {
    fn vendor(&self) -> String {
        self.lock().vendor.clone()
    }

    fn password(&self) -> String {
        self.lock().password.clone()
    }

    fn clear_password(&self) {
        self.lock().password.clear();
    }
}

#[async_trait]
impl PageReloader for ConsolePage {
    async fn reload(&self) {
        self.alerts.clear();

        let stats = match self.api.fetch_stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "Could not load statistics");
                None
            }
        };

        {
            let mut state = self.lock();
            *state = PageState {
                stats,
                ..PageState::default()
            };
        }

        println!("{}", self.render());
    }
}

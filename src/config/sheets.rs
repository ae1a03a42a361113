//! Spreadsheet source configuration.

use super::{env_flag, env_non_empty};
use std::env;

pub const DEFAULT_SPREADSHEET_ID: &str = "1qLGNAkAVFzAcxQhfFgBzRBfIbDXFrTNFsNA_lTeSZeE";

#[derive(Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth access token for the Sheets API; demo mode when absent
    pub access_token: Option<String>,
    /// A1 range holding vendor, password and status columns
    pub range: String,
    pub api_base: String,
    /// Serve the in-memory demo sheet even when a token is configured
    pub force_demo: bool,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: DEFAULT_SPREADSHEET_ID.to_string(),
            access_token: None,
            range: "A:C".to_string(),
            api_base: "https://sheets.googleapis.com/v4".to_string(),
            force_demo: true,
        }
    }
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let spreadsheet_id = env_non_empty("GOOGLE_SPREADSHEET_ID")
            .or_else(|| env_non_empty("GOOGLE_SHEETS_ID"))
            .unwrap_or(defaults.spreadsheet_id);

        Self {
            spreadsheet_id,
            access_token: env_non_empty("GOOGLE_SHEETS_ACCESS_TOKEN"),
            range: env::var("GOOGLE_SHEETS_RANGE").unwrap_or(defaults.range),
            api_base: env::var("GOOGLE_SHEETS_API_BASE").unwrap_or(defaults.api_base),
            force_demo: env_flag("FORCE_DEMO", defaults.force_demo),
        }
    }

    /// Whether the in-memory demo sheet will be used.
    pub fn demo_mode(&self) -> bool {
        self.force_demo || self.access_token.is_none()
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("range", &self.range)
            .field("api_base", &self.api_base)
            .field("force_demo", &self.force_demo)
            .finish()
    }
}

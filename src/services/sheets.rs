//! Spreadsheet sources backing the password inventory.
//!
//! Rows follow a fixed layout: column A holds the vendor, column B the
//! password and column C the usage status. Row 1 of the sheet is a header.

use crate::{
    config::SheetsConfig,
    services::resilient_client::{
        OutboundRequest, ResilientClient, ResilientClientConfig, ResilientClientError,
        ResilientClientMetrics,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// Status literal marking a password as handed out.
pub const USED_MARKER: &str = "Usada";

pub const VENDOR_COLUMN: usize = 0;
pub const PASSWORD_COLUMN: usize = 1;
pub const STATUS_COLUMN: usize = 2;

pub type SheetRow = Vec<String>;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Sheets request failed: {0}")]
    Request(#[from] ResilientClientError),

    #[error("Sheets API returned status {0}")]
    Status(u16),

    #[error("Failed to decode sheet data: {0}")]
    Decode(String),

    #[error("Row {0} is outside the sheet")]
    RowOutOfRange(usize),

    #[error("Failed to create sheets client: {0}")]
    Client(String),
}

/// Read and update access to the password sheet.
///
/// Row numbers passed to the mark operations are 1-based sheet rows, so the
/// header is row 1 and the first vendor row is row 2.
#[async_trait]
pub trait SheetSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError>;

    async fn mark_used(&self, row_number: usize) -> Result<(), SheetError>;

    async fn mark_unused(&self, row_number: usize) -> Result<(), SheetError>;
}

/// Pick the sheet source for the given configuration.
pub fn sheet_source_from_config(
    config: &SheetsConfig,
    metrics: Option<ResilientClientMetrics>,
) -> Result<Arc<dyn SheetSource>, SheetError> {
    match (&config.access_token, config.force_demo) {
        (Some(token), false) => {
            info!(
                spreadsheet_id = %config.spreadsheet_id,
                range = %config.range,
                "Using Google Sheets as password source"
            );
            let source = GoogleSheetSource::new(config, token.clone(), metrics)?;
            Ok(Arc::new(source))
        }
        _ => {
            info!(
                force_demo = config.force_demo,
                "Using in-memory demo sheet as password source"
            );
            Ok(Arc::new(DemoSheet::new()))
        }
    }
}

/// In-memory sheet used in demo mode and in tests.
#[derive(Debug)]
pub struct DemoSheet {
    rows: Mutex<Vec<SheetRow>>,
}

impl DemoSheet {
    pub fn new() -> Self {
        Self::with_rows(demo_rows())
    }

    pub fn with_rows(rows: Vec<SheetRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Copy of the current rows.
    pub fn rows(&self) -> Vec<SheetRow> {
        self.lock_rows().clone()
    }

    fn lock_rows(&self) -> std::sync::MutexGuard<'_, Vec<SheetRow>> {
        // A panic while holding the lock cannot leave rows half-written.
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_status(&self, row_number: usize, status: &str) -> Result<(), SheetError> {
        let mut rows = self.lock_rows();
        let row = row_number
            .checked_sub(1)
            .and_then(|index| rows.get_mut(index))
            .ok_or(SheetError::RowOutOfRange(row_number))?;

        if row.len() <= STATUS_COLUMN {
            row.resize(STATUS_COLUMN + 1, String::new());
        }
        row[STATUS_COLUMN] = status.to_string();
        debug!(row_number, status, "Demo sheet row updated");
        Ok(())
    }
}

impl Default for DemoSheet {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SheetSource for DemoSheet {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        Ok(self.rows())
    }

    async fn mark_used(&self, row_number: usize) -> Result<(), SheetError> {
        self.set_status(row_number, USED_MARKER)
    }

    async fn mark_unused(&self, row_number: usize) -> Result<(), SheetError> {
        self.set_status(row_number, "")
    }
}

fn demo_rows() -> Vec<SheetRow> {
    [
        ["Fornecedor", "Senha", "Status"],
        ["Ambev", "ambev-7731", ""],
        ["Nestle", "nestle-4420", ""],
        ["Unilever", "unilever-9082", USED_MARKER],
        ["Coca-Cola", "coca-1187", ""],
        ["Danone", "", ""],
    ]
    .iter()
    .map(|row| row.iter().map(|cell| cell.to_string()).collect())
    .collect()
}

/// Google Sheets v4 `values` resource.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Sheet source talking to the Google Sheets REST API with a bearer token.
pub struct GoogleSheetSource {
    client: tokio::sync::Mutex<ResilientClient>,
    api_base: String,
    spreadsheet_id: String,
    range: String,
    access_token: String,
}

impl GoogleSheetSource {
    pub fn new(
        config: &SheetsConfig,
        access_token: String,
        metrics: Option<ResilientClientMetrics>,
    ) -> Result<Self, SheetError> {
        let client = ResilientClient::new(ResilientClientConfig::from_env(), metrics)
            .map_err(|e| SheetError::Client(e.to_string()))?;

        Ok(Self {
            client: tokio::sync::Mutex::new(client),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
            access_token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.api_base, self.spreadsheet_id, range
        )
    }

    async fn write_status(&self, row_number: usize, status: &str) -> Result<(), SheetError> {
        if row_number == 0 {
            return Err(SheetError::RowOutOfRange(row_number));
        }

        let cell = status_cell(&self.range, row_number);
        let body = ValueRange {
            range: Some(cell.clone()),
            major_dimension: Some("ROWS".to_string()),
            values: vec![vec![serde_json::Value::String(status.to_string())]],
        };
        let url = format!("{}?valueInputOption=RAW", self.values_url(&cell));
        let request = OutboundRequest::put_json(url, &body)?.with_bearer(&self.access_token);

        let response = self.client.lock().await.send(request).await?;
        if !response.status().is_success() {
            return Err(SheetError::Status(response.status().as_u16()));
        }

        debug!(cell = %cell, status, "Sheet status cell updated");
        Ok(())
    }
}

#[async_trait]
impl SheetSource for GoogleSheetSource {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn fetch_rows(&self) -> Result<Vec<SheetRow>, SheetError> {
        let request =
            OutboundRequest::get(self.values_url(&self.range)).with_bearer(&self.access_token);
        let response = self.client.lock().await.send(request).await?;

        if !response.status().is_success() {
            return Err(SheetError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))?;
        parse_value_range(&body)
    }

    async fn mark_used(&self, row_number: usize) -> Result<(), SheetError> {
        self.write_status(row_number, USED_MARKER).await
    }

    async fn mark_unused(&self, row_number: usize) -> Result<(), SheetError> {
        self.write_status(row_number, "").await
    }
}

/// Decode a `values.get` response into string rows.
fn parse_value_range(body: &str) -> Result<Vec<SheetRow>, SheetError> {
    let range: ValueRange =
        serde_json::from_str(body).map_err(|e| SheetError::Decode(e.to_string()))?;

    Ok(range
        .values
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect())
}

/// A1 reference of the status cell, keeping the sheet prefix of `range`.
fn status_cell(range: &str, row_number: usize) -> String {
    match range.split_once('!') {
        Some((sheet, _)) => format!("{sheet}!C{row_number}"),
        None => format!("C{row_number}"),
    }
}

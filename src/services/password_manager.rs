//! Password inventory: assignment, reset, refresh and statistics.
//!
//! The manager keeps a cached copy of the sheet plus an index from lowercase
//! vendor name to row. Writes go to the sheet first and are mirrored into the
//! cache only when the sheet accepted them.

use crate::{
    models::{PasswordAssignment, PasswordStatistics, SmsStatus, VendorStats},
    services::{
        sheets::{
            PASSWORD_COLUMN, STATUS_COLUMN, SheetError, SheetRow, SheetSource, USED_MARKER,
            VENDOR_COLUMN,
        },
        sms::{SmsSender, password_sms_body},
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct Inventory {
    rows: Vec<SheetRow>,
    /// lowercase vendor -> index into `rows`
    vendor_index: HashMap<String, usize>,
}

impl Inventory {
    fn from_rows(rows: Vec<SheetRow>) -> Self {
        let mut vendor_index = HashMap::new();
        // Row 0 is the header. Later rows win on duplicate vendor names.
        for (index, row) in rows.iter().enumerate().skip(1) {
            if let Some(vendor) = row.get(VENDOR_COLUMN) {
                vendor_index.insert(vendor.to_lowercase(), index);
            }
        }
        Self { rows, vendor_index }
    }

    fn lookup(&self, vendor: &str) -> Option<usize> {
        self.vendor_index.get(&vendor.to_lowercase()).copied()
    }
}

fn cell(row: &SheetRow, column: usize) -> Option<&str> {
    row.get(column).map(String::as_str)
}

fn is_used(row: &SheetRow) -> bool {
    cell(row, STATUS_COLUMN) == Some(USED_MARKER)
}

fn has_password(row: &SheetRow) -> bool {
    cell(row, PASSWORD_COLUMN).is_some_and(|p| !p.trim().is_empty())
}

pub struct PasswordManager {
    sheet: Arc<dyn SheetSource>,
    sms: Arc<dyn SmsSender>,
    inventory: RwLock<Inventory>,
}

impl PasswordManager {
    /// Create the manager and load the sheet once.
    pub async fn new(
        sheet: Arc<dyn SheetSource>,
        sms: Arc<dyn SmsSender>,
    ) -> Result<Self, SheetError> {
        let manager = Self {
            sheet,
            sms,
            inventory: RwLock::new(Inventory::default()),
        };
        manager.refresh_data().await?;
        Ok(manager)
    }

    pub fn sheet_source_name(&self) -> &'static str {
        self.sheet.name()
    }

    pub fn sms_configured(&self) -> bool {
        self.sms.is_configured()
    }

    /// Re-read the sheet and rebuild the vendor index.
    ///
    /// Returns the number of indexed vendors.
    pub async fn refresh_data(&self) -> Result<usize, SheetError> {
        let rows = self.sheet.fetch_rows().await.map_err(|e| {
            error!(source = self.sheet.name(), error = %e, "Error refreshing password data");
            e
        })?;

        let inventory = Inventory::from_rows(rows);
        let vendors = inventory.vendor_index.len();
        *self.inventory.write().await = inventory;

        debug!(vendors, "Refreshed password data");
        Ok(vendors)
    }

    /// Hand out the vendor's password and mark it used.
    ///
    /// Returns `None` when the vendor is unknown, its password is already
    /// used or blank, or the sheet refused the update.
    pub async fn get_next_password(&self, vendor: &str) -> Option<PasswordAssignment> {
        // The write lock spans the sheet update so a password is never handed out twice.
        let mut inventory = self.inventory.write().await;

        let Some(index) = inventory.lookup(vendor) else {
            warn!(vendor, "Vendor not found");
            return None;
        };

        let row = &inventory.rows[index];
        if is_used(row) || !has_password(row) {
            warn!(vendor, "No available passwords for vendor");
            return None;
        }

        let row_number = index + 1;
        if let Err(e) = self.sheet.mark_used(row_number).await {
            error!(vendor, row_number, error = %e, "Error marking password as used");
            return None;
        }

        let row = &mut inventory.rows[index];
        if row.len() <= STATUS_COLUMN {
            row.resize(STATUS_COLUMN + 1, String::new());
        }
        row[STATUS_COLUMN] = USED_MARKER.to_string();

        let assignment = PasswordAssignment {
            vendor: row[VENDOR_COLUMN].clone(),
            password: row[PASSWORD_COLUMN].clone(),
            password_number: PASSWORD_COLUMN as u64,
            row_index: row_number as u64,
            sms_sent: None,
            sms_status: None,
        };
        info!(vendor = %assignment.vendor, row_number, "Password marked as used");
        Some(assignment)
    }

    /// Text the password to `phone_number`. Failures are logged, never raised.
    pub async fn send_password_by_sms(&self, phone_number: &str, vendor: &str, password: &str) -> bool {
        if !self.sms.is_configured() {
            warn!("SMS not configured. Cannot send password.");
            return false;
        }

        match self
            .sms
            .send_sms(phone_number, &password_sms_body(vendor, password))
            .await
        {
            Ok(_) => {
                info!(vendor, "Password delivered by SMS");
                true
            }
            Err(e) => {
                error!(vendor, error = %e, "Failed to send password by SMS");
                false
            }
        }
    }

    /// Assign the next password and optionally text it, then reload the sheet.
    pub async fn auto_assign_next_password(
        &self,
        vendor: &str,
        phone_number: Option<&str>,
    ) -> Option<PasswordAssignment> {
        let Some(mut assignment) = self.get_next_password(vendor).await else {
            warn!(vendor, "No available passwords to auto-assign");
            return None;
        };

        if let Some(phone) = phone_number.filter(|p| !p.trim().is_empty()) {
            if self.sms.is_configured() {
                let sent = self
                    .send_password_by_sms(phone, &assignment.vendor, &assignment.password)
                    .await;
                assignment.sms_sent = Some(sent);
            }
            assignment.sms_status = Some(SmsStatus::from_sent(assignment.sms_sent == Some(true)));
        }

        info!(vendor = %assignment.vendor, row = assignment.row_index, "Auto-assigned password");

        // The password is already consumed in the sheet; a failed reload only
        // leaves the cache stale until the next refresh.
        if let Err(e) = self.refresh_data().await {
            warn!(error = %e, "Refresh after assignment failed; serving cached data");
        }

        Some(assignment)
    }

    /// Put a used password back into circulation.
    ///
    /// The password must match the vendor's column B exactly.
    pub async fn reset_password(&self, vendor: &str, password: &str) -> bool {
        let mut inventory = self.inventory.write().await;

        let Some(index) = inventory.lookup(vendor) else {
            warn!(vendor, "Vendor not found");
            return false;
        };

        if cell(&inventory.rows[index], PASSWORD_COLUMN) != Some(password) {
            warn!(vendor, "Password not found for vendor");
            return false;
        }

        let row_number = index + 1;
        if let Err(e) = self.sheet.mark_unused(row_number).await {
            error!(vendor, row_number, error = %e, "Error resetting password");
            return false;
        }

        if let Some(status) = inventory.rows[index].get_mut(STATUS_COLUMN) {
            status.clear();
        }
        info!(vendor, row_number, "Password reset to unused");
        true
    }

    /// Usage counters over the cached sheet
    pub async fn statistics(&self) -> PasswordStatistics {
        let inventory = self.inventory.read().await;

        let mut stats = PasswordStatistics {
            total_vendors: inventory.vendor_index.len() as u64,
            ..Default::default()
        };

        for row in inventory.rows.iter().skip(1).filter(|row| !row.is_empty()) {
            let used = is_used(row);
            let with_password = has_password(row);

            if with_password {
                if used {
                    stats.used_passwords += 1;
                } else {
                    stats.available_passwords += 1;
                }
            }

            stats.vendor_stats.push(VendorStats {
                vendor: row[VENDOR_COLUMN].clone(),
                total_passwords: u64::from(with_password),
                used,
            });
        }

        stats
    }
}

//! Askama templates for the server-rendered pages.
//!
//! Templates live under `templates/` and are compiled into the binary.
//! Every `{{ }}` expression is HTML-escaped.

use crate::models::{PasswordStatistics, VendorStats};
use askama::Template;

/// One line of the vendor table
#[derive(Debug, Clone)]
pub struct VendorRow {
    pub vendor: String,
    pub css_class: &'static str,
    pub label: &'static str,
}

impl From<&VendorStats> for VendorRow {
    fn from(stats: &VendorStats) -> Self {
        let (css_class, label) = match (stats.total_passwords, stats.used) {
            (0, _) => ("", "Sem senha"),
            (_, true) => ("used", "Usada"),
            (_, false) => ("available", "Disponível"),
        };
        Self {
            vendor: stats.vendor.clone(),
            css_class,
            label,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub sheet_source: String,
    pub total_vendors: u64,
    pub available_passwords: u64,
    pub used_passwords: u64,
    pub vendors: Vec<VendorRow>,
}

impl DashboardTemplate {
    pub fn new(stats: &PasswordStatistics, sheet_source: &str) -> Self {
        Self {
            title: "Vendor Vault".to_string(),
            sheet_source: sheet_source.to_string(),
            total_vendors: stats.total_vendors,
            available_passwords: stats.available_passwords,
            used_passwords: stats.used_passwords,
            vendors: stats.vendor_stats.iter().map(VendorRow::from).collect(),
        }
    }
}

/// Dismissible alert banner
#[derive(Template)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate {
    pub css_class: String,
    pub message: String,
}

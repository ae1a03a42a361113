//! Event handlers of the admin page.

use crate::{
    models::PanelReply,
    panel::{
        alerts::{AlertBoard, Severity},
        api::{PanelApi, PanelError},
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

pub const MSG_FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos";
pub const MSG_RESET_OK: &str = "Senha resetada com sucesso!";
pub const MSG_REFRESH_OK: &str = "Dados atualizados com sucesso!";
pub const MSG_COMMUNICATION_ERROR: &str = "Erro ao comunicar com o servidor";

/// Text of a failure the server reported itself
pub fn declared_failure(message: Option<&str>) -> String {
    format!("Erro: {}", message.unwrap_or_default())
}

/// The reset form's inputs
pub trait FormFields: Send + Sync {
    fn vendor(&self) -> String;
    fn password(&self) -> String;
    fn clear_password(&self);
}

#[async_trait]
pub trait PageReloader: Send + Sync {
    /// Discard the page state and load it again
    async fn reload(&self);
}

impl<T: FormFields + ?Sized> FormFields for Arc<T> {
    fn vendor(&self) -> String {
        (**self).vendor()
    }

    fn password(&self) -> String {
        (**self).password()
    }

    fn clear_password(&self) {
        (**self).clear_password()
    }
}

#[async_trait]
impl<T: PageReloader + ?Sized> PageReloader for Arc<T> {
    async fn reload(&self) {
        (**self).reload().await
    }
}

#[async_trait]
impl<T: PanelApi + ?Sized> PanelApi for Arc<T> {
    async fn reset_password(&self, vendor: &str, password: &str) -> Result<PanelReply, PanelError> {
        (**self).reset_password(vendor, password).await
    }

    async fn refresh_sheet(&self) -> Result<PanelReply, PanelError> {
        (**self).refresh_sheet().await
    }
}

/// Wires the reset form, the refresh button and the vendor select to the
/// backend, reporting every outcome on the alert board.
///
/// Nothing is retried and concurrent submissions are not coalesced.
pub struct AdminPanelController<A, F, R> {
    api: A,
    form: F,
    reloader: R,
    alerts: AlertBoard,
}

impl<A, F, R> AdminPanelController<A, F, R>
where
    A: PanelApi,
    F: FormFields,
    R: PageReloader,
{
    pub fn new(api: A, form: F, reloader: R, alerts: AlertBoard) -> Self {
        Self {
            api,
            form,
            reloader,
            alerts,
        }
    }

    pub fn alerts(&self) -> &AlertBoard {
        &self.alerts
    }

    /// Reset form submission
    pub async fn submit_reset(&self) {
        let vendor = self.form.vendor();
        let password = self.form.password();

        if vendor.is_empty() || password.is_empty() {
            self.alerts.show(MSG_FILL_ALL_FIELDS, Severity::Danger);
            return;
        }

        match self.api.reset_password(&vendor, &password).await {
            Ok(reply) if reply.success => {
                self.alerts.show(MSG_RESET_OK, Severity::Success);
                self.form.clear_password();
                self.refresh().await;
            }
            Ok(reply) => {
                self.alerts
                    .show(declared_failure(reply.message.as_deref()), Severity::Danger);
            }
            Err(e) => {
                error!(error = %e, "Password reset request failed");
                self.alerts.show(MSG_COMMUNICATION_ERROR, Severity::Danger);
            }
        }
    }

    /// Refresh button click
    pub async fn refresh(&self) {
        match self.api.refresh_sheet().await {
            Ok(reply) if reply.success => {
                self.alerts.show(MSG_REFRESH_OK, Severity::Success);
                self.reloader.reload().await;
            }
            Ok(reply) => {
                self.alerts
                    .show(declared_failure(reply.message.as_deref()), Severity::Danger);
            }
            Err(e) => {
                error!(error = %e, "Sheet refresh request failed");
                self.alerts.show(MSG_COMMUNICATION_ERROR, Severity::Danger);
            }
        }
    }

    /// Vendor select change. Intentionally does nothing yet.
    pub fn on_vendor_change(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_failure_text() {
        assert_eq!(declared_failure(Some("Vendor not found")), "Erro: Vendor not found");
        assert_eq!(declared_failure(None), "Erro: ");
    }
}

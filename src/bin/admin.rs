use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use vendor_vault::{
    AdminPanelController, AlertBoard, HttpPanelApi, PanelConfig,
    panel::{
        PageReloader,
        console::{Command, ConsolePage, HELP},
    },
    telemetry::init_tracing,
};

type Controller = AdminPanelController<HttpPanelApi, Arc<ConsolePage>, Arc<ConsolePage>>;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = PanelConfig::from_env();
    let alerts = AlertBoard::new(config.alert_timeout(), config.alert_fade());
    let api = HttpPanelApi::new(config.clone()).map_err(std::io::Error::other)?;

    let page = Arc::new(ConsolePage::new(api.clone(), alerts.clone()));
    let controller: Arc<Controller> =
        Arc::new(AdminPanelController::new(api, page.clone(), page.clone(), alerts.clone()));

    tracing::info!(server = %config.base_url, "Admin panel started");
    page.reload().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Vendor(vendor) => {
                page.set_vendor(vendor);
                controller.on_vendor_change();
            }
            Command::Password(password) => page.set_password(password),
            Command::Reset => {
                let controller = controller.clone();
                let page = page.clone();
                tokio::spawn(async move {
                    controller.submit_reset().await;
                    println!("{}", page.render());
                });
            }
            Command::Refresh => {
                let controller = controller.clone();
                let page = page.clone();
                tokio::spawn(async move {
                    controller.refresh().await;
                    println!("{}", page.render());
                });
            }
            Command::Dismiss(id) => {
                if !alerts.dismiss(id) {
                    println!("no alert #{id}");
                }
            }
            Command::Show => println!("{}", page.render()),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}

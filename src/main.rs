mod common;
mod config;
mod error;
mod network;
mod referral;
#[cfg(test)]
mod testing;
mod ui;

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use network::HttpReferralApi;
use referral::{ControllerSettings, ReferralController};
use tokio::sync::mpsc;
use ui::{OwnReferral, ReferralApp, SharedPage};
use url::Url;

#[derive(Parser)]
#[command(
    name = "referral_client",
    version,
    about = "Referral capture, live stats and link sharing"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Page URL to bootstrap for (overrides `page_url` in the config)
    #[arg(long, value_name = "URL")]
    page: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    if let Some(page) = cli.page {
        app_config.page_url = page;
    }

    let page_url = match Url::parse(&app_config.page_url) {
        Ok(url) => url,
        Err(err) => {
            log::error!("Invalid page URL `{}`: {err}", app_config.page_url);
            std::process::exit(1);
        }
    };
    let settings = match ControllerSettings::from_config(&app_config) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    let api = match HttpReferralApi::new(&app_config) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    // Trang hiện tại: chỉ trang referrals mới có các ô số liệu.
    let page = if referral::poller::is_referrals_page(page_url.path(), &settings.referrals_pattern) {
        SharedPage::with_stat_elements()
    } else {
        SharedPage::new()
    };

    // UI -> Controller
    let (cmd_tx, cmd_rx) = mpsc::channel(100);

    let mut controller = ReferralController::new(
        api,
        Arc::new(page.clone()),
        Arc::new(page.clone()),
        settings,
        cmd_rx,
    );
    controller.start(&page_url);
    tokio::spawn(controller.run());

    let own = app_config.referral_code.clone().map(|code| OwnReferral {
        site_url: app_config.base_url.clone(),
        code,
    });

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Referral Center",
        options,
        Box::new(move |cc| {
            log::info!("Referral window opened for {page_url}");
            Ok(Box::new(ReferralApp::new(cc, page, cmd_tx, own)))
        }),
    )
}

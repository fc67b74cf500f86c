use std::time::Duration;

use chrono::Utc;
use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{PageView, ShareCommand};
use crate::referral::notify::Severity;
use crate::referral::share;

use super::components::{
    banner, bulk_dialog,
    share_bar::{self, ShareActions},
    stats_panel, toasts,
};
use super::state::SharedPage;

/// The signed-in user's own referral code and the site it points to.
#[derive(Debug, Clone)]
pub struct OwnReferral {
    pub site_url: String,
    pub code: String,
}

impl OwnReferral {
    pub fn link(&self) -> String {
        share::referral_link(&self.site_url, &self.code)
    }
}

pub struct ReferralApp {
    page: SharedPage,
    command_sender: mpsc::Sender<ShareCommand>,
    own: Option<OwnReferral>,
}

impl ReferralApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        page: SharedPage,
        command_sender: mpsc::Sender<ShareCommand>,
        own: Option<OwnReferral>,
    ) -> Self {
        Self {
            page,
            command_sender,
            own,
        }
    }

    fn send_command(&self, command: ShareCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to controller: {err}");
        }
    }

    fn handle_share_actions(&self, ctx: &egui::Context, actions: ShareActions) {
        if let Some((target, message)) = actions.share {
            self.send_command(ShareCommand::Share {
                target: target.as_str().to_string(),
                message,
            });
        }
        if actions.show_qr {
            self.send_command(ShareCommand::ShowQrCode);
        }
        if actions.copy_link {
            if let Some(own) = &self.own {
                ctx.copy_text(own.link());
                self.page.notify("Referral link copied", Severity::Info);
            }
        }
    }
}

impl eframe::App for ReferralApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Utc::now();
        let mut actions = ShareActions::default();
        let mut bulk_submit = None;

        {
            let mut state = self.page.lock();
            for url in state.take_navigations() {
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
            state.prune_notifications(now);

            if let Some(code) = state.banner.clone() {
                egui::TopBottomPanel::top("referral_banner").show(ctx, |ui| {
                    if banner::render(ui, &code) {
                        state.dismiss_banner();
                    }
                });
            }

            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Referral Center");
                ui.separator();
                stats_panel::render(ui, &state, now);

                ui.separator();
                match &self.own {
                    Some(own) => actions = share_bar::render(ui, &mut state, own),
                    None => {
                        ui.label("Set referral_code in the config to share your link.");
                    }
                }
            });

            if state.bulk_dialog.open {
                bulk_submit = bulk_dialog::render(ctx, &mut state.bulk_dialog);
            }

            toasts::render(ctx, &state.notifications, now);
        }

        self.handle_share_actions(ctx, actions);
        if let Some((recipients, message)) = bulk_submit {
            self.send_command(ShareCommand::SendBulk {
                recipients,
                message,
            });
        }

        // Highlights and toasts are time based.
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

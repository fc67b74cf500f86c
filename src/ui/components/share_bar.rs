use eframe::egui;

use crate::referral::share::{self, ShareTarget};
use crate::ui::app::OwnReferral;
use crate::ui::state::PageState;

const CAMPAIGN_LINK_COUNT: usize = 5;

#[derive(Default)]
pub struct ShareActions {
    pub share: Option<(ShareTarget, String)>,
    pub show_qr: bool,
    pub copy_link: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut PageState, own: &OwnReferral) -> ShareActions {
    let mut actions = ShareActions::default();
    let link = own.link();

    ui.heading("Share your link");
    ui.horizontal(|ui| {
        ui.monospace(&link);
        if ui.button("Copy").clicked() {
            actions.copy_link = true;
        }
        if ui.button("QR code").clicked() {
            actions.show_qr = true;
        }
    });

    ui.label("Message (your link is added at the end):");
    ui.text_edit_multiline(&mut state.share_message);

    ui.horizontal(|ui| {
        for target in ShareTarget::ALL {
            if ui.button(target.label()).clicked() {
                actions.share = Some((target, state.share_message.clone()));
            }
        }
        if ui.button("Bulk WhatsApp…").clicked() {
            state.bulk_dialog.open = true;
        }
    });

    ui.separator();
    ui.label("Campaign links:");
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut state.campaign);
        if ui.button("Generate").clicked() {
            state.campaign_links =
                share::campaign_links(&own.site_url, &own.code, &state.campaign, CAMPAIGN_LINK_COUNT);
        }
    });
    for campaign_link in &state.campaign_links {
        ui.monospace(campaign_link);
    }

    actions
}

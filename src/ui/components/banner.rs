use eframe::egui;

use crate::common::ReferralCode;

/// Returns `true` when the user dismissed the banner.
pub fn render(ui: &mut egui::Ui, code: &ReferralCode) -> bool {
    let mut dismissed = false;
    ui.horizontal(|ui| {
        ui.colored_label(egui::Color32::from_rgb(40, 167, 69), "🎉");
        ui.label("You were invited by a friend! Sign up to start earning from surveys.");
        ui.label(egui::RichText::new(format!("Referral code: {code}")).weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("✕").clicked() {
                dismissed = true;
            }
        });
    });
    dismissed
}

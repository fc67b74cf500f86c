use chrono::{DateTime, Utc};
use eframe::egui;

use crate::referral::notify::{Notification, Phase, Severity};

const SLIDE_DISTANCE: f32 = 40.0;

pub fn render(ctx: &egui::Context, notifications: &[Notification], now: DateTime<Utc>) {
    // Toasts share one anchor and may overlap.
    for toast in notifications {
        let (opacity, offset) = match toast.phase_at(now) {
            Phase::Entering(progress) => (progress, (1.0 - progress) * SLIDE_DISTANCE),
            Phase::Visible => (1.0, 0.0),
            Phase::Leaving(progress) => (1.0 - progress, progress * SLIDE_DISTANCE),
            Phase::Expired => continue,
        };

        let color = match toast.severity {
            Severity::Info => egui::Color32::from_rgb(23, 162, 184),
            Severity::Success => egui::Color32::from_rgb(40, 167, 69),
            Severity::Error => egui::Color32::from_rgb(220, 53, 69),
        };

        egui::Area::new(egui::Id::new(("toast", toast.id)))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0 + offset, 16.0))
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(color, &toast.message);
                });
            });
    }
}

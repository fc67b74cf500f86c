use chrono::{DateTime, Utc};
use eframe::egui;

use crate::referral::poller::StatField;
use crate::ui::state::PageState;

const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(40, 167, 69);

pub fn render(ui: &mut egui::Ui, state: &PageState, now: DateTime<Utc>) {
    if state.elements.is_empty() {
        return;
    }

    ui.heading("Your referrals");
    egui::Grid::new("referral_stats")
        .num_columns(2)
        .spacing([24.0, 6.0])
        .show(ui, |ui| {
            for field in StatField::ALL {
                let element = field.element_id();
                // Elements the page does not carry are simply not shown.
                let Some(text) = state.text_of(element) else {
                    continue;
                };

                ui.label(field.label());
                let mut value = egui::RichText::new(text).strong();
                if state.is_highlighted(element, now) {
                    value = value.color(HIGHLIGHT_COLOR);
                }
                ui.label(value);
                ui.end_row();
            }
        });
}

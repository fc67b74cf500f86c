use eframe::egui;

use crate::ui::state::BulkDialog;

/// Returns `(recipients, message)` when the user presses Send.
pub fn render(ctx: &egui::Context, dialog: &mut BulkDialog) -> Option<(String, String)> {
    let mut open = dialog.open;
    let mut submit = None;

    egui::Window::new("Send to multiple contacts")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .show(ctx, |ui| {
            ui.label("Phone numbers (one per line, e.g. 254700000001):");
            ui.text_edit_multiline(&mut dialog.recipients);
            ui.label("Message (leave empty for the default):");
            ui.text_edit_multiline(&mut dialog.message);
            if ui.button("Send").clicked() {
                submit = Some((dialog.recipients.clone(), dialog.message.clone()));
            }
        });

    dialog.open = open;
    submit
}

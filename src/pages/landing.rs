use egui::{RichText, Ui};

/// The welcome screen. Returns true when the child taps start; there is no
/// login, the caller just creates the placeholder user.
pub fn landing_ui(ui: &mut Ui) -> bool {
    let mut start = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.22);
        ui.label(RichText::new("🎒✨").size(64.0));
        ui.heading(RichText::new("KidSpark").size(48.0).strong());
        ui.label(
            RichText::new("Learn, play and create — your magical school adventure!")
                .size(20.0)
                .weak(),
        );
        ui.add_space(24.0);
        let button = egui::Button::new(RichText::new("🚀 Start Learning!").size(24.0))
            .min_size(egui::vec2(260.0, 60.0));
        if ui.add(button).clicked() {
            start = true;
        }
    });
    start
}

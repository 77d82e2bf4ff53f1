//! Subject activities: the AI lesson reader, quiz, typing trainer and the
//! poem player. Each screen owns its content lifecycle ([`crate::ai::Load`])
//! and surfaces failures as a retry affordance, never an error dialog.

use egui::Ui;

mod lesson;
mod poems;
mod quiz;
mod typing;

pub use lesson::{LessonAction, LessonView};
pub use poems::PoemView;
pub use quiz::{QuizAction, QuizView};
pub use typing::{TypingAction, TypingView};

/// Spinner + message while a fetch is in flight.
pub(crate) fn loading_ui(ui: &mut Ui, message: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(80.0);
        ui.spinner();
        ui.add_space(12.0);
        ui.label(egui::RichText::new(message).size(18.0).strong());
    });
}

/// The shared "the AI needs a nap" retry card. Returns true when the child
/// taps retry.
pub(crate) fn retry_ui(ui: &mut Ui, error: &crate::ai::AiError) -> bool {
    let mut retry = false;
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(egui::RichText::new("😕").size(56.0));
        ui.label(
            egui::RichText::new("Oops! The AI needs a nap. Try again!")
                .size(20.0)
                .strong(),
        );
        ui.label(egui::RichText::new(error.to_string()).weak());
        ui.add_space(12.0);
        if ui.button(egui::RichText::new("Try Again").size(18.0)).clicked() {
            retry = true;
        }
    });
    retry
}

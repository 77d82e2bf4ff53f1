use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};

use crate::app::Services;
use crate::audio::{Tone, notes};

/// Key label, fill color, frequency.
const KEYS: [(&str, Color32, f32); 8] = [
    ("C", Color32::from_rgb(0xef, 0x44, 0x44), notes::C4),
    ("D", Color32::from_rgb(0xf9, 0x73, 0x16), notes::D4),
    ("E", Color32::from_rgb(0xfa, 0xcc, 0x15), notes::E4),
    ("F", Color32::from_rgb(0x22, 0xc5, 0x5e), notes::F4),
    ("G", Color32::from_rgb(0x06, 0xb6, 0xd4), notes::G4),
    ("A", Color32::from_rgb(0x3b, 0x82, 0xf6), notes::A4),
    ("B", Color32::from_rgb(0x8b, 0x5c, 0xf6), notes::B4),
    ("C", Color32::from_rgb(0xec, 0x48, 0x99), notes::C5),
];

const PRESS_FLASH: Duration = Duration::from_millis(200);

/// Flash color for a pressed key: halfway to white.
fn lighten(color: Color32) -> Color32 {
    Color32::from_rgb(
        color.r() / 2 + 128,
        color.g() / 2 + 128,
        color.b() / 2 + 128,
    )
}

/// An eight-key color keyboard. Notes ring for a second with a soft decay.
pub struct MusicStudio {
    pressed: Option<(usize, Instant)>,
}

impl MusicStudio {
    pub fn new() -> Self {
        Self { pressed: None }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        if self
            .pressed
            .is_some_and(|(_, at)| at.elapsed() >= PRESS_FLASH)
        {
            self.pressed = None;
        }
        if self.pressed.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(50));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🎹 Music Studio");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(16.0);

        ui.horizontal(|ui| {
            let key_width =
                ((ui.available_width() - 7.0 * ui.spacing().item_spacing.x) / 8.0).max(40.0);
            for (i, (label, color, freq)) in KEYS.iter().enumerate() {
                let lit = self.pressed.is_some_and(|(k, _)| k == i);
                let fill = if lit { lighten(*color) } else { *color };
                let height = if lit { 200.0 } else { 220.0 };
                let button = egui::Button::new(RichText::new(*label).size(24.0).strong())
                    .fill(fill)
                    .min_size(egui::vec2(key_width, height));
                if ui.add(button).clicked() {
                    services.tones.play(Tone::note(*freq, 1.0));
                    self.pressed = Some((i, Instant::now()));
                }
            }
        });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Tap a colorful key to play a song! 🎵").weak());
            if !services.tones.available() {
                ui.label(
                    RichText::new("(No audio player found, the keys are quiet today.)")
                        .small()
                        .weak(),
                );
            }
        });
        exit
    }
}

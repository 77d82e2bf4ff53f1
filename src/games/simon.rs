use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use rand::Rng;

use crate::app::Services;
use crate::audio::{Tone, Waveform, notes};

/// Pad color, lit color and tone for the four quadrants.
const PADS: [(Color32, Color32, f32); 4] = [
    (
        Color32::from_rgb(0x22, 0xc5, 0x5e),
        Color32::from_rgb(0x86, 0xef, 0xac),
        notes::C4,
    ),
    (
        Color32::from_rgb(0xef, 0x44, 0x44),
        Color32::from_rgb(0xfc, 0xa5, 0xa5),
        notes::E4,
    ),
    (
        Color32::from_rgb(0xfa, 0xcc, 0x15),
        Color32::from_rgb(0xfe, 0xf0, 0x8a),
        notes::G4,
    ),
    (
        Color32::from_rgb(0x3b, 0x82, 0xf6),
        Color32::from_rgb(0x93, 0xc5, 0xfd),
        notes::C5,
    ),
];

const FLASH: Duration = Duration::from_millis(400);
const GAP: Duration = Duration::from_millis(300);

enum Phase {
    Idle,
    /// Machine is replaying the sequence; `step` is the next index to flash.
    Playback { step: usize, next_at: Instant },
    UserTurn,
    Over,
}

/// Simon: watch the color sequence, then echo it. One mistake ends the
/// round.
pub struct SimonGame {
    sequence: Vec<usize>,
    user_pos: usize,
    phase: Phase,
    lit: Option<(usize, Instant)>,
    score: u32,
    message: &'static str,
}

impl SimonGame {
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            user_pos: 0,
            phase: Phase::Idle,
            lit: None,
            score: 0,
            message: "Press Play to Start!",
        }
    }

    fn start(&mut self) {
        self.score = 0;
        self.sequence = vec![rand::rng().random_range(0..PADS.len())];
        self.begin_playback();
    }

    fn begin_playback(&mut self) {
        self.user_pos = 0;
        self.message = "Watch carefully...";
        self.phase = Phase::Playback {
            step: 0,
            next_at: Instant::now() + Duration::from_millis(800),
        };
    }

    fn flash(&mut self, pad: usize, services: &Services) {
        self.lit = Some((pad, Instant::now() + FLASH));
        services.tones.play(Tone::note(PADS[pad].2, 0.5));
    }

    fn tick(&mut self, services: &Services) {
        let now = Instant::now();
        if self.lit.is_some_and(|(_, until)| now >= until) {
            self.lit = None;
        }
        let Phase::Playback { step, next_at } = &self.phase else {
            return;
        };
        if now < *next_at {
            return;
        }
        let step = *step;
        if step < self.sequence.len() {
            let pad = self.sequence[step];
            self.flash(pad, services);
            self.phase = Phase::Playback {
                step: step + 1,
                next_at: now + FLASH + GAP,
            };
        } else {
            self.phase = Phase::UserTurn;
            self.message = "Your turn!";
        }
    }

    fn press(&mut self, pad: usize, services: &Services) {
        if !matches!(self.phase, Phase::UserTurn) {
            return;
        }
        self.flash(pad, services);
        if self.sequence[self.user_pos] != pad {
            self.message = "Game Over!";
            self.phase = Phase::Over;
            services.tones.play(Tone {
                freq: 150.0,
                duration: 0.5,
                wave: Waveform::Square,
                gain: 0.3,
            });
            return;
        }
        self.user_pos += 1;
        if self.user_pos == self.sequence.len() {
            self.score += 1;
            self.message = "Good job! Next round...";
            self.sequence.push(rand::rng().random_range(0..PADS.len()));
            self.phase = Phase::Playback {
                step: 0,
                next_at: Instant::now() + Duration::from_millis(1000),
            };
            self.user_pos = 0;
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        self.tick(services);
        if !matches!(self.phase, Phase::Idle | Phase::Over) || self.lit.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(40));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🔔 Simon Says");
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(self.message)
                    .size(22.0)
                    .strong()
                    .color(Color32::from_rgb(0x7c, 0x3a, 0xed)),
            );
        });
        ui.add_space(8.0);

        let lit_pad = self.lit.map(|(pad, _)| pad);
        ui.vertical_centered(|ui| {
            egui::Grid::new("simon-pads").spacing([8.0, 8.0]).show(ui, |ui| {
                for row in 0..2 {
                    for col in 0..2 {
                        let pad = row * 2 + col;
                        let (base, bright, _) = PADS[pad];
                        let fill = if lit_pad == Some(pad) { bright } else { base };
                        let button = egui::Button::new("    ")
                            .fill(fill)
                            .min_size(egui::vec2(120.0, 120.0));
                        if ui.add(button).clicked() {
                            self.press(pad, services);
                        }
                    }
                    ui.end_row();
                }
            });
            ui.add_space(10.0);
            match self.phase {
                Phase::Idle | Phase::Over => {
                    if ui.button(RichText::new("▶ Start").size(20.0)).clicked() {
                        self.start();
                    }
                }
                _ => {}
            }
        });
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Services {
        Services::silent_for_tests()
    }

    fn in_user_turn(sequence: Vec<usize>) -> SimonGame {
        let mut game = SimonGame::new();
        game.sequence = sequence;
        game.phase = Phase::UserTurn;
        game
    }

    #[test]
    fn echoing_the_sequence_scores_and_extends() {
        let mut game = in_user_turn(vec![2]);
        game.press(2, &services());
        assert_eq!(game.score, 1);
        assert_eq!(game.sequence.len(), 2);
        assert!(matches!(game.phase, Phase::Playback { .. }));
    }

    #[test]
    fn a_wrong_press_ends_the_round() {
        let mut game = in_user_turn(vec![1, 3]);
        game.press(1, &services());
        game.press(0, &services());
        assert!(matches!(game.phase, Phase::Over));
        assert_eq!(game.score, 0);
    }

    #[test]
    fn presses_are_ignored_during_playback() {
        let mut game = SimonGame::new();
        game.sequence = vec![0];
        game.phase = Phase::Playback {
            step: 0,
            next_at: Instant::now() + Duration::from_secs(60),
        };
        game.press(0, &services());
        assert_eq!(game.user_pos, 0);
    }

    #[test]
    fn playback_steps_through_the_sequence() {
        let mut game = SimonGame::new();
        game.sequence = vec![0, 1];
        game.phase = Phase::Playback {
            step: 0,
            next_at: Instant::now(),
        };
        game.tick(&services());
        assert_eq!(game.lit.map(|(pad, _)| pad), Some(0));
        // Force the next step due.
        game.phase = Phase::Playback {
            step: 1,
            next_at: Instant::now(),
        };
        game.tick(&services());
        assert_eq!(game.lit.map(|(pad, _)| pad), Some(1));
        game.phase = Phase::Playback {
            step: 2,
            next_at: Instant::now(),
        };
        game.tick(&services());
        assert!(matches!(game.phase, Phase::UserTurn));
    }
}

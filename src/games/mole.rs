use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use rand::Rng;

use crate::app::Services;
use crate::audio::Tone;

const ROUND: Duration = Duration::from_secs(30);
const HOLES: usize = 9;

enum Phase {
    Ready,
    Playing {
        ends_at: Instant,
        next_pop: Instant,
        active: Option<usize>,
    },
    Over,
}

/// Whack-a-mole: one timed 30-second round, moles pop on a randomized
/// 400-1200 ms schedule.
pub struct MoleGame {
    phase: Phase,
    score: u32,
}

impl MoleGame {
    pub fn new() -> Self {
        Self {
            phase: Phase::Ready,
            score: 0,
        }
    }

    fn start(&mut self) {
        self.score = 0;
        let now = Instant::now();
        self.phase = Phase::Playing {
            ends_at: now + ROUND,
            next_pop: now + Self::pop_delay(),
            active: None,
        };
    }

    fn pop_delay() -> Duration {
        Duration::from_millis(rand::rng().random_range(400..1200))
    }

    fn tick(&mut self, services: &Services) {
        let Phase::Playing {
            ends_at,
            next_pop,
            active,
        } = &mut self.phase
        else {
            return;
        };
        let now = Instant::now();
        if now >= *ends_at {
            self.phase = Phase::Over;
            return;
        }
        if now >= *next_pop {
            *active = Some(rand::rng().random_range(0..HOLES));
            *next_pop = now + Self::pop_delay();
            // Pop: a rising chirp.
            services.tones.play(Tone::blip(500.0));
        }
    }

    fn whack(&mut self, index: usize, services: &Services) {
        if let Phase::Playing { active, .. } = &mut self.phase {
            if *active == Some(index) {
                *active = None;
                self.score += 1;
                services.tones.play(Tone::blip(800.0));
            }
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        self.tick(services);
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🔨 Mole Boink!");
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            if let Phase::Playing { ends_at, .. } = &self.phase {
                let left = ends_at.saturating_duration_since(Instant::now()).as_secs();
                ui.label(
                    RichText::new(format!("Time: {left}s"))
                        .strong()
                        .color(Color32::from_rgb(0xdc, 0x26, 0x26)),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(10.0);

        match &self.phase {
            Phase::Ready => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("🐹").size(72.0));
                    if ui.button(RichText::new("Start Game").size(20.0)).clicked() {
                        self.start();
                    }
                });
            }
            Phase::Over => {
                ui.vertical_centered(|ui| {
                    ui.heading("Time's Up!");
                    ui.label(format!("You boinked {} moles!", self.score));
                    if ui.button(RichText::new("Play Again").size(20.0)).clicked() {
                        self.start();
                    }
                });
            }
            Phase::Playing { active, .. } => {
                let active = *active;
                ui.ctx().request_repaint_after(Duration::from_millis(50));
                egui::Grid::new("mole-field").spacing([10.0, 10.0]).show(ui, |ui| {
                    for row in 0..3 {
                        for col in 0..3 {
                            let index = row * 3 + col;
                            let label = if active == Some(index) { "🐹" } else { "🕳" };
                            let button = egui::Button::new(RichText::new(label).size(40.0))
                                .fill(Color32::from_rgb(0xdc, 0xfc, 0xe7))
                                .min_size(egui::vec2(90.0, 90.0));
                            if ui.add(button).clicked() {
                                self.whack(index, services);
                            }
                        }
                        ui.end_row();
                    }
                });
            }
        }
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_services() -> Services {
        Services::silent_for_tests()
    }

    #[test]
    fn whacking_the_active_mole_scores() {
        let mut game = MoleGame::new();
        game.start();
        if let Phase::Playing { active, .. } = &mut game.phase {
            *active = Some(4);
        }
        game.whack(4, &silent_services());
        assert_eq!(game.score, 1);
        if let Phase::Playing { active, .. } = &game.phase {
            assert!(active.is_none(), "mole hides immediately after a hit");
        } else {
            panic!("still playing");
        }
    }

    #[test]
    fn whacking_an_empty_hole_does_nothing() {
        let mut game = MoleGame::new();
        game.start();
        if let Phase::Playing { active, .. } = &mut game.phase {
            *active = Some(2);
        }
        game.whack(7, &silent_services());
        assert_eq!(game.score, 0);
    }

    #[test]
    fn round_ends_after_deadline() {
        let mut game = MoleGame::new();
        game.start();
        if let Phase::Playing { ends_at, .. } = &mut game.phase {
            *ends_at = Instant::now();
        }
        game.tick(&silent_services());
        assert!(matches!(game.phase, Phase::Over));
    }
}

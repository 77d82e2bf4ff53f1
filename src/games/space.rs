use std::time::{Duration, Instant};

use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Ui, vec2};
use rand::Rng;

const SPAWN_EVERY: Duration = Duration::from_millis(800);
/// Fractions of the play-area height per second.
const FALL_SPEED: f32 = 0.9;

#[derive(Clone, Copy, PartialEq)]
enum Kind {
    Rock,
    Star,
}

struct Obstacle {
    x: f32,
    y: f32,
    kind: Kind,
}

enum Phase {
    Ready,
    Playing,
    Over,
}

/// Steer the rocket with the pointer: dodge rocks, collect stars.
pub struct SpaceGame {
    phase: Phase,
    player_x: f32,
    obstacles: Vec<Obstacle>,
    score: u32,
    last_spawn: Instant,
}

impl SpaceGame {
    pub fn new() -> Self {
        Self {
            phase: Phase::Ready,
            player_x: 0.5,
            obstacles: Vec::new(),
            score: 0,
            last_spawn: Instant::now(),
        }
    }

    fn start(&mut self) {
        self.phase = Phase::Playing;
        self.player_x = 0.5;
        self.obstacles.clear();
        self.score = 0;
        self.last_spawn = Instant::now();
    }

    fn advance(&mut self, dt: f32) {
        if !matches!(self.phase, Phase::Playing) {
            return;
        }
        let mut rng = rand::rng();
        if self.last_spawn.elapsed() >= SPAWN_EVERY {
            self.last_spawn = Instant::now();
            let kind = if rng.random_bool(0.2) {
                Kind::Star
            } else {
                Kind::Rock
            };
            self.obstacles.push(Obstacle {
                x: rng.random_range(0.1..0.9),
                y: -0.1,
                kind,
            });
        }

        let player_x = self.player_x;
        let mut crashed = false;
        let mut collected = 0u32;
        self.obstacles.retain_mut(|obs| {
            obs.y += FALL_SPEED * dt;
            // The rocket sits near the bottom; a loose box around it.
            let in_band = obs.y > 0.80 && obs.y < 0.95;
            if in_band && (obs.x - player_x).abs() < 0.1 {
                match obs.kind {
                    Kind::Rock => crashed = true,
                    Kind::Star => {
                        collected += 10;
                        return false;
                    }
                }
            }
            obs.y < 1.1
        });
        self.score += collected;
        if crashed {
            self.phase = Phase::Over;
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui) -> bool {
        let dt = ui.input(|i| i.stable_dt).min(0.1);
        self.advance(dt);
        if matches!(self.phase, Phase::Playing) {
            ui.ctx().request_repaint();
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🚀 Space Dash");
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(6.0);

        let size = vec2(ui.available_width(), ui.available_height().max(320.0));
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 16.0, Color32::from_rgb(0x1e, 0x29, 0x3b));

        if matches!(self.phase, Phase::Playing) {
            if let Some(pos) = response.hover_pos() {
                let frac = (pos.x - rect.min.x) / rect.width();
                self.player_x = frac.clamp(0.1, 0.9);
            }
        }

        for obs in &self.obstacles {
            let center = Pos2::new(
                rect.min.x + obs.x * rect.width(),
                rect.min.y + obs.y * rect.height(),
            );
            let glyph = match obs.kind {
                Kind::Rock => "🪨",
                Kind::Star => "⭐",
            };
            painter.text(
                center,
                Align2::CENTER_CENTER,
                glyph,
                FontId::proportional(30.0),
                Color32::WHITE,
            );
        }

        let rocket = Pos2::new(
            rect.min.x + self.player_x * rect.width(),
            rect.max.y - 0.12 * rect.height(),
        );
        painter.text(
            rocket,
            Align2::CENTER_CENTER,
            "🚀",
            FontId::proportional(36.0),
            Color32::WHITE,
        );

        match self.phase {
            Phase::Ready => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    "Move the mouse to dodge rocks & collect stars",
                    FontId::proportional(16.0),
                    Color32::from_gray(200),
                );
                let launch = egui::Rect::from_center_size(
                    rect.center() + vec2(0.0, 40.0),
                    vec2(180.0, 40.0),
                );
                if ui
                    .put(
                        launch,
                        egui::Button::new(RichText::new("Launch Rocket 🚀").size(16.0)),
                    )
                    .clicked()
                {
                    self.start();
                }
            }
            Phase::Over => {
                painter.text(
                    rect.center() - vec2(0.0, 30.0),
                    Align2::CENTER_CENTER,
                    "💥 CRASH!",
                    FontId::proportional(30.0),
                    Color32::WHITE,
                );
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    format!("Score: {}", self.score),
                    FontId::proportional(18.0),
                    Color32::from_gray(200),
                );
                let again = egui::Rect::from_center_size(
                    rect.center() + vec2(0.0, 44.0),
                    vec2(160.0, 40.0),
                );
                if ui
                    .put(again, egui::Button::new(RichText::new("Try Again").size(16.0)))
                    .clicked()
                {
                    self.start();
                }
            }
            Phase::Playing => {}
        }
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rock_collision_ends_the_game() {
        let mut game = SpaceGame::new();
        game.start();
        game.player_x = 0.5;
        game.obstacles.push(Obstacle {
            x: 0.52,
            y: 0.85,
            kind: Kind::Rock,
        });
        game.advance(0.016);
        assert!(matches!(game.phase, Phase::Over));
    }

    #[test]
    fn star_collision_scores_and_disappears() {
        let mut game = SpaceGame::new();
        game.start();
        game.player_x = 0.5;
        game.obstacles.push(Obstacle {
            x: 0.5,
            y: 0.85,
            kind: Kind::Star,
        });
        game.advance(0.016);
        assert!(matches!(game.phase, Phase::Playing));
        assert_eq!(game.score, 10);
        assert!(game.obstacles.is_empty());
    }

    #[test]
    fn distant_obstacles_are_harmless() {
        let mut game = SpaceGame::new();
        game.start();
        game.player_x = 0.2;
        game.obstacles.push(Obstacle {
            x: 0.8,
            y: 0.85,
            kind: Kind::Rock,
        });
        game.advance(0.016);
        assert!(matches!(game.phase, Phase::Playing));
    }

    #[test]
    fn obstacles_despawn_below_the_screen() {
        let mut game = SpaceGame::new();
        game.start();
        game.obstacles.push(Obstacle {
            x: 0.5,
            y: 1.05,
            kind: Kind::Rock,
        });
        game.player_x = 0.0;
        game.advance(0.2);
        assert!(game.obstacles.is_empty());
    }
}

use std::time::{Duration, Instant};

use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Ui, vec2};
use rand::Rng;

const SPAWN_EVERY: Duration = Duration::from_millis(1500);
const BALLOON_W: f32 = 56.0;
const BALLOON_H: f32 = 68.0;

const BALLOON_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xf8, 0x71, 0x71),
    Color32::from_rgb(0x60, 0xa5, 0xfa),
    Color32::from_rgb(0x4a, 0xde, 0x80),
    Color32::from_rgb(0xfa, 0xcc, 0x15),
    Color32::from_rgb(0xc0, 0x84, 0xfc),
    Color32::from_rgb(0xf4, 0x72, 0xb6),
];

struct Balloon {
    id: u64,
    /// Horizontal position as a fraction of the play area width.
    x: f32,
    /// Vertical position as a fraction; 1.0 = bottom, rises toward 0.
    y: f32,
    value: i32,
    /// Fractions of the area height per second.
    speed: f32,
    color: Color32,
}

/// Pop the balloon carrying the right answer: +10 and a fresh question;
/// wrong balloon costs 5 points (never below zero).
pub struct BalloonGame {
    question: String,
    answer: i32,
    balloons: Vec<Balloon>,
    score: i32,
    last_spawn: Instant,
    next_id: u64,
}

impl BalloonGame {
    pub fn new() -> Self {
        let mut game = Self {
            question: String::new(),
            answer: 0,
            balloons: Vec::new(),
            score: 0,
            last_spawn: Instant::now(),
            next_id: 0,
        };
        game.new_question();
        game
    }

    fn new_question(&mut self) {
        let mut rng = rand::rng();
        let a = rng.random_range(1..=10);
        let b = rng.random_range(1..=10);
        if rng.random_bool(0.5) {
            self.question = format!("{a} + {b} = ?");
            self.answer = a + b;
        } else {
            let (hi, lo) = (a.max(b), a.min(b));
            self.question = format!("{hi} - {lo} = ?");
            self.answer = hi - lo;
        }
        self.balloons.clear();
    }

    fn spawn(&mut self) {
        let mut rng = rand::rng();
        // 40% of balloons carry the correct answer.
        let value = if rng.random_bool(0.4) {
            self.answer
        } else {
            rng.random_range(0..20)
        };
        self.balloons.push(Balloon {
            id: self.next_id,
            x: rng.random_range(0.1..0.9),
            y: 1.0,
            value,
            speed: rng.random_range(0.06..0.18),
            color: BALLOON_COLORS[rng.random_range(0..BALLOON_COLORS.len())],
        });
        self.next_id += 1;
    }

    fn advance(&mut self, dt: f32) {
        if self.last_spawn.elapsed() >= SPAWN_EVERY {
            self.spawn();
            self.last_spawn = Instant::now();
        }
        for balloon in &mut self.balloons {
            balloon.y -= balloon.speed * dt;
        }
        self.balloons.retain(|b| b.y > -0.2);
    }

    fn pop(&mut self, id: u64) {
        let Some(balloon) = self.balloons.iter().find(|b| b.id == id) else {
            return;
        };
        if balloon.value == self.answer {
            self.score += 10;
            self.new_question();
        } else {
            self.score = (self.score - 5).max(0);
            self.balloons.retain(|b| b.id != id);
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui) -> bool {
        let dt = ui.input(|i| i.stable_dt).min(0.1);
        self.advance(dt);
        ui.ctx().request_repaint();
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Score: {}", self.score)).size(20.0).strong());
            ui.label(
                RichText::new(&self.question)
                    .size(26.0)
                    .strong()
                    .background_color(Color32::from_rgb(0xfa, 0xcc, 0x15)),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(6.0);

        let size = vec2(ui.available_width(), ui.available_height().max(300.0));
        let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 16.0, Color32::from_rgb(0xe0, 0xf2, 0xfe));

        let mut popped = None;
        for balloon in &self.balloons {
            let center = Pos2::new(
                rect.min.x + balloon.x * rect.width(),
                rect.min.y + balloon.y * rect.height(),
            );
            painter.circle_filled(center, BALLOON_W / 2.0, balloon.color);
            // String below the balloon.
            painter.line_segment(
                [
                    center + vec2(0.0, BALLOON_W / 2.0),
                    center + vec2(0.0, BALLOON_H),
                ],
                egui::Stroke::new(1.5, Color32::from_gray(150)),
            );
            painter.text(
                center,
                Align2::CENTER_CENTER,
                balloon.value.to_string(),
                FontId::proportional(22.0),
                Color32::WHITE,
            );
            let hit = egui::Rect::from_center_size(center, vec2(BALLOON_W, BALLOON_H));
            let response = ui.interact(hit, ui.id().with(("balloon", balloon.id)), Sense::click());
            if response.clicked() {
                popped = Some(balloon.id);
            }
        }
        if let Some(id) = popped {
            self.pop(id);
        }

        painter.text(
            rect.center_bottom() - vec2(0.0, 14.0),
            Align2::CENTER_CENTER,
            "Pop the Correct Answer!",
            FontId::proportional(14.0),
            Color32::from_gray(140),
        );
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged() -> BalloonGame {
        let mut game = BalloonGame::new();
        game.question = "2 + 2 = ?".into();
        game.answer = 4;
        game.balloons.clear();
        game.balloons.push(Balloon {
            id: 1,
            x: 0.5,
            y: 0.5,
            value: 4,
            speed: 0.1,
            color: BALLOON_COLORS[0],
        });
        game.balloons.push(Balloon {
            id: 2,
            x: 0.3,
            y: 0.5,
            value: 9,
            speed: 0.1,
            color: BALLOON_COLORS[1],
        });
        game
    }

    #[test]
    fn popping_the_answer_scores_and_clears_the_sky() {
        let mut game = rigged();
        game.pop(1);
        assert_eq!(game.score, 10);
        assert!(game.balloons.is_empty(), "field clears for the next round");
    }

    #[test]
    fn popping_a_wrong_balloon_costs_five_with_a_floor() {
        let mut game = rigged();
        game.pop(2);
        assert_eq!(game.score, 0, "score never goes negative");
        assert_eq!(game.balloons.len(), 1, "only the popped balloon vanishes");
    }

    #[test]
    fn balloons_float_up_and_despawn() {
        let mut game = rigged();
        game.last_spawn = Instant::now();
        for _ in 0..200 {
            game.advance(0.1);
        }
        assert!(game.balloons.iter().all(|b| b.y > -0.2));
    }

    #[test]
    fn subtraction_questions_never_go_negative() {
        for _ in 0..50 {
            let game = BalloonGame::new();
            assert!(game.answer >= 0);
        }
    }
}

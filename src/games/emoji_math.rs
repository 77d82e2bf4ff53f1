use std::time::{Duration, Instant};

use egui::{RichText, Ui};
use rand::Rng;
use rand::seq::SliceRandom;

const EMOJIS: [&str; 8] = ["🍎", "🍌", "🍇", "🍕", "🍪", "🐱", "🐶", "⚽"];

/// Picture algebra: `emoji × count = total`, guess the emoji's value.
pub struct EmojiMathGame {
    level: u32,
    emoji: &'static str,
    count: u32,
    total: u32,
    value: u32,
    options: Vec<u32>,
    message: String,
    score: u32,
    advance_at: Option<Instant>,
}

impl EmojiMathGame {
    pub fn new() -> Self {
        let mut game = Self {
            level: 1,
            emoji: EMOJIS[0],
            count: 2,
            total: 0,
            value: 0,
            options: Vec::new(),
            message: String::new(),
            score: 0,
            advance_at: None,
        };
        game.generate();
        game
    }

    fn generate(&mut self) {
        let mut rng = rand::rng();
        self.emoji = EMOJIS[rng.random_range(0..EMOJIS.len())];
        self.value = rng.random_range(1..=5) + self.level;
        self.count = rng.random_range(2..=3);
        self.total = self.value * self.count;

        let wrong_high = self.value + rng.random_range(1..=3);
        let wrong_low = self.value.saturating_sub(rng.random_range(1..=3)).max(1);
        let mut options = vec![self.value, wrong_high, wrong_low];
        options.dedup();
        // Top up if the wrong answers collided with the right one.
        while options.len() < 3 {
            let extra = self.value + rng.random_range(4..=6);
            if !options.contains(&extra) {
                options.push(extra);
            }
        }
        options.shuffle(&mut rng);
        self.options = options;
        self.message = format!("What is the value of one {}?", self.emoji);
        self.advance_at = None;
    }

    fn guess(&mut self, value: u32) {
        if self.advance_at.is_some() {
            return;
        }
        if value == self.value {
            self.score += 10;
            self.message = "Correct! 🎉".to_owned();
            self.advance_at = Some(Instant::now() + Duration::from_millis(1000));
        } else {
            self.message = "Oops! Try again.".to_owned();
        }
    }

    fn tick(&mut self) {
        if self.advance_at.is_some_and(|at| Instant::now() >= at) {
            self.level += 1;
            self.generate();
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui) -> bool {
        self.tick();
        if self.advance_at.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(80));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🍎 Emoji Logic");
            ui.label(RichText::new(format!("Level: {}", self.level)).strong());
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            let sum = (0..self.count)
                .map(|_| self.emoji)
                .collect::<Vec<_>>()
                .join(" + ");
            ui.label(RichText::new(format!("{sum} = {}", self.total)).size(34.0));
            ui.add_space(8.0);
            ui.label(RichText::new(format!("{} = ❓", self.emoji)).size(26.0));
            ui.add_space(10.0);
            ui.label(RichText::new(&self.message).size(18.0).strong());
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                // Center the three option buttons.
                let total_width = 3.0 * 80.0 + 2.0 * ui.spacing().item_spacing.x;
                let pad = (ui.available_width() - total_width).max(0.0) / 2.0;
                ui.add_space(pad);
                for i in 0..self.options.len() {
                    let value = self.options[i];
                    let button = egui::Button::new(RichText::new(value.to_string()).size(24.0))
                        .min_size(egui::vec2(80.0, 80.0));
                    if ui.add(button).clicked() {
                        self.guess(value);
                    }
                }
            });
        });
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_always_include_the_answer() {
        for _ in 0..100 {
            let game = EmojiMathGame::new();
            assert!(game.options.contains(&game.value));
            assert_eq!(game.options.len(), 3);
            assert_eq!(game.total, game.value * game.count);
        }
    }

    #[test]
    fn correct_guess_scores_and_levels_up() {
        let mut game = EmojiMathGame::new();
        let value = game.value;
        game.guess(value);
        assert_eq!(game.score, 10);
        game.advance_at = Some(Instant::now());
        game.tick();
        assert_eq!(game.level, 2);
    }

    #[test]
    fn wrong_guess_keeps_the_level() {
        let mut game = EmojiMathGame::new();
        let wrong = game
            .options
            .iter()
            .copied()
            .find(|&v| v != game.value)
            .unwrap();
        game.guess(wrong);
        assert_eq!(game.score, 0);
        assert_eq!(game.level, 1);
        assert!(game.advance_at.is_none());
    }
}

use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::app::Services;
use crate::speech::SpeechOpts;

struct LearnItem {
    letter: char,
    word: &'static str,
    emoji: &'static str,
}

static ITEMS: [LearnItem; 8] = [
    LearnItem { letter: 'A', word: "Apple", emoji: "🍎" },
    LearnItem { letter: 'B', word: "Ball", emoji: "⚽" },
    LearnItem { letter: 'C', word: "Cat", emoji: "🐱" },
    LearnItem { letter: 'D', word: "Dog", emoji: "🐶" },
    LearnItem { letter: 'E', word: "Elephant", emoji: "🐘" },
    LearnItem { letter: 'F', word: "Fish", emoji: "🐠" },
    LearnItem { letter: 'G', word: "Grapes", emoji: "🍇" },
    LearnItem { letter: 'H', word: "House", emoji: "🏠" },
];

#[derive(PartialEq)]
enum Mode {
    Learn,
    Quiz,
}

/// Nursery ABCs: flash cards read aloud, plus a find-the-picture quiz.
pub struct AbcGame {
    mode: Mode,
    index: usize,
    score: u32,
    target: usize,
    options: Vec<usize>,
    message: String,
    advance_at: Option<Instant>,
}

impl AbcGame {
    pub fn new() -> Self {
        Self {
            mode: Mode::Learn,
            index: 0,
            score: 0,
            target: 0,
            options: Vec::new(),
            message: String::new(),
            advance_at: None,
        }
    }

    fn speak_card(&self, services: &Services) {
        let item = &ITEMS[self.index];
        services.narrator.speak_with(
            &format!("{} is for {}", item.letter, item.word),
            SpeechOpts {
                rate: 0.8,
                pitch: 1.2,
            },
        );
    }

    fn setup_quiz(&mut self, services: &Services) {
        let mut rng = rand::rng();
        self.target = rng.random_range(0..ITEMS.len());
        let mut options: Vec<usize> = (0..ITEMS.len()).filter(|&i| i != self.target).collect();
        options.shuffle(&mut rng);
        options.truncate(2);
        options.push(self.target);
        options.shuffle(&mut rng);
        self.options = options;
        self.message = format!("Where is the {}?", ITEMS[self.target].word);
        self.advance_at = None;
        services
            .narrator
            .speak_with(&format!("Can you find the {}?", ITEMS[self.target].word), SpeechOpts {
                rate: 0.8,
                pitch: 1.2,
            });
    }

    fn answer(&mut self, choice: usize, services: &Services) {
        if self.advance_at.is_some() {
            return;
        }
        if choice == self.target {
            self.score += 1;
            self.message = "Correct! Good Job!".to_owned();
            services.narrator.speak("Yay! Good Job!");
            self.advance_at = Some(Instant::now() + Duration::from_millis(1500));
        } else {
            self.message = "Oops, try again!".to_owned();
            services.narrator.speak("Oops, try again!");
        }
    }

    fn tick(&mut self, services: &Services) {
        if self.advance_at.is_some_and(|at| Instant::now() >= at) {
            self.setup_quiz(services);
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        self.tick(services);
        if self.advance_at.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(100));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🗣 Nursery ABCs");
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    services.narrator.cancel();
                    exit = true;
                }
                let (label, next) = match self.mode {
                    Mode::Learn => ("Quiz Me!", Mode::Quiz),
                    Mode::Quiz => ("Back to Cards", Mode::Learn),
                };
                if ui.button(label).clicked() {
                    self.mode = next;
                    if self.mode == Mode::Quiz {
                        self.setup_quiz(services);
                    }
                }
            });
        });
        ui.add_space(14.0);

        match self.mode {
            Mode::Learn => {
                let item = &ITEMS[self.index];
                ui.vertical_centered(|ui| {
                    egui::Frame::group(ui.style())
                        .fill(Color32::from_rgb(0xfe, 0xf9, 0xc3))
                        .inner_margin(30.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(item.letter.to_string()).size(80.0).strong());
                            ui.label(RichText::new(item.emoji).size(64.0));
                            ui.label(RichText::new(item.word).size(28.0));
                        });
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        let pad = (ui.available_width() - 260.0).max(0.0) / 2.0;
                        ui.add_space(pad);
                        if ui.button(RichText::new("⬅ Prev").size(18.0)).clicked() {
                            self.index = (self.index + ITEMS.len() - 1) % ITEMS.len();
                            self.speak_card(services);
                        }
                        if ui.button(RichText::new("🔊 Hear").size(18.0)).clicked() {
                            self.speak_card(services);
                        }
                        if ui.button(RichText::new("Next ➡").size(18.0)).clicked() {
                            self.index = (self.index + 1) % ITEMS.len();
                            self.speak_card(services);
                        }
                    });
                });
            }
            Mode::Quiz => {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(&self.message).size(22.0).strong());
                    ui.add_space(14.0);
                    ui.horizontal(|ui| {
                        let pad = (ui.available_width() - 360.0).max(0.0) / 2.0;
                        ui.add_space(pad);
                        for option in self.options.clone() {
                            let button = egui::Button::new(
                                RichText::new(ITEMS[option].emoji).size(48.0),
                            )
                            .min_size(egui::vec2(110.0, 110.0));
                            if ui.add(button).clicked() {
                                self.answer(option, services);
                            }
                        }
                    });
                });
            }
        }
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Services {
        Services::silent_for_tests()
    }

    #[test]
    fn quiz_options_always_include_the_target() {
        let svc = services();
        for _ in 0..50 {
            let mut game = AbcGame::new();
            game.setup_quiz(&svc);
            assert_eq!(game.options.len(), 3);
            assert!(game.options.contains(&game.target));
        }
    }

    #[test]
    fn right_answer_scores_and_schedules_next_round() {
        let svc = services();
        let mut game = AbcGame::new();
        game.setup_quiz(&svc);
        let target = game.target;
        game.answer(target, &svc);
        assert_eq!(game.score, 1);
        assert!(game.advance_at.is_some());
    }

    #[test]
    fn wrong_answer_keeps_the_question() {
        let svc = services();
        let mut game = AbcGame::new();
        game.setup_quiz(&svc);
        let target = game.target;
        let wrong = game
            .options
            .iter()
            .copied()
            .find(|&o| o != target)
            .unwrap();
        game.answer(wrong, &svc);
        assert_eq!(game.score, 0);
        assert_eq!(game.target, target);
        assert!(game.advance_at.is_none());
    }
}

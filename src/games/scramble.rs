use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use rand::seq::SliceRandom;

const WORDS: [(&str, &str); 10] = [
    ("APPLE", "A red or green fruit."),
    ("SCHOOL", "Where you go to learn."),
    ("TIGER", "A big striped cat."),
    ("PLANET", "Earth is one of these."),
    ("HAPPY", "The opposite of sad."),
    ("ROBOT", "A machine that acts like a human."),
    ("SUMMER", "The hottest season."),
    ("FRIEND", "Someone you like to play with."),
    ("WATER", "You drink this when thirsty."),
    ("HOUSE", "A place where people live."),
];

#[derive(Clone, Copy, PartialEq, Debug)]
enum Feedback {
    None,
    Correct,
    Wrong,
}

/// Unscramble the word, with a hint. Correct answers advance after a short
/// celebration.
pub struct ScrambleGame {
    index: usize,
    scrambled: String,
    input: String,
    feedback: Feedback,
    score: u32,
    /// When set: advance to the next word (correct) or clear the feedback
    /// (wrong).
    reset_at: Option<Instant>,
}

/// Fisher-Yates shuffle that never returns the word unchanged (for words
/// with at least two distinct letters).
fn scramble(word: &str) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    let distinct = {
        let mut sorted = letters.clone();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.len() > 1
    };
    let mut rng = rand::rng();
    for _ in 0..16 {
        letters.shuffle(&mut rng);
        let shuffled: String = letters.iter().collect();
        if !distinct || shuffled != word {
            return shuffled;
        }
    }
    letters.iter().collect()
}

impl ScrambleGame {
    pub fn new() -> Self {
        let mut game = Self {
            index: 0,
            scrambled: String::new(),
            input: String::new(),
            feedback: Feedback::None,
            score: 0,
            reset_at: None,
        };
        game.load_word(0);
        game
    }

    fn load_word(&mut self, index: usize) {
        self.index = index % WORDS.len();
        self.scrambled = scramble(WORDS[self.index].0);
        self.input.clear();
        self.feedback = Feedback::None;
        self.reset_at = None;
    }

    fn check(&mut self) {
        if self.feedback == Feedback::Correct {
            return;
        }
        if self.input.trim().eq_ignore_ascii_case(WORDS[self.index].0) {
            self.feedback = Feedback::Correct;
            self.score += 10;
            self.reset_at = Some(Instant::now() + Duration::from_millis(1500));
        } else {
            self.feedback = Feedback::Wrong;
            self.reset_at = Some(Instant::now() + Duration::from_millis(1000));
        }
    }

    fn tick(&mut self) {
        if self.reset_at.is_some_and(|at| Instant::now() >= at) {
            match self.feedback {
                Feedback::Correct => self.load_word(self.index + 1),
                _ => {
                    self.feedback = Feedback::None;
                    self.reset_at = None;
                }
            }
        }
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui) -> bool {
        self.tick();
        if self.reset_at.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(80));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🔤 Word Scramble");
            ui.label(RichText::new(format!("Score: {}", self.score)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(16.0);

        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(spaced(&self.scrambled))
                    .size(42.0)
                    .strong()
                    .color(Color32::from_rgb(0x7c, 0x3a, 0xed)),
            );
            ui.label(RichText::new(format!("Hint: {}", WORDS[self.index].1)).weak());
            ui.add_space(14.0);

            let edit = egui::TextEdit::singleline(&mut self.input)
                .hint_text("TYPE HERE")
                .font(egui::TextStyle::Heading)
                .horizontal_align(egui::Align::Center);
            let response = ui.add_sized(egui::vec2(320.0, 48.0), edit);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.check();
            }

            match self.feedback {
                Feedback::Correct => {
                    ui.label(
                        RichText::new("✔ Great spelling!")
                            .size(20.0)
                            .color(Color32::from_rgb(0x16, 0xa3, 0x4a)),
                    );
                }
                Feedback::Wrong => {
                    ui.label(
                        RichText::new("✘ Not quite, try again!")
                            .size(20.0)
                            .color(Color32::from_rgb(0xdc, 0x26, 0x26)),
                    );
                }
                Feedback::None => {
                    ui.add_space(24.0);
                }
            }
            ui.add_space(8.0);
            let check = egui::Button::new(RichText::new("Check Spelling").size(18.0))
                .min_size(egui::vec2(320.0, 44.0));
            if ui
                .add_enabled(self.feedback != Feedback::Correct, check)
                .clicked()
            {
                self.check();
            }
        });
        exit
    }
}

fn spaced(word: &str) -> String {
    word.chars()
        .flat_map(|c| [c, ' '])
        .collect::<String>()
        .trim_end()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scramble_keeps_the_same_letters() {
        for (word, _) in WORDS {
            let shuffled = scramble(word);
            let mut a: Vec<char> = word.chars().collect();
            let mut b: Vec<char> = shuffled.chars().collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn scramble_changes_the_order() {
        // All list words have at least two distinct letters.
        for (word, _) in WORDS {
            assert_ne!(scramble(word), word);
        }
    }

    #[test]
    fn correct_answer_scores_and_schedules_advance() {
        let mut game = ScrambleGame::new();
        game.input = WORDS[0].0.to_lowercase();
        game.check();
        assert_eq!(game.feedback, Feedback::Correct);
        assert_eq!(game.score, 10);
        game.reset_at = Some(Instant::now());
        game.tick();
        assert_eq!(game.index, 1);
        assert!(game.input.is_empty());
    }

    #[test]
    fn wrong_answer_clears_after_the_flash() {
        let mut game = ScrambleGame::new();
        game.input = "ZZZZZ".into();
        game.check();
        assert_eq!(game.feedback, Feedback::Wrong);
        game.reset_at = Some(Instant::now());
        game.tick();
        assert_eq!(game.feedback, Feedback::None);
        assert_eq!(game.index, 0, "wrong answers do not advance");
    }
}

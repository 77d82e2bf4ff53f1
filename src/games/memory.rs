use std::time::{Duration, Instant};

use egui::{Color32, RichText, Ui};
use rand::seq::SliceRandom;

const ICONS: [&str; 8] = ["🍎", "🐶", "🚀", "⚽", "🌟", "🎸", "🍦", "🐘"];
const MATCH_DELAY: Duration = Duration::from_millis(500);
const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone)]
struct Card {
    icon: &'static str,
    face_up: bool,
    matched: bool,
}

/// A resolution waiting for its reveal delay: the two flipped cards and
/// whether they matched.
struct Pending {
    first: usize,
    second: usize,
    matched: bool,
    resolve_at: Instant,
}

/// Classic pairs game: 8 emoji pairs on a 4x4 board.
pub struct MemoryGame {
    cards: Vec<Card>,
    first_pick: Option<usize>,
    pending: Option<Pending>,
    moves: u32,
    matches: u32,
}

impl MemoryGame {
    pub fn new() -> Self {
        let mut game = Self {
            cards: Vec::new(),
            first_pick: None,
            pending: None,
            moves: 0,
            matches: 0,
        };
        game.reset();
        game
    }

    fn reset(&mut self) {
        let mut icons: Vec<&'static str> = ICONS.iter().chain(ICONS.iter()).copied().collect();
        icons.shuffle(&mut rand::rng());
        self.cards = icons
            .into_iter()
            .map(|icon| Card {
                icon,
                face_up: false,
                matched: false,
            })
            .collect();
        self.first_pick = None;
        self.pending = None;
        self.moves = 0;
        self.matches = 0;
    }

    fn pick(&mut self, index: usize) {
        if self.pending.is_some() || self.cards[index].face_up || self.cards[index].matched {
            return;
        }
        self.cards[index].face_up = true;
        match self.first_pick.take() {
            None => self.first_pick = Some(index),
            Some(first) => {
                self.moves += 1;
                let matched = self.cards[first].icon == self.cards[index].icon;
                let delay = if matched { MATCH_DELAY } else { MISMATCH_DELAY };
                self.pending = Some(Pending {
                    first,
                    second: index,
                    matched,
                    resolve_at: Instant::now() + delay,
                });
            }
        }
    }

    fn tick(&mut self) {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| Instant::now() >= p.resolve_at);
        if !due {
            return;
        }
        let Some(Pending {
            first,
            second,
            matched,
            ..
        }) = self.pending.take()
        else {
            return;
        };
        if matched {
            self.cards[first].matched = true;
            self.cards[second].matched = true;
            self.matches += 1;
        } else {
            self.cards[first].face_up = false;
            self.cards[second].face_up = false;
        }
    }

    fn won(&self) -> bool {
        self.matches as usize == ICONS.len()
    }

    /// Returns true on exit.
    pub fn ui(&mut self, ui: &mut Ui) -> bool {
        self.tick();
        if self.pending.is_some() {
            ui.ctx().request_repaint_after(Duration::from_millis(60));
        }
        let mut exit = false;

        ui.horizontal(|ui| {
            ui.heading("🧠 Memory Match");
            ui.label(RichText::new(format!("Moves: {}", self.moves)).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    exit = true;
                }
            });
        });
        ui.add_space(10.0);

        if self.won() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("🏆").size(64.0));
                ui.heading("You Won!");
                ui.label(format!("Amazing memory! You did it in {} moves.", self.moves));
                if ui.button(RichText::new("Play Again").size(18.0)).clicked() {
                    self.reset();
                }
            });
            return exit;
        }

        egui::Grid::new("memory-board").spacing([8.0, 8.0]).show(ui, |ui| {
            for row in 0..4 {
                for col in 0..4 {
                    let index = row * 4 + col;
                    let card = &self.cards[index];
                    let (label, fill) = if card.face_up || card.matched {
                        (card.icon, Color32::WHITE)
                    } else {
                        ("✶", Color32::from_rgb(0x8b, 0x5c, 0xf6))
                    };
                    let button = egui::Button::new(RichText::new(label).size(32.0))
                        .fill(fill)
                        .min_size(egui::vec2(72.0, 72.0));
                    if ui.add(button).clicked() {
                        self.pick(index);
                    }
                }
                ui.end_row();
            }
        });
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rigged() -> MemoryGame {
        // Deterministic board: pairs adjacent.
        let mut game = MemoryGame::new();
        game.cards = ICONS
            .into_iter()
            .flat_map(|icon| {
                [
                    Card {
                        icon,
                        face_up: false,
                        matched: false,
                    },
                    Card {
                        icon,
                        face_up: false,
                        matched: false,
                    },
                ]
            })
            .collect();
        game
    }

    #[test]
    fn matching_pair_stays_up() {
        let mut game = rigged();
        game.pick(0);
        game.pick(1);
        assert_eq!(game.moves, 1);
        let pending = game.pending.as_ref().unwrap();
        assert!(pending.matched);
        // Force the delay to elapse.
        game.pending.as_mut().unwrap().resolve_at = Instant::now();
        game.tick();
        assert!(game.cards[0].matched && game.cards[1].matched);
        assert_eq!(game.matches, 1);
    }

    #[test]
    fn mismatch_flips_back_down() {
        let mut game = rigged();
        game.pick(0);
        game.pick(2);
        game.pending.as_mut().unwrap().resolve_at = Instant::now();
        game.tick();
        assert!(!game.cards[0].face_up && !game.cards[2].face_up);
        assert_eq!(game.matches, 0);
    }

    #[test]
    fn third_click_is_ignored_while_pending() {
        let mut game = rigged();
        game.pick(0);
        game.pick(2);
        game.pick(4);
        assert!(!game.cards[4].face_up);
    }

    #[test]
    fn board_always_has_eight_pairs() {
        let game = MemoryGame::new();
        assert_eq!(game.cards.len(), 16);
        for icon in ICONS {
            let count = game.cards.iter().filter(|c| c.icon == icon).count();
            assert_eq!(count, 2);
        }
    }
}

//! The arcade: independent leaf mini-games.
//!
//! Each game owns its whole state, including its timers (frame-checked
//! `Instant` deadlines). Leaving a game drops the struct, which stops every
//! loop it owned; nothing is shared between games except the app-level
//! services passed in by reference.

use egui::{RichText, Ui};

use crate::app::Services;
use crate::canvas::ToolState;
use crate::panels::PaintStudio;

mod abc;
mod balloon;
mod chat;
mod emoji_math;
mod memory;
mod mole;
mod music;
mod scramble;
mod simon;
mod space;

pub use abc::AbcGame;
pub use balloon::BalloonGame;
pub use chat::ChatBuddy;
pub use emoji_math::EmojiMathGame;
pub use memory::MemoryGame;
pub use mole::MoleGame;
pub use music::MusicStudio;
pub use scramble::ScrambleGame;
pub use simon::SimonGame;
pub use space::SpaceGame;

/// All games behind one enum so the hub can own the active one by value,
/// without boxing trait objects.
enum ArcadeGame {
    Chat(ChatBuddy),
    Abc(AbcGame),
    Mole(MoleGame),
    Space(SpaceGame),
    Paint(Box<PaintStudio>),
    Music(MusicStudio),
    Memory(MemoryGame),
    Balloon(BalloonGame),
    Scramble(ScrambleGame),
    Simon(SimonGame),
    EmojiMath(EmojiMathGame),
}

impl ArcadeGame {
    /// Returns true when the game wants to exit back to the hub.
    fn ui(&mut self, ui: &mut Ui, services: &Services, tools: &mut ToolState, grade: u8) -> bool {
        match self {
            Self::Chat(game) => game.ui(ui, services, grade),
            Self::Abc(game) => game.ui(ui, services),
            Self::Mole(game) => game.ui(ui, services),
            Self::Space(game) => game.ui(ui),
            Self::Paint(studio) => studio.ui(ui, tools),
            Self::Music(game) => game.ui(ui, services),
            Self::Memory(game) => game.ui(ui),
            Self::Balloon(game) => game.ui(ui),
            Self::Scramble(game) => game.ui(ui),
            Self::Simon(game) => game.ui(ui, services),
            Self::EmojiMath(game) => game.ui(ui),
        }
    }
}

struct GameCard {
    name: &'static str,
    icon: &'static str,
    description: &'static str,
    build: fn(&Services) -> ArcadeGame,
}

const GAMES: [GameCard; 11] = [
    GameCard {
        name: "Talk to Robo",
        icon: "🤖",
        description: "Chat with your AI friend!",
        build: |_| ArcadeGame::Chat(ChatBuddy::new()),
    },
    GameCard {
        name: "Nursery ABCs",
        icon: "🗣",
        description: "Learn to speak English.",
        build: |_| ArcadeGame::Abc(AbcGame::new()),
    },
    GameCard {
        name: "Mole Boink",
        icon: "🐹",
        description: "Whack the moles fast!",
        build: |_| ArcadeGame::Mole(MoleGame::new()),
    },
    GameCard {
        name: "Space Dash",
        icon: "🚀",
        description: "Dodge asteroids in space.",
        build: |_| ArcadeGame::Space(SpaceGame::new()),
    },
    GameCard {
        name: "Paint Studio",
        icon: "🎨",
        description: "Draw with 3D Stickers!",
        build: |_| ArcadeGame::Paint(Box::new(PaintStudio::new())),
    },
    GameCard {
        name: "Music Studio",
        icon: "🎹",
        description: "Play a colorful keyboard.",
        build: |_| ArcadeGame::Music(MusicStudio::new()),
    },
    GameCard {
        name: "Memory Match",
        icon: "🧠",
        description: "Find the matching pairs.",
        build: |_| ArcadeGame::Memory(MemoryGame::new()),
    },
    GameCard {
        name: "Balloon Math",
        icon: "🎈",
        description: "Pop the correct answers.",
        build: |_| ArcadeGame::Balloon(BalloonGame::new()),
    },
    GameCard {
        name: "Word Scramble",
        icon: "🔤",
        description: "Fix the mixed-up words.",
        build: |_| ArcadeGame::Scramble(ScrambleGame::new()),
    },
    GameCard {
        name: "Simon Says",
        icon: "🔔",
        description: "Follow the color pattern.",
        build: |_| ArcadeGame::Simon(SimonGame::new()),
    },
    GameCard {
        name: "Emoji Logic",
        icon: "🍎",
        description: "Solve the picture puzzle.",
        build: |_| ArcadeGame::EmojiMath(EmojiMathGame::new()),
    },
];

/// The arcade menu plus the currently running game.
#[derive(Default)]
pub struct ArcadeHub {
    active: Option<ArcadeGame>,
}

impl ArcadeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the child wants to leave the arcade entirely.
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        services: &Services,
        tools: &mut ToolState,
        grade: u8,
    ) -> bool {
        if let Some(game) = &mut self.active {
            if game.ui(ui, services, tools, grade) {
                // Dropping the game stops its timers and loops.
                self.active = None;
            }
            return false;
        }

        let mut exit = false;
        ui.horizontal(|ui| {
            if ui.button("⬅ Back").clicked() {
                exit = true;
            }
            ui.heading("Arcade Zone 🕹");
        });
        ui.add_space(12.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for card in &GAMES {
                    let label = format!("{}\n{}\n{}", card.icon, card.name, card.description);
                    let button = egui::Button::new(RichText::new(label).size(16.0))
                        .min_size(egui::vec2(220.0, 120.0));
                    if ui.add(button).clicked() {
                        self.active = Some((card.build)(services));
                    }
                }
            });
        });
        exit
    }
}

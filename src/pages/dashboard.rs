use egui::{Color32, RichText, Ui};
use rand::Rng;

use crate::app::Services;
use crate::audio::Tone;
use crate::content::{Subject, User};

const JOKES: [&str; 5] = [
    "Why did the math book look sad? Because it had too many problems!",
    "What do you call a bear with no teeth? A gummy bear!",
    "Why do bees have sticky hair? Because they use honeycombs!",
    "What falls but never breaks? Nightfall!",
    "Why did the cookie go to the hospital? Because he felt crummy!",
];

const RIDDLES: [(&str, &str); 4] = [
    (
        "I speak without a mouth and hear without ears. I have no body, but I come alive with wind. What am I?",
        "An Echo",
    ),
    (
        "I have keys but no locks. I have a space but no room. You can enter, but can't go outside. What am I?",
        "A Keyboard",
    ),
    ("What has to be broken before you can use it?", "An Egg"),
    (
        "I'm tall when I'm young, and I'm short when I'm old. What am I?",
        "A Candle",
    ),
];

pub enum DashboardAction {
    OpenSubject(Subject),
    OpenPoems,
    OpenArcade,
    Logout,
}

/// The home screen: grade picker, subject bookshelf, arcade door, and the
/// joke/riddle/breathing extras.
pub struct DashboardView {
    joke: usize,
    riddle: usize,
    riddle_revealed: bool,
    breathing: bool,
    /// Chime once per breath phase; remembers which half we chimed in.
    last_breath_phase: bool,
    pub last_result: Option<String>,
}

impl Default for DashboardView {
    fn default() -> Self {
        let mut rng = rand::rng();
        Self {
            joke: rng.random_range(0..JOKES.len()),
            riddle: rng.random_range(0..RIDDLES.len()),
            riddle_revealed: false,
            breathing: false,
            last_breath_phase: false,
            last_result: None,
        }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&mut self, ui: &mut Ui, services: &Services, user: &mut User) -> Option<DashboardAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading(RichText::new("🎒 KidSpark").size(26.0));
            ui.label(RichText::new(format!("Hi, {}!", user.username)).size(16.0));
            ui.label(
                RichText::new(format!("⭐ {} XP", user.xp))
                    .strong()
                    .color(Color32::from_rgb(0xca, 0x8a, 0x04)),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Log out").clicked() {
                    action = Some(DashboardAction::Logout);
                }
            });
        });
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Class:").strong());
            for grade in 1..=5u8 {
                if ui
                    .selectable_label(user.grade == grade, format!("Grade {grade}"))
                    .clicked()
                {
                    user.grade = grade;
                }
            }
        });
        if let Some(result) = &self.last_result {
            ui.label(
                RichText::new(result)
                    .size(16.0)
                    .color(Color32::from_rgb(0x16, 0xa3, 0x4a)),
            );
        }
        ui.add_space(10.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.label(RichText::new("MY SCHOOL BOOKS 📚").strong().weak());
            ui.horizontal_wrapped(|ui| {
                for subject in Subject::ALL {
                    let label = format!("{}\n{}", subject.emoji(), subject.title());
                    let card = egui::Button::new(RichText::new(label).size(16.0))
                        .min_size(egui::vec2(160.0, 100.0));
                    if ui.add(card).clicked() {
                        action = Some(if subject == Subject::Poems {
                            DashboardAction::OpenPoems
                        } else {
                            DashboardAction::OpenSubject(subject)
                        });
                    }
                }
            });
            ui.add_space(12.0);

            let arcade = egui::Button::new(
                RichText::new("🕹 Arcade Zone — games, painting & music!").size(20.0),
            )
            .fill(Color32::from_rgb(0xfd, 0xf2, 0xf8))
            .min_size(egui::vec2(ui.available_width().min(680.0), 64.0));
            if ui.add(arcade).clicked() {
                action = Some(DashboardAction::OpenArcade);
            }
            ui.add_space(12.0);

            ui.columns(3, |columns| {
                columns[0].group(|ui| {
                    ui.label(RichText::new("😂 Daily Joke").strong());
                    ui.label(JOKES[self.joke]);
                    if ui.small_button("Another one!").clicked() {
                        self.joke = (self.joke + 1) % JOKES.len();
                    }
                });
                columns[1].group(|ui| {
                    let (question, answer) = RIDDLES[self.riddle];
                    ui.label(RichText::new("🤔 Riddle Me This").strong());
                    ui.label(question);
                    if self.riddle_revealed {
                        ui.label(RichText::new(answer).strong().color(Color32::from_rgb(0x7c, 0x3a, 0xed)));
                        if ui.small_button("Next riddle").clicked() {
                            self.riddle = (self.riddle + 1) % RIDDLES.len();
                            self.riddle_revealed = false;
                        }
                    } else if ui.small_button("Reveal answer").clicked() {
                        self.riddle_revealed = true;
                    }
                });
                columns[2].group(|ui| {
                    ui.label(RichText::new("🌬 Calm Corner").strong());
                    if ui
                        .selectable_label(self.breathing, if self.breathing { "Stop" } else { "Breathe with me" })
                        .clicked()
                    {
                        self.breathing = !self.breathing;
                    }
                    if self.breathing {
                        self.breathing_ui(ui, services);
                    }
                });
            });
        });
        action
    }

    /// A slow pulsing circle on an 8-second cycle: 4 in, 4 out.
    fn breathing_ui(&mut self, ui: &mut Ui, services: &Services) {
        let t = ui.input(|i| i.time);
        let cycle = (t % 8.0) / 8.0;
        let inhaling = cycle < 0.5;
        let phase = (if inhaling { cycle * 2.0 } else { 2.0 - cycle * 2.0 }) as f32;
        if inhaling != self.last_breath_phase {
            self.last_breath_phase = inhaling;
            services.tones.play(Tone::note(if inhaling { 220.0 } else { 165.0 }, 1.2));
        }
        let (rect, _) = ui.allocate_exact_size(egui::vec2(120.0, 120.0), egui::Sense::hover());
        ui.painter().circle_filled(
            rect.center(),
            20.0 + 34.0 * phase,
            Color32::from_rgba_unmultiplied(0x60, 0xa5, 0xfa, 140),
        );
        ui.label(
            RichText::new(if inhaling { "Breathe in..." } else { "Breathe out..." }).weak(),
        );
        ui.ctx().request_repaint_after(std::time::Duration::from_millis(60));
    }
}

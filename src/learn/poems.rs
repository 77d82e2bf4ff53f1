use egui::{Color32, RichText, Ui};

use crate::ai::{Load, service};
use crate::app::Services;
use crate::content::Poem;
use crate::speech::{SpeechHandle, SpeechOpts};

/// The built-in nursery rhymes shown as "classic hits".
fn classics() -> [Poem; 4] {
    [
        Poem {
            title: "Twinkle Little Star".into(),
            theme: "Space".into(),
            content: "Twinkle, twinkle, little star,\nHow I wonder what you are!\n\
                      Up above the world so high,\nLike a diamond in the sky."
                .into(),
        },
        Poem {
            title: "Baa Baa Black Sheep".into(),
            theme: "Farm".into(),
            content: "Baa, baa, black sheep,\nHave you any wool?\nYes sir, yes sir,\n\
                      Three bags full.\nOne for the master,\nOne for the dame,\n\
                      And one for the little boy\nWho lives down the lane."
                .into(),
        },
        Poem {
            title: "Rain Rain Go Away".into(),
            theme: "Weather".into(),
            content: "Rain, rain, go away,\nCome again another day.\n\
                      Little children want to play,\nRain, rain, go away!"
                .into(),
        },
        Poem {
            title: "Wheels on the Bus".into(),
            theme: "City".into(),
            content: "The wheels on the bus go round and round,\n\
                      Round and round, round and round.\n\
                      The wheels on the bus go round and round,\nAll through the town!"
                .into(),
        },
    ]
}

const TOPICS: [&str; 5] = [
    "Funny Robot",
    "My Pet Dinosaur",
    "Magic School Bus",
    "Deep Blue Sea",
    "Jungle Party",
];

/// Backdrop tint inferred from the poem's words, like the player's themed
/// "video" screens.
fn theme_color(poem: &Poem) -> Color32 {
    let text = format!("{} {} {}", poem.title, poem.content, poem.theme).to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    if has(&["space", "moon", "star"]) {
        Color32::from_rgb(0x0f, 0x17, 0x2a)
    } else if has(&["farm", "sheep", "cow"]) {
        Color32::from_rgb(0xdc, 0xfc, 0xe7)
    } else if has(&["rain", "weather", "cloud"]) {
        Color32::from_rgb(0xcb, 0xd5, 0xe1)
    } else if has(&["city", "bus", "town"]) {
        Color32::from_rgb(0xfe, 0xf9, 0xc3)
    } else if has(&["sea", "ocean", "fish"]) {
        Color32::from_rgb(0xa5, 0xf3, 0xfc)
    } else {
        Color32::from_rgb(0xe0, 0xe7, 0xff)
    }
}

fn theme_emoji(poem: &Poem) -> &'static str {
    let text = format!("{} {} {}", poem.title, poem.content, poem.theme).to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
    if has(&["space", "moon", "star"]) {
        "🚀⭐🌙"
    } else if has(&["farm", "sheep", "cow"]) {
        "🐑🐄🌻"
    } else if has(&["rain", "weather", "cloud"]) {
        "🌧☔💧"
    } else if has(&["city", "bus", "town"]) {
        "🚌🏙🚦"
    } else if has(&["sea", "ocean", "fish"]) {
        "🐠🌊🐙"
    } else {
        "🎈🧸✨"
    }
}

enum View {
    Gallery,
    Player,
}

/// Karaoke progress: which line the narrator is on.
struct Karaoke {
    line: usize,
    handle: SpeechHandle,
}

/// The poem "video library": classic rhymes plus AI surprises, narrated
/// line by line with the active line highlighted.
pub struct PoemView {
    grade: u8,
    view: View,
    load: Load<Poem>,
    poem: Option<Poem>,
    karaoke: Option<Karaoke>,
}

impl PoemView {
    pub fn new(grade: u8) -> Self {
        Self {
            grade,
            view: View::Gallery,
            load: Load::Idle,
            poem: None,
            karaoke: None,
        }
    }

    fn fetch(&mut self, services: &Services) {
        self.stop(services);
        let ai = services.ai.clone();
        let grade = self.grade;
        self.load = Load::start(move || service::generate_poem(ai.as_ref(), grade));
        self.view = View::Player;
    }

    fn stop(&mut self, services: &Services) {
        if self.karaoke.is_some() {
            services.narrator.cancel();
        }
        self.karaoke = None;
    }

    fn speak_line(&mut self, services: &Services, line: usize) {
        let Some(poem) = &self.poem else {
            return;
        };
        let lines = poem.lines();
        if line >= lines.len() {
            self.karaoke = None;
            return;
        }
        let handle = services
            .narrator
            .speak_with(lines[line], SpeechOpts::storytime());
        self.karaoke = Some(Karaoke { line, handle });
    }

    /// Advance the karaoke when the current line's utterance ends. Another
    /// feature grabbing the narrator cancels us; stop highlighting then.
    fn drive_karaoke(&mut self, services: &Services) {
        let (cancelled, finished, line) = match &self.karaoke {
            Some(k) => (k.handle.was_cancelled(), k.handle.is_finished(), k.line),
            None => return,
        };
        if cancelled {
            self.karaoke = None;
        } else if finished {
            self.speak_line(services, line + 1);
        }
    }

    /// Returns true when the child wants to leave.
    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        self.load.tick();
        if let Load::Ready(poem) = &self.load {
            self.poem = Some(poem.clone());
            self.load = Load::Idle;
        }
        self.drive_karaoke(services);
        if self.karaoke.is_some() {
            ui.ctx().request_repaint_after(std::time::Duration::from_millis(120));
        }

        match self.view {
            View::Gallery => self.gallery_ui(ui, services),
            View::Player => self.player_ui(ui, services),
        }
    }

    fn gallery_ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        let mut exit = false;
        ui.horizontal(|ui| {
            if ui.button("⬅ Exit").clicked() {
                self.stop(services);
                exit = true;
            }
            ui.heading("📺 Video Library");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("Grade {}", self.grade)).weak());
            });
        });
        ui.add_space(10.0);

        ui.label(RichText::new("CLASSIC HITS 🎵").strong().weak());
        ui.horizontal_wrapped(|ui| {
            for classic in classics() {
                let card = egui::Button::new(
                    RichText::new(format!("▶ {}", classic.title)).size(16.0),
                )
                .fill(theme_color(&classic))
                .min_size(egui::vec2(190.0, 90.0));
                if ui.add(card).clicked() {
                    self.stop(services);
                    self.poem = Some(classic.clone());
                    self.view = View::Player;
                }
            }
        });
        ui.add_space(14.0);

        ui.label(RichText::new("CREATE NEW VIDEO ✨").strong().weak());
        ui.horizontal_wrapped(|ui| {
            for topic in TOPICS {
                if ui.button(format!("✨ {topic}")).clicked() {
                    self.fetch(services);
                }
            }
        });
        exit
    }

    fn player_ui(&mut self, ui: &mut Ui, services: &Services) -> bool {
        ui.horizontal(|ui| {
            if ui.button("⬅ Back to Gallery").clicked() {
                self.stop(services);
                self.view = View::Gallery;
            }
            if ui.button("🔄 New Surprise").clicked() {
                self.fetch(services);
            }
        });
        ui.add_space(8.0);

        if self.load.is_loading() {
            super::loading_ui(ui, "Creating your magical video...");
            ui.ctx().request_repaint();
            return false;
        }
        if let Load::Failed(err) = &self.load {
            if super::retry_ui(ui, err) {
                self.fetch(services);
            }
            return false;
        }
        let Some(poem) = self.poem.clone() else {
            self.view = View::Gallery;
            return false;
        };

        let active_line = self.karaoke.as_ref().map(|k| k.line);
        egui::Frame::group(ui.style())
            .fill(theme_color(&poem))
            .inner_margin(28.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(theme_emoji(&poem)).size(36.0));
                    ui.heading(RichText::new(&poem.title).size(26.0).color(Color32::from_rgb(0xca, 0x8a, 0x04)));
                    ui.add_space(10.0);
                    for (i, line) in poem.lines().iter().enumerate() {
                        let text = if active_line == Some(i) {
                            RichText::new(*line)
                                .size(24.0)
                                .strong()
                                .background_color(Color32::from_rgba_unmultiplied(0xec, 0x48, 0x99, 120))
                        } else {
                            RichText::new(*line).size(20.0).weak()
                        };
                        ui.label(text);
                    }
                });
            });
        ui.add_space(10.0);
        ui.vertical_centered(|ui| {
            if self.karaoke.is_some() {
                if ui.button(RichText::new("⏹ Stop").size(20.0)).clicked() {
                    self.stop(services);
                }
            } else if services.narrator.available()
                && ui.button(RichText::new("▶ Play").size(20.0)).clicked()
            {
                self.speak_line(services, 0);
            }
            ui.label(
                RichText::new(format!("AI Video Player • Theme: {}", poem.theme))
                    .small()
                    .weak(),
            );
        });
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_poems_get_the_night_backdrop() {
        let poem = &classics()[0];
        assert_eq!(theme_color(poem), Color32::from_rgb(0x0f, 0x17, 0x2a));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let poem = Poem {
            title: "Mystery".into(),
            content: "la la la".into(),
            theme: String::new(),
        };
        assert_eq!(theme_color(&poem), Color32::from_rgb(0xe0, 0xe7, 0xff));
    }
}

use std::sync::Arc;

use egui::RichText;
use log::info;

use crate::ai::{ContentProvider, provider_from_env};
use crate::audio::{MusicBox, ToneSynth};
use crate::canvas::ToolState;
use crate::content::{Subject, User};
use crate::games::ArcadeHub;
use crate::learn::{LessonAction, LessonView, PoemView, QuizAction, QuizView, TypingAction, TypingView};
use crate::pages::{DashboardAction, DashboardView, landing_ui};
use crate::speech::{Narrator, Transcriber};

/// App-wide capabilities injected into every screen. The narrator is a real
/// singleton: all features share it and its last-writer-wins cancellation.
pub struct Services {
    pub ai: Arc<dyn ContentProvider>,
    pub narrator: Narrator,
    pub tones: ToneSynth,
    pub transcriber: Option<Transcriber>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            ai: provider_from_env(),
            narrator: Narrator::detect(),
            tones: ToneSynth::detect(),
            transcriber: Transcriber::from_env(),
        }
    }
}

#[cfg(test)]
impl Services {
    /// Services with every capability absent: AI calls fail, speech and
    /// tones are silent no-ops.
    pub(crate) fn silent_for_tests() -> Self {
        struct NoAi;
        impl ContentProvider for NoAi {
            fn generate_content(&self, _prompt: &str) -> Result<String, crate::ai::AiError> {
                Err(crate::ai::AiError::Empty)
            }
        }
        Self {
            ai: Arc::new(NoAi),
            narrator: Narrator::with_backend(None),
            tones: ToneSynth::silent(),
            transcriber: None,
        }
    }
}

/// Preferences that survive restarts via eframe storage.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Prefs {
    grade: u8,
    xp: u32,
    tools: ToolState,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            grade: 1,
            xp: 0,
            tools: ToolState::default(),
        }
    }
}

/// Where the child currently is. Screens own their transient state; leaving
/// a screen drops it, which also stops its timers and fetches.
enum Screen {
    Dashboard(DashboardView),
    Lesson(LessonView),
    Quiz(QuizView),
    Typing(TypingView),
    Poems(PoemView),
    Arcade(ArcadeHub),
}

impl Default for Screen {
    fn default() -> Self {
        Self::Dashboard(DashboardView::new())
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct KidSparkApp {
    prefs: Prefs,
    // Session-only state; a fresh launch always lands on the welcome page.
    #[serde(skip)]
    user: Option<User>,
    #[serde(skip)]
    screen: Screen,
    #[serde(skip)]
    services: Services,
    #[serde(skip)]
    music: Option<MusicBox>,
    /// The subject the lesson/quiz/typing chain is about.
    #[serde(skip)]
    subject: Option<Subject>,
}

impl Default for KidSparkApp {
    fn default() -> Self {
        let services = Services::default();
        let music = MusicBox::new(services.tones.clone());
        Self {
            prefs: Prefs::default(),
            user: None,
            screen: Screen::default(),
            services,
            music: Some(music),
            subject: None,
        }
    }
}

impl KidSparkApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        if let Some(storage) = cc.storage {
            let mut app: Self = eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default();
            // Skipped fields may come back bare; re-attach the music box to
            // the detected tone player.
            if app.music.is_none() {
                app.music = Some(MusicBox::new(app.services.tones.clone()));
            }
            info!("restored preferences (grade {})", app.prefs.grade);
            return app;
        }
        Self::default()
    }

    fn go_home(&mut self, result: Option<String>) {
        let mut dashboard = DashboardView::new();
        dashboard.last_result = result;
        self.screen = Screen::Dashboard(dashboard);
        self.subject = None;
    }

    fn open_subject(&mut self, subject: Subject) {
        self.subject = Some(subject);
        let grade = self.grade();
        self.screen = Screen::Lesson(LessonView::new(subject, grade, &self.services));
    }

    fn grade(&self) -> u8 {
        self.user.as_ref().map_or(self.prefs.grade, |u| u.grade)
    }

    fn central_ui(&mut self, ui: &mut egui::Ui) {
        let Some(user) = self.user.as_mut() else {
            if landing_ui(ui) {
                self.user = Some(User {
                    grade: self.prefs.grade,
                    ..User::default()
                });
            }
            return;
        };
        user.xp = self.prefs.xp;
        let grade = user.grade;

        match &mut self.screen {
            Screen::Dashboard(dashboard) => {
                match dashboard.ui(ui, &self.services, user) {
                    Some(DashboardAction::OpenSubject(subject)) => {
                        self.prefs.grade = user.grade;
                        self.open_subject(subject);
                    }
                    Some(DashboardAction::OpenPoems) => {
                        self.prefs.grade = user.grade;
                        self.screen = Screen::Poems(PoemView::new(user.grade));
                    }
                    Some(DashboardAction::OpenArcade) => {
                        self.screen = Screen::Arcade(ArcadeHub::new());
                    }
                    Some(DashboardAction::Logout) => {
                        self.services.narrator.cancel();
                        self.user = None;
                        self.go_home(None);
                    }
                    None => {
                        self.prefs.grade = user.grade;
                    }
                }
            }
            Screen::Lesson(lesson) => match lesson.ui(ui, &self.services) {
                Some(LessonAction::Exit) => self.go_home(None),
                Some(LessonAction::StartQuiz) => {
                    let subject = self.subject.unwrap_or(Subject::Science);
                    self.screen = Screen::Quiz(QuizView::new(subject, grade, &self.services));
                }
                Some(LessonAction::StartTyping) => {
                    let subject = self.subject.unwrap_or(Subject::English);
                    self.screen = Screen::Typing(TypingView::new(subject, grade, &self.services));
                }
                None => {}
            },
            Screen::Quiz(quiz) => match quiz.ui(ui, &self.services) {
                Some(QuizAction::Exit) => self.go_home(None),
                Some(QuizAction::Complete { percent }) => {
                    self.prefs.xp += percent / 10;
                    self.go_home(Some(format!("Great Job! Score: {percent}%")));
                }
                None => {}
            },
            Screen::Typing(typing) => match typing.ui(ui, &self.services) {
                Some(TypingAction::Exit) => self.go_home(None),
                Some(TypingAction::Complete { accuracy, wpm }) => {
                    self.prefs.xp += accuracy / 10;
                    self.go_home(Some(format!(
                        "Amazing! {wpm} WPM with {accuracy}% Accuracy."
                    )));
                }
                None => {}
            },
            Screen::Poems(poems) => {
                if poems.ui(ui, &self.services) {
                    self.go_home(None);
                }
            }
            Screen::Arcade(arcade) => {
                if arcade.ui(ui, &self.services, &mut self.prefs.tools, grade) {
                    self.go_home(None);
                }
            }
        }
    }
}

impl eframe::App for KidSparkApp {
    /// Called by the framework to save preferences before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("music-bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(music) = &mut self.music {
                    let playing = music.is_playing();
                    let label = if playing { "🔊 Music ON" } else { "🔈 Music OFF" };
                    if ui.selectable_label(playing, label).clicked() {
                        music.toggle();
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new("KidSpark: learn and play").small().weak());
                });
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_ui(ui);
        });
    }
}

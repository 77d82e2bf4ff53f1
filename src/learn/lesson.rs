use egui::{Color32, RichText, Ui};

use crate::ai::{Load, service};
use crate::app::Services;
use crate::content::{Lesson, Subject};
use crate::speech::{SpeechHandle, SpeechOpts};

pub enum LessonAction {
    Exit,
    StartQuiz,
    StartTyping,
}

/// The open-book reader: one AI mini-lesson, read aloud on request.
pub struct LessonView {
    subject: Subject,
    grade: u8,
    load: Load<Lesson>,
    narration: Option<SpeechHandle>,
}

impl LessonView {
    pub fn new(subject: Subject, grade: u8, services: &Services) -> Self {
        let mut view = Self {
            subject,
            grade,
            load: Load::Idle,
            narration: None,
        };
        view.reload(services);
        view
    }

    fn reload(&mut self, services: &Services) {
        let ai = services.ai.clone();
        let (subject, grade) = (self.subject, self.grade);
        self.load = Load::start(move || service::generate_lesson(ai.as_ref(), subject, grade));
    }

    fn toggle_narration(&mut self, services: &Services, lesson: &Lesson) {
        let speaking = self.narration.as_ref().is_some_and(SpeechHandle::is_active);
        if speaking {
            services.narrator.cancel();
            self.narration = None;
        } else {
            let script = format!(
                "{}. {}. Fun Fact: {}",
                lesson.title, lesson.content, lesson.fun_fact
            );
            self.narration = Some(
                services
                    .narrator
                    .speak_with(&script, SpeechOpts::storytime()),
            );
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> Option<LessonAction> {
        self.load.tick();
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("⬅ Close Book").clicked() {
                services.narrator.cancel();
                action = Some(LessonAction::Exit);
            }
            ui.label(RichText::new(format!("Grade {}", self.grade)).weak());
        });
        ui.add_space(8.0);

        match &self.load {
            Load::Loading(_) => {
                super::loading_ui(ui, &format!("Opening your {} book...", self.subject));
                ui.ctx().request_repaint();
            }
            Load::Failed(err) => {
                if super::retry_ui(ui, err) {
                    self.reload(services);
                }
            }
            Load::Ready(lesson) => {
                let lesson = lesson.clone();
                egui::Frame::group(ui.style())
                    .fill(Color32::from_rgb(0xfd, 0xfb, 0xf7))
                    .inner_margin(24.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(self.subject.title()).small().weak());
                        ui.heading(RichText::new(&lesson.title).size(28.0));
                        ui.add_space(10.0);
                        ui.label(RichText::new(&lesson.content).size(18.0));
                        ui.add_space(14.0);
                        egui::Frame::group(ui.style())
                            .fill(Color32::from_rgb(0xe8, 0xf0, 0xfe))
                            .show(ui, |ui| {
                                ui.label(RichText::new("Did you know?").strong());
                                ui.label(&lesson.fun_fact);
                            });
                        if !lesson.key_words.is_empty() {
                            ui.add_space(10.0);
                            ui.horizontal_wrapped(|ui| {
                                ui.label(RichText::new("Key words:").strong());
                                for word in &lesson.key_words {
                                    ui.label(RichText::new(word).underline());
                                }
                            });
                        }
                    });
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if services.narrator.available() {
                        let speaking =
                            self.narration.as_ref().is_some_and(SpeechHandle::is_active);
                        let label = if speaking { "🔇 Stop" } else { "🔊 Read to me" };
                        if ui.button(RichText::new(label).size(16.0)).clicked() {
                            self.toggle_narration(services, &lesson);
                        }
                    }
                    if ui.button(RichText::new("🧠 Quiz Me!").size(16.0)).clicked() {
                        services.narrator.cancel();
                        action = Some(LessonAction::StartQuiz);
                    }
                    if ui.button(RichText::new("⌨ Typing Practice").size(16.0)).clicked() {
                        services.narrator.cancel();
                        action = Some(LessonAction::StartTyping);
                    }
                });
            }
            Load::Idle => {}
        }
        action
    }
}

use egui::{Color32, ProgressBar, RichText, Ui};

use crate::ai::{Load, service};
use crate::app::Services;
use crate::content::{QuizQuestion, Subject};

pub enum QuizAction {
    Exit,
    /// Quiz finished; `percent` is the 0-100 score.
    Complete { percent: u32 },
}

/// Five AI multiple-choice questions with explanations.
pub struct QuizView {
    subject: Subject,
    grade: u8,
    load: Load<Vec<QuizQuestion>>,
    index: usize,
    score: u32,
    selected: Option<usize>,
}

impl QuizView {
    pub fn new(subject: Subject, grade: u8, services: &Services) -> Self {
        let mut view = Self {
            subject,
            grade,
            load: Load::Idle,
            index: 0,
            score: 0,
            selected: None,
        };
        view.reload(services);
        view
    }

    fn reload(&mut self, services: &Services) {
        let ai = services.ai.clone();
        let (subject, grade) = (self.subject, self.grade);
        self.index = 0;
        self.score = 0;
        self.selected = None;
        self.load = Load::start(move || service::generate_quiz(ai.as_ref(), subject, grade));
    }

    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> Option<QuizAction> {
        self.load.tick();
        let mut action = None;

        ui.horizontal(|ui| {
            if ui.button("Exit").clicked() {
                action = Some(QuizAction::Exit);
            }
            if let Load::Ready(questions) = &self.load {
                ui.label(
                    RichText::new(format!("Question {} / {}", self.index + 1, questions.len()))
                        .weak(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("Score: {}", self.score)).strong());
                });
            }
        });
        ui.add_space(6.0);

        match &self.load {
            Load::Loading(_) => {
                super::loading_ui(
                    ui,
                    &format!(
                        "Asking AI for {} questions (Grade {})...",
                        self.subject, self.grade
                    ),
                );
                ui.ctx().request_repaint();
            }
            Load::Failed(err) => {
                if super::retry_ui(ui, err) {
                    self.reload(services);
                }
            }
            Load::Ready(questions) => {
                let questions = questions.clone();
                let total = questions.len();
                let question = &questions[self.index];
                ui.add(ProgressBar::new(self.index as f32 / total as f32).show_percentage());
                ui.add_space(10.0);
                ui.heading(RichText::new(&question.question).size(24.0));
                ui.add_space(10.0);

                for (i, option) in question.options.iter().enumerate() {
                    let is_correct = *option == question.correct_answer;
                    let text = RichText::new(format!(
                        "{}  {option}",
                        char::from(b'A' + (i % 26) as u8)
                    ))
                    .size(18.0);
                    let text = match self.selected {
                        Some(_) if is_correct => text.color(Color32::from_rgb(0x16, 0xa3, 0x4a)),
                        Some(sel) if sel == i => text.color(Color32::from_rgb(0xdc, 0x26, 0x26)),
                        Some(_) => text.weak(),
                        None => text,
                    };
                    let button = egui::Button::new(text).min_size(egui::vec2(ui.available_width(), 44.0));
                    if ui.add_enabled(self.selected.is_none(), button).clicked() {
                        self.selected = Some(i);
                        if is_correct {
                            self.score += 1;
                        }
                    }
                }

                if self.selected.is_some() {
                    ui.add_space(12.0);
                    egui::Frame::group(ui.style())
                        .fill(Color32::from_rgb(0xe8, 0xf0, 0xfe))
                        .show(ui, |ui| {
                            ui.label(RichText::new("Did you know?").strong());
                            ui.label(&question.explanation);
                        });
                    ui.add_space(8.0);
                    let last = self.index + 1 == total;
                    let label = if last { "Finish!" } else { "Next ➡" };
                    if ui.button(RichText::new(label).size(18.0)).clicked() {
                        if last {
                            let percent = (self.score * 100) / total as u32;
                            action = Some(QuizAction::Complete { percent });
                        } else {
                            self.index += 1;
                            self.selected = None;
                        }
                    }
                }
            }
            Load::Idle => {}
        }
        action
    }
}

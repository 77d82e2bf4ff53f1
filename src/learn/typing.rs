use std::time::Instant;

use egui::text::LayoutJob;
use egui::{Color32, FontId, RichText, TextFormat, Ui};

use crate::ai::{Load, service};
use crate::app::Services;
use crate::content::{Subject, TypingChallenge};

pub enum TypingAction {
    Exit,
    Complete { accuracy: u32, wpm: u32 },
}

/// Typing trainer: an AI passage, per-character feedback, live WPM and
/// accuracy. The timer starts on the first keystroke.
pub struct TypingView {
    subject: Subject,
    grade: u8,
    load: Load<TypingChallenge>,
    input: String,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl TypingView {
    pub fn new(subject: Subject, grade: u8, services: &Services) -> Self {
        let mut view = Self {
            subject,
            grade,
            load: Load::Idle,
            input: String::new(),
            started: None,
            finished: None,
        };
        view.reload(services);
        view
    }

    fn reload(&mut self, services: &Services) {
        let ai = services.ai.clone();
        let (subject, grade) = (self.subject, self.grade);
        self.input.clear();
        self.started = None;
        self.finished = None;
        self.load = Load::start(move || service::generate_typing(ai.as_ref(), subject, grade));
    }

    fn elapsed_secs(&self) -> u64 {
        match (self.started, self.finished) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs(),
            (Some(start), None) => start.elapsed().as_secs(),
            _ => 0,
        }
    }

    /// (wpm, accuracy-percent) against the target text, matching position by
    /// position.
    fn stats(&self, target: &str) -> (u32, u32) {
        let minutes = (self.elapsed_secs().max(1)) as f32 / 60.0;
        let words = self.input.split_whitespace().count() as f32;
        let wpm = (words / minutes) as u32;

        let target_chars: Vec<char> = target.chars().collect();
        let correct = self
            .input
            .chars()
            .enumerate()
            .filter(|(i, c)| target_chars.get(*i) == Some(c))
            .count();
        let accuracy = if target_chars.is_empty() {
            100
        } else {
            (correct * 100 / target_chars.len()) as u32
        };
        (wpm, accuracy)
    }

    /// The passage with green/red per-character feedback.
    fn feedback_job(&self, target: &str) -> LayoutJob {
        let mut job = LayoutJob::default();
        let font = FontId::monospace(20.0);
        let typed: Vec<char> = self.input.chars().collect();
        for (i, c) in target.chars().enumerate() {
            let color = match typed.get(i) {
                Some(t) if *t == c => Color32::from_rgb(0x16, 0xa3, 0x4a),
                Some(_) => Color32::from_rgb(0xdc, 0x26, 0x26),
                None => Color32::GRAY,
            };
            job.append(
                &c.to_string(),
                0.0,
                TextFormat {
                    font_id: font.clone(),
                    color,
                    ..Default::default()
                },
            );
        }
        job
    }

    pub fn ui(&mut self, ui: &mut Ui, services: &Services) -> Option<TypingAction> {
        self.load.tick();
        let mut action = None;

        match &self.load {
            Load::Loading(_) => {
                ui.horizontal(|ui| {
                    if ui.button("Exit").clicked() {
                        action = Some(TypingAction::Exit);
                    }
                });
                super::loading_ui(
                    ui,
                    &format!("Writing a fun story about {}...", self.subject),
                );
                ui.ctx().request_repaint();
                return action;
            }
            Load::Failed(err) => {
                ui.horizontal(|ui| {
                    if ui.button("Exit").clicked() {
                        action = Some(TypingAction::Exit);
                    }
                });
                if super::retry_ui(ui, err) {
                    self.reload(services);
                }
                return action;
            }
            Load::Idle => return action,
            Load::Ready(_) => {}
        }
        let Load::Ready(challenge) = &self.load else {
            return action;
        };
        let challenge = challenge.clone();
        let completed = self.finished.is_some();
        let (wpm, accuracy) = self.stats(&challenge.text);

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("⏱ {}s", self.elapsed_secs())).size(18.0).strong());
            ui.label(RichText::new(format!("🚀 {wpm} WPM")).size(18.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Exit").clicked() {
                    action = Some(TypingAction::Exit);
                }
                if ui.button("🔄 New").clicked() {
                    self.reload(services);
                }
            });
        });
        if self.started.is_some() && !completed {
            // Keep the timer readout moving even without keystrokes.
            ui.ctx().request_repaint_after(std::time::Duration::from_millis(250));
        }
        ui.add_space(8.0);

        ui.label(RichText::new(&challenge.topic).strong().size(16.0));
        egui::Frame::group(ui.style()).inner_margin(16.0).show(ui, |ui| {
            ui.label(self.feedback_job(&challenge.text));
        });
        ui.add_space(8.0);

        let edit = egui::TextEdit::multiline(&mut self.input)
            .font(egui::TextStyle::Monospace)
            .hint_text("Start typing here... the timer starts when you type!")
            .desired_rows(4)
            .desired_width(f32::INFINITY)
            .interactive(!completed);
        let response = ui.add(edit);
        if response.changed() {
            if self.started.is_none() && !self.input.is_empty() {
                self.started = Some(Instant::now());
            }
            if self.input.chars().count() >= challenge.text.chars().count()
                && self.finished.is_none()
            {
                self.finished = Some(Instant::now());
            }
        }

        if completed {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("✅ All done!").size(24.0).strong());
                ui.label(format!("{wpm} WPM with {accuracy}% accuracy"));
                if ui.button(RichText::new("Finish Lesson! 🎉").size(18.0)).clicked() {
                    action = Some(TypingAction::Complete { accuracy, wpm });
                }
            });
        } else if self.started.is_none() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Start typing to begin the timer!").weak());
            });
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_with_input(input: &str, elapsed: u64) -> TypingView {
        TypingView {
            subject: Subject::Science,
            grade: 2,
            load: Load::Idle,
            input: input.to_owned(),
            started: Some(Instant::now() - std::time::Duration::from_secs(elapsed)),
            finished: Some(Instant::now()),
        }
    }

    #[test]
    fn accuracy_counts_matching_positions() {
        let view = view_with_input("cat sat", 60);
        let (_, accuracy) = view.stats("cat mat");
        // 6 of 7 characters line up.
        assert_eq!(accuracy, 6 * 100 / 7);
    }

    #[test]
    fn wpm_uses_whole_words_per_minute() {
        let view = view_with_input("one two three four five", 60);
        let (wpm, _) = view.stats("one two three four five");
        assert_eq!(wpm, 5);
    }
}

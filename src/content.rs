//! Content types shared between the AI service and the activity screens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A school subject on the dashboard bookshelf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Math,
    English,
    Computer,
    Ai,
    Science,
    Geography,
    History,
    Poems,
}

impl Subject {
    pub const ALL: [Subject; 8] = [
        Subject::Math,
        Subject::English,
        Subject::Computer,
        Subject::Ai,
        Subject::Science,
        Subject::Geography,
        Subject::History,
        Subject::Poems,
    ];

    /// Human-readable name, also used verbatim in AI prompts.
    pub fn title(self) -> &'static str {
        match self {
            Self::Math => "Mathematics",
            Self::English => "English Grammar",
            Self::Computer => "Computer Science",
            Self::Ai => "AI Technology",
            Self::Science => "General Science",
            Self::Geography => "Geography",
            Self::History => "History",
            Self::Poems => "Poems & Rhymes",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Math => "🔢",
            Self::English => "📖",
            Self::Computer => "💻",
            Self::Ai => "🧠",
            Self::Science => "🔬",
            Self::Geography => "🌍",
            Self::History => "📜",
            Self::Poems => "📺",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One multiple-choice question of an AI-generated quiz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

/// An AI-generated passage for the typing trainer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingChallenge {
    pub text: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
}

/// A poem for the karaoke player. `content` holds newline-separated lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Poem {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub theme: String,
}

impl Poem {
    /// Non-blank lines, in narration order.
    pub fn lines(&self) -> Vec<&str> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// An AI-generated mini-lesson for the book reader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub title: String,
    pub content: String,
    pub fun_fact: String,
    #[serde(default)]
    pub key_words: Vec<String>,
}

/// The signed-in child. There is no login; this is a static client-side
/// placeholder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub grade: u8,
    pub xp: u32,
}

impl Default for User {
    fn default() -> Self {
        Self {
            username: "Little Explorer".to_owned(),
            grade: 1,
            xp: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poem_lines_skip_blanks() {
        let poem = Poem {
            title: "T".into(),
            content: "one\n\n  two  \n".into(),
            theme: String::new(),
        };
        assert_eq!(poem.lines(), vec!["one", "two"]);
    }

    #[test]
    fn quiz_question_parses_camel_case() {
        let json = r#"{
            "question": "What is 1 + 1?",
            "options": ["1", "2", "3", "4"],
            "correctAnswer": "2",
            "explanation": "One plus one makes two."
        }"#;
        let q: QuizQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(q.correct_answer, "2");
    }
}

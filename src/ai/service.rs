//! Typed generators over the raw content capability: build the prompt, call
//! the provider, scrape the JSON, parse into the content types.

use super::{AiError, ContentProvider, extract, prompts};
use crate::content::{Lesson, Poem, QuizQuestion, TypingChallenge, Subject};

pub fn generate_quiz(
    provider: &dyn ContentProvider,
    subject: Subject,
    grade: u8,
) -> Result<Vec<QuizQuestion>, AiError> {
    let text = provider.generate_content(&prompts::quiz(subject, grade))?;
    let questions: Vec<QuizQuestion> =
        extract::parse_json(&text).ok_or(AiError::Unparseable)?;
    if questions.is_empty() {
        return Err(AiError::Unparseable);
    }
    Ok(questions)
}

pub fn generate_typing(
    provider: &dyn ContentProvider,
    subject: Subject,
    grade: u8,
) -> Result<TypingChallenge, AiError> {
    let text = provider.generate_content(&prompts::typing(subject, grade))?;
    extract::parse_json(&text).ok_or(AiError::Unparseable)
}

pub fn generate_poem(provider: &dyn ContentProvider, grade: u8) -> Result<Poem, AiError> {
    let text = provider.generate_content(&prompts::poem(grade))?;
    extract::parse_json(&text).ok_or(AiError::Unparseable)
}

pub fn generate_lesson(
    provider: &dyn ContentProvider,
    subject: Subject,
    grade: u8,
) -> Result<Lesson, AiError> {
    let text = provider.generate_content(&prompts::lesson(subject, grade))?;
    extract::parse_json(&text).ok_or(AiError::Unparseable)
}

/// The chat bot wants plain prose, not JSON.
pub fn chat_reply(
    provider: &dyn ContentProvider,
    message: &str,
    grade: u8,
) -> Result<String, AiError> {
    let text = provider.generate_content(&prompts::chat(message, grade))?;
    let reply = text.trim();
    if reply.is_empty() {
        return Err(AiError::Empty);
    }
    Ok(reply.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl ContentProvider for Canned {
        fn generate_content(&self, _prompt: &str) -> Result<String, AiError> {
            Ok(self.0.to_owned())
        }
    }

    #[test]
    fn quiz_parses_fenced_array() {
        let provider = Canned(
            "```json\n[{\"question\":\"1+1?\",\"options\":[\"1\",\"2\"],\
             \"correctAnswer\":\"2\",\"explanation\":\"easy\"}]\n```",
        );
        let quiz = generate_quiz(&provider, Subject::Math, 1).unwrap();
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz[0].correct_answer, "2");
    }

    #[test]
    fn unparseable_response_is_an_error_not_a_panic() {
        let provider = Canned("I'd rather not.");
        assert!(matches!(
            generate_lesson(&provider, Subject::Science, 2),
            Err(AiError::Unparseable)
        ));
    }

    #[test]
    fn empty_quiz_array_counts_as_unparseable() {
        let provider = Canned("[]");
        assert!(generate_quiz(&provider, Subject::Math, 1).is_err());
    }
}

use kidspark::ai::extract::{extract_json, parse_json};
use kidspark::ai::{AiError, ContentProvider, service};
use kidspark::content::Subject;
use serde_json::Value;

#[test]
fn fenced_object_with_surrounding_prose_parses() {
    let text = "Here you go:\n```json\n{\"a\":1}\n```\nEnjoy!";
    let value: Value = parse_json(text).unwrap();
    assert_eq!(value, serde_json::json!({"a": 1}));
}

#[test]
fn garbage_yields_none_without_panicking() {
    assert!(parse_json::<Value>("complete nonsense, no json here").is_none());
    assert!(parse_json::<Value>("{\"never\": \"closed\"").is_none());
}

#[test]
fn first_balanced_region_wins() {
    let text = "ignore this } stray bracket... {\"first\": true} and then {\"second\": true}";
    assert_eq!(extract_json(text), Some("{\"first\": true}"));
}

#[test]
fn arrays_are_extracted_when_they_come_first() {
    let text = "answer: [\"a\", \"b\"] or maybe {\"c\": 1}";
    assert_eq!(extract_json(text), Some("[\"a\", \"b\"]"));
}

/// A provider that replies with whatever canned text the test wants.
struct Scripted(&'static str);

impl ContentProvider for Scripted {
    fn generate_content(&self, _prompt: &str) -> Result<String, AiError> {
        Ok(self.0.to_owned())
    }
}

#[test]
fn quiz_generation_scrapes_markdown_fences() {
    let provider = Scripted(
        "Sure thing! Here are your questions:\n```json\n[\n  {\"question\": \"2+2?\", \
         \"options\": [\"3\", \"4\"], \"correctAnswer\": \"4\", \"explanation\": \"count!\"}\n]\n```",
    );
    let quiz = service::generate_quiz(&provider, Subject::Math, 1).unwrap();
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz[0].correct_answer, "4");
}

#[test]
fn unparseable_reply_becomes_a_retry_state_error() {
    let provider = Scripted("I would rather talk about dinosaurs.");
    let err = service::generate_poem(&provider, 1).unwrap_err();
    assert!(matches!(err, AiError::Unparseable));
}

#[test]
fn poem_json_with_embedded_newlines_parses() {
    let provider = Scripted(
        "{\"title\": \"Zoom\", \"content\": \"Up we go\\nDown we come\", \"theme\": \"Space\"}",
    );
    let poem = service::generate_poem(&provider, 2).unwrap();
    assert_eq!(poem.lines(), vec!["Up we go", "Down we come"]);
}

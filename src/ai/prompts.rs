//! Prompt construction for every AI-backed activity.

use crate::content::Subject;

/// Curriculum descriptor woven into each prompt.
pub fn grade_descriptor(grade: u8) -> String {
    match grade {
        0 | 1 => "Pre-school / Kindergarten level (ages 4-6). Focus on ABCs, Numbers 1-10, \
                  Colors, Shapes, Animals, and very simple words."
            .to_owned(),
        2 => "Grade 2 level (ages 7-8). Simple sentences, basic addition/subtraction, nature."
            .to_owned(),
        g => format!("Grade {g} curriculum level."),
    }
}

pub fn quiz(subject: Subject, grade: u8) -> String {
    format!(
        "Generate 5 multiple choice questions for {subject} for a student in {level}.\n\
         Return purely a JSON array. No markdown.\n\
         Format:\n\
         [\n  {{\n    \"question\": \"Question text\",\n    \"options\": [\"A\", \"B\", \"C\", \"D\"],\n    \
         \"correctAnswer\": \"The correct option text\",\n    \"explanation\": \"Simple explanation for a child\"\n  }}\n]",
        level = grade_descriptor(grade),
    )
}

pub fn typing(subject: Subject, grade: u8) -> String {
    format!(
        "Write a short, fun, educational paragraph about {subject} for a student in {level}.\n\
         Max 30 words for Grade 1-2, max 60 words for Grade 3+.\n\
         Return purely a JSON object. No markdown.\n\
         Format:\n\
         {{\n  \"text\": \"The text content...\",\n  \"topic\": \"Title\",\n  \"difficulty\": \"Easy\"\n}}",
        level = grade_descriptor(grade),
    )
}

pub fn poem(grade: u8) -> String {
    format!(
        "Write a fun, rhythmic, catchy rhyming poem for a kid in {level}.\n\
         It should be about a random fun topic (Space, Animals, Magic, Friends).\n\
         Include sound words (Onomatopoeia) like \"Zoom\", \"Boom\", \"Splash\".\n\
         Return purely a JSON object. No markdown.\n\
         Format:\n\
         {{\n  \"title\": \"Fun Title\",\n  \"content\": \"Line 1\\nLine 2...\",\n  \"theme\": \"Space\"\n}}",
        level = grade_descriptor(grade),
    )
}

pub fn lesson(subject: Subject, grade: u8) -> String {
    format!(
        "Write a short, fun, and engaging mini-lesson about a random interesting topic in \
         {subject} for a student in {level}.\n\
         Keep it under 100 words. Make it sound exciting!\n\
         Also provide one \"Did you know?\" fun fact and a list of 3-5 key words to learn.\n\
         Return purely a JSON object. No markdown.\n\
         Format:\n\
         {{\n  \"title\": \"Exciting Topic Title\",\n  \"content\": \"The educational content...\",\n  \
         \"funFact\": \"Did you know that...\",\n  \"keyWords\": [\"Word1\", \"Word2\", \"Word3\"]\n}}",
        level = grade_descriptor(grade),
    )
}

pub fn chat(user_message: &str, grade: u8) -> String {
    format!(
        "You are 'Robo', a friendly, funny robot friend for a child in {level}.\n\
         The child says: \"{user_message}\".\n\
         Reply in 1 or 2 short, simple sentences. Be encouraging and use an emoji.\n\
         If they say hello, introduce yourself as Robo.",
        level = grade_descriptor(grade),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_prompt_names_subject_and_level() {
        let prompt = quiz(Subject::Science, 1);
        assert!(prompt.contains("General Science"));
        assert!(prompt.contains("Kindergarten"));
        assert!(prompt.contains("correctAnswer"));
    }

    #[test]
    fn older_grades_use_generic_descriptor() {
        assert_eq!(grade_descriptor(4), "Grade 4 curriculum level.");
    }
}

//! JSON scraping for model responses.
//!
//! The content provider returns free-form text that should contain a JSON
//! object or array, but models like to wrap it in markdown fences or pad it
//! with prose. We strip fences, then take the first *balanced* top-level
//! `{...}` or `[...]` region — counting brackets while skipping string
//! literals and escapes, so braces inside quoted text never confuse the
//! scanner.

/// Extract the first balanced JSON object or array from `text`.
pub fn extract_json(text: &str) -> Option<&str> {
    let stripped = strip_fences(text);
    let start = stripped.find(['{', '['])?;
    let bytes = stripped.as_bytes();
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&stripped[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and parse into `T`. `None` on any failure; never panics.
pub fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Option<T> {
    let region = extract_json(text)?;
    match serde_json::from_str(region) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("model returned JSON we could not parse: {err}");
            None
        }
    }
}

/// Drop markdown code fences so the bracket scan does not trip over them.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    // A fully fenced response: take the inside of the first fence pair.
    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn extracts_fenced_object_with_prose() {
        let text = "Here you go:\n```json\n{\"a\":1}\n```\nEnjoy!";
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn extracts_array_before_trailing_text() {
        let text = "Sure! [1, 2, 3] — hope that helps.";
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value, serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn braces_inside_strings_do_not_unbalance() {
        let text = r#"{"msg": "look: } and { are fine", "n": 2}"#;
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn escaped_quotes_are_skipped() {
        let text = r#"{"msg": "she said \"hi\" {", "ok": true}"#;
        let value: Value = parse_json(text).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn garbage_yields_none_without_panicking() {
        assert!(parse_json::<Value>("the AI needs a nap").is_none());
        assert!(parse_json::<Value>("{unclosed").is_none());
        assert!(parse_json::<Value>("").is_none());
    }

    #[test]
    fn nested_structures_stay_balanced() {
        let text = "prefix {\"a\": {\"b\": [1, {\"c\": 2}]}} suffix";
        assert_eq!(extract_json(text), Some("{\"a\": {\"b\": [1, {\"c\": 2}]}}"));
    }
}

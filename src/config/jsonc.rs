// src/config/jsonc.rs
//! JSONC preprocessing.
//!
//! Strips `//` and `/* */` comments while preserving string literals
//! that happen to contain comment-looking sequences.

/// Removes comments from JSONC input, yielding plain JSON.
///
/// Comment bytes are replaced rather than deleted where it matters for
/// line structure: line comments end at the newline, which is kept, so
/// parse errors still point at the right line.
#[must_use]
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut state = State::Normal;

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '"' => {
                    state = State::InString;
                    out.push(c);
                }
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        state = State::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    _ => out.push(c),
                },
                _ => out.push(c),
            },
            State::InString => {
                out.push(c);
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    }
                    '"' => state = State::Normal,
                    _ => {}
                }
            }
            State::LineComment => {
                if c == '\n' {
                    out.push(c);
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Normal;
                } else if c == '\n' {
                    out.push(c);
                }
            }
        }
    }

    out
}

enum State {
    Normal,
    InString,
    LineComment,
    BlockComment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_stripped() {
        let input = "{\n  \"a\": 1 // trailing\n}";
        let out = strip_comments(input);
        assert!(!out.contains("trailing"));
        assert!(serde_json::from_str::<serde_json::Value>(&out).is_ok());
    }

    #[test]
    fn test_block_comment_stripped() {
        let input = "{ /* note */ \"a\": 1 }";
        let out = strip_comments(input);
        assert!(!out.contains("note"));
    }

    #[test]
    fn test_string_with_slashes_preserved() {
        let input = r#"{ "url": "https://example.com/a", "glob": "src/**" }"#;
        let out = strip_comments(input);
        assert!(out.contains("https://example.com/a"));
        assert!(out.contains("src/**"));
    }

    #[test]
    fn test_string_with_block_marker_preserved() {
        let input = r#"{ "pattern": "a/*.py" }"#;
        let out = strip_comments(input);
        assert!(out.contains("a/*.py"));
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let input = r#"{ "msg": "say \"hi\" // not a comment" }"#;
        let out = strip_comments(input);
        assert!(out.contains("not a comment"));
    }
}

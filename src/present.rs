//! Presentation of answers for the web UI
//!
//! Bundles the question, answer, and usage counters together with a
//! client-side speech-synthesis snippet. Answer text is escaped before it is
//! embedded in the generated script so no content can break out of the
//! string literal.

use serde::Serialize;

use crate::chat::{Answer, TokenUsage};

/// A rendered answer, ready to serialize for the UI
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    /// The question that was asked (typed or transcribed)
    pub question: String,

    /// Generated answer text
    pub answer: String,

    /// Token counts reported by the remote service
    pub usage: TokenUsage,

    /// HTML `<script>` fragment that speaks the answer aloud client-side
    pub speech_script: String,
}

impl AnswerView {
    /// Assemble the view for a question/answer pair
    #[must_use]
    pub fn new(question: &str, answer: &Answer) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.text.clone(),
            usage: answer.usage,
            speech_script: speech_script(&answer.text),
        }
    }
}

/// Generate the client-side speech-synthesis instruction for a text
#[must_use]
pub fn speech_script(text: &str) -> String {
    format!(
        "<script>\n  const msg = new SpeechSynthesisUtterance(\"{}\");\n  window.speechSynthesis.speak(msg);\n</script>",
        escape_js_string(text)
    )
}

/// Escape a string for embedding inside a double-quoted JS string literal
///
/// Covers backslash, double quote, newlines, and the `</` sequence that
/// would otherwise terminate the surrounding `<script>` element early.
#[must_use]
pub fn escape_js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' if chars.peek() == Some(&'/') => out.push_str("<\\"),
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quotes_are_escaped() {
        let escaped = escape_js_string("He said \"hi\"");
        assert_eq!(escaped, "He said \\\"hi\\\"");
    }

    #[test]
    fn backslashes_and_newlines_are_escaped() {
        assert_eq!(escape_js_string("a\\b"), "a\\\\b");
        assert_eq!(escape_js_string("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn script_close_cannot_terminate_snippet() {
        let script = speech_script("evil </script> text");
        // The only </script> is the one closing the generated snippet
        assert_eq!(script.matches("</script>").count(), 1);
        assert!(script.ends_with("</script>"));
    }

    #[test]
    fn snippet_contains_speech_synthesis_call() {
        let script = speech_script("Hello there");
        assert!(script.contains("SpeechSynthesisUtterance(\"Hello there\")"));
        assert!(script.contains("window.speechSynthesis.speak"));
    }
}

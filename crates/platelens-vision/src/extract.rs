//! Markdown fence extraction
//!
//! Models sometimes wrap the requested JSON in a fenced code block even when
//! told not to. This is a small pure function so it can be tested without any
//! network involvement.

/// Strip a surrounding markdown code fence, if present.
///
/// Trims whitespace; if the text then begins with a triple-backtick fence,
/// drops the first line (the fence open, possibly with a language tag) and,
/// if the last remaining line is a bare closing fence, drops that too. The
/// result is trimmed again. Text without a leading fence passes through
/// unchanged apart from trimming.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    lines.remove(0);

    if let Some(last) = lines.last() {
        if last.trim() == "```" {
            lines.pop();
        }
    }

    lines.join("\n").trim().to_string()
}

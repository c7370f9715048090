/// Clean extracted text before it goes into a prompt.
/// Drops control characters (keeping newlines and tabs), trims each line and
/// collapses runs of blank lines.
pub fn sanitize_extracted_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collapse every whitespace run to a single space.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True if the text has at least one non-whitespace character.
pub fn has_meaningful_text(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}

use once_cell::sync::Lazy;
use regex::Regex;

/// "1. ", "2) ", "- ", "* ", "Q3: "
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:Q(?:uestion)?\s*)?\d+\s*[.):-]\s*|[-*•]\s+)").expect("invalid list marker regex")
});
static TOPIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[([^\]]+)\]").expect("invalid topic regex"));

/// Splits a question-generation completion into individual questions.
///
/// Keeps non-empty lines, strips list numbering, drops heading-like lines
/// ending in a colon, and keeps at most `limit` questions.
pub fn parse_questions(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| LIST_MARKER.replace(l, "").trim().to_string())
        .filter(|l| !l.is_empty() && !l.ends_with(':'))
        .take(limit)
        .collect()
}

/// `"[SQL] What is a join?"` → `"SQL"`; anything else → `"General"`.
pub fn topic_of(question: &str) -> String {
    TOPIC
        .captures(question)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "General".to_string())
}

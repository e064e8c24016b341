//! Score extraction from free-text model analysis, plus aggregation.
//!
//! Parsing is fallible (`parse_score`); substituting the neutral default is a
//! separate, explicit step (`resolve_score`) that records where the number
//! came from.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::turn::{InterviewTurn, ScoreSource};

pub const MIN_SCORE: f32 = 0.0;
pub const MAX_SCORE: f32 = 10.0;
/// Used whenever no score can be read. Sits at the follow-up threshold so a
/// missing score never triggers a follow-up on its own.
pub const DEFAULT_SCORE: f32 = 5.0;
/// Scores strictly below this get one follow-up question.
pub const FOLLOW_UP_THRESHOLD: f32 = 5.0;

/// "Score: 8", "score - 7.5", "Technical accuracy score: 9/10"
static LABELED_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bscore\b[^0-9\n]{0,20}?(\d+(?:\.\d+)?)").expect("invalid score regex")
});
/// "8/10", "7.5 / 10"
static OUT_OF_TEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*10\b").expect("invalid out-of-ten regex")
});
static ANY_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\b").expect("invalid number regex"));
/// Scale labels echoed back from the prompt: "(0-10)", "[0-10]", "0 to 10".
static RANGE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[(\[]?[ \t]*\d+(?:\.\d+)?[ \t]*(?:-|to)[ \t]*\d+(?:\.\d+)?[ \t]*[)\]]?")
        .expect("invalid range label regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreParseError {
    #[error("no numeric score found in model output")]
    NoScore,
}

/// Best-effort score extraction, clamped to 0–10.
///
/// Range labels such as "(0-10)" are removed first. Then looks for, in order:
/// a number following the word "score", a number written as "N/10", then the
/// first number anywhere in the text.
pub fn parse_score(text: &str) -> Result<f32, ScoreParseError> {
    let text = RANGE_LABEL.replace_all(text, " ");
    [&*LABELED_SCORE, &*OUT_OF_TEN, &*ANY_NUMBER]
        .iter()
        .find_map(|re| {
            re.captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<f32>().ok())
        })
        .map(|n| n.clamp(MIN_SCORE, MAX_SCORE))
        .ok_or(ScoreParseError::NoScore)
}

/// The default-score policy: a failed parse becomes `DEFAULT_SCORE`, tagged
/// as `Defaulted` so callers can see it was not the model's number.
pub fn resolve_score(parsed: Result<f32, ScoreParseError>) -> (f32, ScoreSource) {
    match parsed {
        Ok(score) => (score, ScoreSource::Parsed),
        Err(_) => (DEFAULT_SCORE, ScoreSource::Defaulted),
    }
}

/// Everything read out of one analysis completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: f32,
    pub score_source: ScoreSource,
    pub feedback: String,
    pub satisfactory: Option<bool>,
    pub analysis: String,
}

impl Assessment {
    /// Stand-in used when the analysis call did not return at all.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            score: DEFAULT_SCORE,
            score_source: ScoreSource::AnalysisFailed,
            feedback: format!("Analysis unavailable: {reason}"),
            satisfactory: None,
            analysis: String::new(),
        }
    }

    pub fn needs_follow_up(&self) -> bool {
        self.score < FOLLOW_UP_THRESHOLD
    }
}

/// Reads score, `Satisfactory:` and `Feedback:` lines from an analysis.
/// Missing feedback falls back to the whole (trimmed) analysis text.
pub fn parse_assessment(text: &str) -> Assessment {
    let (score, score_source) = resolve_score(parse_score(text));

    let mut feedback = None;
    let mut satisfactory = None;
    for line in text.lines().map(str::trim) {
        if let Some(rest) = strip_label(line, "feedback") {
            if feedback.is_none() && !rest.is_empty() {
                feedback = Some(rest.to_string());
            }
        } else if let Some(rest) = strip_label(line, "satisfactory") {
            satisfactory = match rest.to_ascii_lowercase().as_str() {
                "true" | "yes" => Some(true),
                "false" | "no" => Some(false),
                _ => satisfactory,
            };
        }
    }

    Assessment {
        score,
        score_source,
        feedback: feedback.unwrap_or_else(|| text.trim().to_string()),
        satisfactory,
        analysis: text.trim().to_string(),
    }
}

/// `"Feedback: good"` with label `feedback` → `Some("good")`. Case-insensitive,
/// tolerates markdown bold around the label.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let line = line.trim_start_matches('*').trim_start();
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    let rest = line[label.len()..].trim_start_matches('*').trim_start();
    rest.strip_prefix(':')
        .map(|r| r.trim().trim_start_matches('*').trim())
}

/// Arithmetic mean of all turn scores; 0.0 for an empty interview.
pub fn aggregate_score(turns: &[InterviewTurn]) -> f64 {
    if turns.is_empty() {
        return 0.0;
    }
    turns.iter().map(|t| t.score as f64).sum::<f64>() / turns.len() as f64
}

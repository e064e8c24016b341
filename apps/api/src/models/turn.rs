use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a turn's score came from. Makes the default-score policy visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Read out of the model's analysis text.
    Parsed,
    /// The analysis text had no usable score; the neutral default was used.
    Defaulted,
    /// The analysis call itself failed; the neutral default was used.
    AnalysisFailed,
}

impl ScoreSource {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreSource::Parsed => "parsed",
            ScoreSource::Defaulted => "default: no score in analysis",
            ScoreSource::AnalysisFailed => "default: analysis unavailable",
        }
    }
}

/// One answered question. Appended to the session and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewTurn {
    pub question: String,
    pub response: String,
    /// 0.0 – 10.0
    pub score: f32,
    pub score_source: ScoreSource,
    pub feedback: String,
    /// Full model analysis text. Added to the summary prompt's transcript when
    /// it says more than `feedback`.
    pub analysis: Option<String>,
    pub satisfactory: Option<bool>,
    pub is_follow_up: bool,
    pub answered_at: DateTime<Utc>,
}

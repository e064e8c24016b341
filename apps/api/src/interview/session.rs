use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::interview::scoring::aggregate_score;
use crate::models::profile::CandidateProfile;
use crate::models::turn::InterviewTurn;

/// Responses that end the interview instead of being analyzed.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "end interview"];

/// A named point in the interview flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CollectingProfile,
    GeneratingQuestions,
    /// A planned question is shown; waiting for the candidate's answer.
    AwaitingResponse,
    /// An answer is being (or has been) scored.
    Analyzing,
    /// A follow-up is being generated or is shown and waiting for an answer.
    FollowUp,
    NextQuestion,
    Summarizing,
    Done,
}

impl Stage {
    /// Position inside one question's cycle. `FollowUp` shares a rank with
    /// `AwaitingResponse` because both wait for an answer.
    fn rank(&self) -> u8 {
        match self {
            Stage::CollectingProfile => 0,
            Stage::GeneratingQuestions => 1,
            Stage::AwaitingResponse | Stage::FollowUp => 2,
            Stage::Analyzing => 3,
            Stage::NextQuestion => 4,
            Stage::Summarizing => 5,
            Stage::Done => 6,
        }
    }

    fn phase(&self) -> u8 {
        match self {
            Stage::CollectingProfile | Stage::GeneratingQuestions => 0,
            Stage::AwaitingResponse | Stage::Analyzing | Stage::FollowUp | Stage::NextQuestion => 1,
            Stage::Summarizing => 2,
            Stage::Done => 3,
        }
    }

    /// Stages where the candidate is expected to type something.
    pub fn is_candidate_facing(&self) -> bool {
        matches!(
            self,
            Stage::CollectingProfile | Stage::AwaitingResponse | Stage::FollowUp
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::CollectingProfile => "collecting_profile",
            Stage::GeneratingQuestions => "generating_questions",
            Stage::AwaitingResponse => "awaiting_response",
            Stage::Analyzing => "analyzing",
            Stage::FollowUp => "follow_up",
            Stage::NextQuestion => "next_question",
            Stage::Summarizing => "summarizing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Everything known about one interview. Transitions take a session by value
/// and hand back the next one; nothing mutates a session in place.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub stage: Stage,
    pub profile: Option<CandidateProfile>,
    pub greeting: Option<String>,
    pub planned_questions: Vec<String>,
    /// Index into `planned_questions` of the question being worked on.
    pub question_index: usize,
    /// Set once the current planned question has had its one follow-up.
    pub follow_up_taken: bool,
    /// The question on screen; `None` while one is being generated.
    pub current_question: Option<String>,
    /// Answer received but not yet turned into a turn.
    pub pending_response: Option<String>,
    pub turns: Vec<InterviewTurn>,
    pub summary: Option<String>,
    /// Frozen aggregate, set when the interview reaches `Done`.
    pub final_score: Option<f64>,
    /// Inline error from the most recent interaction, if it failed.
    pub last_error: Option<String>,
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            stage: Stage::CollectingProfile,
            profile: None,
            greeting: None,
            planned_questions: Vec::new(),
            question_index: 0,
            follow_up_taken: false,
            current_question: None,
            pending_response: None,
            turns: Vec::new(),
            summary: None,
            final_score: None,
            last_error: None,
        }
    }

    /// Running mean of all turn scores, recomputed from the turns every time.
    pub fn aggregate_score(&self) -> f64 {
        aggregate_score(&self.turns)
    }

    /// Lexicographic progress marker. Never decreases across transitions and
    /// strictly increases whenever the stage changes.
    pub fn progress_key(&self) -> (u8, usize, u8, u8) {
        (
            self.stage.phase(),
            self.question_index,
            self.follow_up_taken as u8,
            self.stage.rank(),
        )
    }

    pub fn has_more_planned_questions(&self) -> bool {
        self.question_index + 1 < self.planned_questions.len()
    }

    /// Every question put to the candidate so far, in order.
    pub fn asked_questions(&self) -> Vec<String> {
        self.turns.iter().map(|t| t.question.clone()).collect()
    }
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_exit_keyword(response: &str) -> bool {
    let normalized = response.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

pub fn greeting(profile: &CandidateProfile) -> String {
    format!(
        "Hello {name}!\n\n\
        I'm your technical interview assistant for the {position} position. \
        I'll be conducting a technical assessment based on your experience with {stack}.\n\n\
        The interview will include:\n\
        - Technical questions based on your experience level\n\
        - Feedback on each of your responses\n\
        - A follow-up question when an answer needs more depth\n\n\
        You can end the interview at any time with the \"End Interview\" button, \
        or by typing \"exit\", \"quit\" or \"end interview\".\n\n\
        Let's begin!",
        name = profile.full_name,
        position = profile.position,
        stack = profile.tech_stack_joined(),
    )
}

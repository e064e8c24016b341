//! Prompt Builder: pure functions that fill the interview templates.
//!
//! No validation beyond presence: an empty tech stack or blank response still
//! produces a well-formed prompt, and the model deals with the ambiguity.

use crate::interview::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM, FOLLOW_UP_PROMPT_TEMPLATE, FOLLOW_UP_SYSTEM,
    QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM,
};
use crate::llm_client::{GenerationParams, Prompt};
use crate::models::profile::CandidateProfile;
use crate::models::turn::InterviewTurn;

const NOT_SPECIFIED: &str = "(not specified)";

/// The state slice each kind of prompt needs.
#[derive(Debug, Clone, Copy)]
pub enum PromptRequest<'a> {
    Questions {
        profile: &'a CandidateProfile,
    },
    Analysis {
        question: &'a str,
        response: &'a str,
    },
    FollowUp {
        profile: &'a CandidateProfile,
        question: &'a str,
        response: &'a str,
        prior_questions: &'a [String],
    },
    Summary {
        profile: &'a CandidateProfile,
        turns: &'a [InterviewTurn],
        aggregate: f64,
    },
}

pub fn build_prompt(request: PromptRequest<'_>) -> Prompt {
    match request {
        PromptRequest::Questions { profile } => question_prompt(profile),
        PromptRequest::Analysis { question, response } => analysis_prompt(question, response),
        PromptRequest::FollowUp {
            profile,
            question,
            response,
            prior_questions,
        } => follow_up_prompt(profile, question, response, prior_questions),
        PromptRequest::Summary {
            profile,
            turns,
            aggregate,
        } => summary_prompt(profile, turns, aggregate),
    }
}

pub fn question_prompt(profile: &CandidateProfile) -> Prompt {
    let level = profile.level;
    let user = QUESTION_PROMPT_TEMPLATE
        .replace("{count}", &level.question_count().to_string())
        .replace("{level}", level.as_str())
        .replace("{years}", &profile.experience_years.to_string())
        .replace("{position}", or_unspecified(&profile.position))
        .replace("{tech_stack}", &stack_or_unspecified(profile))
        .replace("{complexity}", level.complexity());

    Prompt {
        system: QUESTION_SYSTEM,
        user,
        params: GenerationParams::CREATIVE,
    }
}

pub fn analysis_prompt(question: &str, response: &str) -> Prompt {
    Prompt {
        system: ANALYSIS_SYSTEM,
        user: ANALYSIS_PROMPT_TEMPLATE
            .replace("{question}", question.trim())
            .replace("{response}", response.trim()),
        params: GenerationParams::PRECISE,
    }
}

pub fn follow_up_prompt(
    profile: &CandidateProfile,
    question: &str,
    response: &str,
    prior_questions: &[String],
) -> Prompt {
    let prior = if prior_questions.is_empty() {
        "- none".to_string()
    } else {
        prior_questions
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Prompt {
        system: FOLLOW_UP_SYSTEM,
        user: FOLLOW_UP_PROMPT_TEMPLATE
            .replace("{tech_stack}", &stack_or_unspecified(profile))
            .replace("{question}", question.trim())
            .replace("{response}", response.trim())
            .replace("{prior_questions}", &prior),
        params: GenerationParams::SHORT_CREATIVE,
    }
}

pub fn summary_prompt(profile: &CandidateProfile, turns: &[InterviewTurn], aggregate: f64) -> Prompt {
    let transcript = if turns.is_empty() {
        "(no questions were answered)".to_string()
    } else {
        turns
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut entry = format!(
                    "{n}. {kind}: {q}\n   Answer: {r}\n   Score: {s:.1}/10 ({src})\n   Feedback: {f}",
                    n = i + 1,
                    kind = if t.is_follow_up { "Follow-up" } else { "Question" },
                    q = t.question,
                    r = t.response,
                    s = t.score,
                    src = t.score_source.label(),
                    f = or_unspecified(&t.feedback),
                );
                // Analysis that says more than the feedback line.
                if let Some(analysis) = t.analysis.as_deref().filter(|a| a.trim() != t.feedback) {
                    entry.push_str(&format!("\n   Analysis: {}", analysis.trim()));
                }
                entry
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Prompt {
        system: SUMMARY_SYSTEM,
        user: SUMMARY_PROMPT_TEMPLATE
            .replace("{name}", or_unspecified(&profile.full_name))
            .replace("{position}", or_unspecified(&profile.position))
            .replace("{years}", &profile.experience_years.to_string())
            .replace("{level}", profile.level.as_str())
            .replace("{tech_stack}", &stack_or_unspecified(profile))
            .replace("{question_count}", &turns.len().to_string())
            .replace("{aggregate}", &format!("{aggregate:.1}"))
            .replace("{transcript}", &transcript),
        params: GenerationParams::PRECISE,
    }
}

fn stack_or_unspecified(profile: &CandidateProfile) -> String {
    if profile.tech_stack.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        profile.tech_stack_joined()
    }
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

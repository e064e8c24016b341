//! Flow Controller: turns user actions into model calls and machine events.
//!
//! Each public function handles one user action (start, answer, continue,
//! end) and then "settles" the session: it keeps running whatever model step
//! the current stage is waiting on until the session needs the user again or
//! a model call fails. Failures never abort the action; they come back as an
//! inline error alongside the session as it stood after the failure.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::machine::{apply, Event, TransitionError};
use crate::interview::prompt_builder::{build_prompt, PromptRequest};
use crate::interview::questions::parse_questions;
use crate::interview::scoring::parse_assessment;
use crate::interview::session::{is_exit_keyword, InterviewSession, Stage};
use crate::interview::validation::validate_candidate;
use crate::llm_client::CompletionModel;
use crate::models::profile::CandidateForm;

/// Result of one user action.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub session: InterviewSession,
    /// Shown inline; the interview itself is still usable.
    pub error: Option<String>,
}

impl Outcome {
    fn new(mut session: InterviewSession, error: Option<String>) -> Self {
        session.last_error = error.clone();
        Self { session, error }
    }
}

/// "Start Interview": validates the form, greets, and asks the model for the
/// question plan. A failed generation leaves the session in
/// `GeneratingQuestions` so the user can continue to retry.
pub async fn start_interview(
    model: &dyn CompletionModel,
    form: &CandidateForm,
) -> Result<Outcome, AppError> {
    let profile = validate_candidate(form)?;
    info!(
        "Starting interview: level={}, stack=[{}]",
        profile.level,
        profile.tech_stack_joined()
    );

    let session = apply(InterviewSession::new(), Event::ProfileSubmitted(profile))?;
    Ok(settle(model, session).await)
}

/// The candidate answered the question on screen. Exit keywords end the
/// interview instead.
pub async fn submit_response(
    model: &dyn CompletionModel,
    session: InterviewSession,
    response: &str,
) -> Result<Outcome, TransitionError> {
    if is_exit_keyword(response) {
        info!("Session {} ended by exit keyword", session.id);
        return end_interview(model, session).await;
    }
    let session = apply(session, Event::ResponseSubmitted(response.to_string()))?;
    Ok(settle(model, session).await)
}

/// Re-triggers whatever the current stage is waiting on: regenerate the
/// question plan, generate the follow-up, move on after a failed analysis,
/// or regenerate the summary.
pub async fn continue_interview(
    model: &dyn CompletionModel,
    session: InterviewSession,
) -> Result<Outcome, TransitionError> {
    let session = match session.stage {
        Stage::Analyzing if session.pending_response.is_none() => apply(session, Event::Advance)?,
        Stage::GeneratingQuestions | Stage::NextQuestion | Stage::Summarizing => session,
        Stage::FollowUp if session.current_question.is_none() => session,
        stage => {
            return Err(TransitionError::InvalidEvent {
                stage,
                event: "continue",
            })
        }
    };
    Ok(settle(model, session).await)
}

/// "End Interview": jump to the summary. Calling it again while the summary
/// is still missing retries the summary.
pub async fn end_interview(
    model: &dyn CompletionModel,
    session: InterviewSession,
) -> Result<Outcome, TransitionError> {
    let session = if session.stage == Stage::Summarizing {
        session
    } else {
        apply(session, Event::EndRequested)?
    };
    Ok(settle(model, session).await)
}

/// Runs pending model steps until the session waits on the user or a step fails.
async fn settle(model: &dyn CompletionModel, mut session: InterviewSession) -> Outcome {
    loop {
        let step = match session.stage {
            Stage::GeneratingQuestions => generate_questions(model, session).await,
            Stage::Analyzing if session.pending_response.is_some() => {
                analyze_response(model, session).await
            }
            Stage::FollowUp if session.current_question.is_none() => {
                generate_follow_up(model, session).await
            }
            Stage::NextQuestion => Step::Continue(advance(session)),
            Stage::Summarizing => summarize(model, session).await,
            _ => return Outcome::new(session, None),
        };

        session = match step {
            Step::Continue(next) => next,
            Step::Halt(stalled, error) => return Outcome::new(stalled, Some(error)),
        };
    }
}

enum Step {
    Continue(InterviewSession),
    /// Stop settling and report the error inline.
    Halt(InterviewSession, String),
}

async fn generate_questions(model: &dyn CompletionModel, session: InterviewSession) -> Step {
    let Some(profile) = session.profile.as_ref() else {
        return Step::Halt(session, "No candidate profile on this session".to_string());
    };
    let prompt = build_prompt(PromptRequest::Questions { profile });
    let limit = profile.level.question_count();

    let text = match model.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Question generation failed for session {}: {e}", session.id);
            return Step::Halt(session, format!("Could not generate questions: {e}"));
        }
    };

    let questions = parse_questions(&text, limit);
    info!(
        "Generated {} questions for session {}",
        questions.len(),
        session.id
    );
    match apply(session.clone(), Event::QuestionsGenerated(questions)) {
        Ok(next) => Step::Continue(next),
        Err(e) => Step::Halt(session, e.to_string()),
    }
}

async fn analyze_response(model: &dyn CompletionModel, session: InterviewSession) -> Step {
    let question = session.current_question.as_deref().unwrap_or_default();
    let response = session.pending_response.as_deref().unwrap_or_default();
    let prompt = build_prompt(PromptRequest::Analysis { question, response });

    match model.complete(&prompt).await {
        Ok(text) => {
            let assessment = parse_assessment(&text);
            info!(
                "Session {} turn {} scored {:.1} ({:?})",
                session.id,
                session.turns.len() + 1,
                assessment.score,
                assessment.score_source
            );
            transition(session, Event::AnalysisCompleted(assessment))
        }
        Err(e) => {
            warn!("Analysis failed for session {}: {e}", session.id);
            let error = format!("Could not analyze the response: {e}");
            match apply(session.clone(), Event::AnalysisFailed(e.to_string())) {
                Ok(recorded) => Step::Halt(recorded, error),
                Err(te) => Step::Halt(session, te.to_string()),
            }
        }
    }
}

async fn generate_follow_up(model: &dyn CompletionModel, session: InterviewSession) -> Step {
    let (Some(profile), Some(last)) = (session.profile.as_ref(), session.turns.last()) else {
        return Step::Halt(session, "Nothing to follow up on".to_string());
    };
    let prior = session.asked_questions();
    let prompt = build_prompt(PromptRequest::FollowUp {
        profile,
        question: &last.question,
        response: &last.response,
        prior_questions: &prior,
    });

    match model.complete(&prompt).await {
        Ok(text) => transition(session, Event::FollowUpGenerated(text)),
        Err(e) => {
            warn!("Follow-up generation failed for session {}: {e}", session.id);
            Step::Halt(session, format!("Could not generate a follow-up question: {e}"))
        }
    }
}

fn advance(session: InterviewSession) -> InterviewSession {
    // NextQuestion always accepts Advance.
    apply(session.clone(), Event::Advance).unwrap_or(session)
}

async fn summarize(model: &dyn CompletionModel, session: InterviewSession) -> Step {
    let Some(profile) = session.profile.as_ref() else {
        return Step::Halt(session, "No candidate profile on this session".to_string());
    };
    let aggregate = session.aggregate_score();
    let prompt = build_prompt(PromptRequest::Summary {
        profile,
        turns: &session.turns,
        aggregate,
    });

    match model.complete(&prompt).await {
        Ok(text) => {
            info!(
                "Session {} complete: {} turns, aggregate {:.2}",
                session.id,
                session.turns.len(),
                aggregate
            );
            transition(session, Event::SummaryGenerated(text.trim().to_string()))
        }
        Err(e) => {
            warn!("Summary generation failed for session {}: {e}", session.id);
            Step::Halt(session, format!("Could not generate the summary: {e}"))
        }
    }
}

fn transition(session: InterviewSession, event: Event) -> Step {
    match apply(session.clone(), event) {
        Ok(next) => Step::Continue(next),
        Err(e) => Step::Halt(session, e.to_string()),
    }
}

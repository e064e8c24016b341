//! Interview state machine: pure `(session, event) → session` transitions.
//!
//! No I/O happens here. The controller performs model calls and feeds their
//! results back in as events, so every rule about what may happen next lives
//! in this one function and can be tested without a model.
//!
//! Flow:
//! CollectingProfile → GeneratingQuestions → AwaitingResponse → Analyzing
//!   → FollowUp → Analyzing → NextQuestion → AwaitingResponse → …
//!   → Summarizing → Done

use chrono::Utc;
use thiserror::Error;

use crate::interview::scoring::Assessment;
use crate::interview::session::{greeting, InterviewSession, Stage};
use crate::models::profile::CandidateProfile;
use crate::models::turn::InterviewTurn;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ProfileSubmitted(CandidateProfile),
    /// Already split into individual questions.
    QuestionsGenerated(Vec<String>),
    ResponseSubmitted(String),
    AnalysisCompleted(Assessment),
    /// The analysis call failed; carries the error shown to the user.
    AnalysisFailed(String),
    FollowUpGenerated(String),
    /// Move past a settled `Analyzing` (after a failed analysis) or out of
    /// `NextQuestion` onto the next planned question.
    Advance,
    EndRequested,
    SummaryGenerated(String),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ProfileSubmitted(_) => "profile_submitted",
            Event::QuestionsGenerated(_) => "questions_generated",
            Event::ResponseSubmitted(_) => "response_submitted",
            Event::AnalysisCompleted(_) => "analysis_completed",
            Event::AnalysisFailed(_) => "analysis_failed",
            Event::FollowUpGenerated(_) => "follow_up_generated",
            Event::Advance => "advance",
            Event::EndRequested => "end_requested",
            Event::SummaryGenerated(_) => "summary_generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("'{event}' is not allowed while the interview is in stage '{stage}'")]
    InvalidEvent { stage: Stage, event: &'static str },

    #[error("Response cannot be empty")]
    EmptyResponse,

    #[error("The model did not return any usable questions")]
    NoQuestions,
}

/// Applies one event. On error the caller still owns its previous session,
/// since this function only consumes the copy it was given.
pub fn apply(session: InterviewSession, event: Event) -> Result<InterviewSession, TransitionError> {
    let mut next = session;
    let invalid = |stage: Stage, event: &Event| TransitionError::InvalidEvent {
        stage,
        event: event.name(),
    };

    match (next.stage, event) {
        (Stage::CollectingProfile, Event::ProfileSubmitted(profile)) => {
            next.greeting = Some(greeting(&profile));
            next.profile = Some(profile);
            next.stage = Stage::GeneratingQuestions;
        }

        (Stage::GeneratingQuestions, Event::QuestionsGenerated(questions)) => {
            if questions.is_empty() {
                return Err(TransitionError::NoQuestions);
            }
            next.current_question = questions.first().cloned();
            next.planned_questions = questions;
            next.question_index = 0;
            next.follow_up_taken = false;
            next.stage = Stage::AwaitingResponse;
        }

        (Stage::AwaitingResponse | Stage::FollowUp, Event::ResponseSubmitted(response))
            if next.current_question.is_some() =>
        {
            let response = response.trim();
            if response.is_empty() {
                return Err(TransitionError::EmptyResponse);
            }
            next.pending_response = Some(response.to_string());
            next.stage = Stage::Analyzing;
        }

        (Stage::Analyzing, Event::AnalysisCompleted(assessment))
            if next.pending_response.is_some() =>
        {
            let needs_follow_up = assessment.needs_follow_up();
            record_turn(&mut next, assessment);
            next = branch_after_turn(next, needs_follow_up);
        }

        (Stage::Analyzing, Event::AnalysisFailed(reason)) if next.pending_response.is_some() => {
            // Turn is kept with the neutral score; stage stays put until the
            // user continues.
            record_turn(&mut next, Assessment::unavailable(&reason));
        }

        (Stage::Analyzing, Event::Advance) if next.pending_response.is_none() => {
            next = branch_after_turn(next, false);
        }

        (Stage::FollowUp, Event::FollowUpGenerated(question)) if next.current_question.is_none() => {
            let question = question.trim();
            next.current_question = Some(if question.is_empty() {
                "Could you expand on your previous answer with a concrete example?".to_string()
            } else {
                question.to_string()
            });
        }

        (Stage::NextQuestion, Event::Advance) => {
            next.question_index += 1;
            next.follow_up_taken = false;
            next.current_question = next.planned_questions.get(next.question_index).cloned();
            next.stage = if next.current_question.is_some() {
                Stage::AwaitingResponse
            } else {
                Stage::Summarizing
            };
        }

        (
            Stage::GeneratingQuestions
            | Stage::AwaitingResponse
            | Stage::Analyzing
            | Stage::FollowUp
            | Stage::NextQuestion,
            Event::EndRequested,
        ) => {
            next.current_question = None;
            next.pending_response = None;
            next.stage = Stage::Summarizing;
        }

        (Stage::Summarizing, Event::SummaryGenerated(summary)) => {
            next.final_score = Some(next.aggregate_score());
            next.summary = Some(summary);
            next.stage = Stage::Done;
        }

        (stage, event) => return Err(invalid(stage, &event)),
    }

    Ok(next)
}

fn record_turn(session: &mut InterviewSession, assessment: Assessment) {
    let response = session.pending_response.take().unwrap_or_default();
    let question = session.current_question.clone().unwrap_or_default();
    session.turns.push(InterviewTurn {
        question,
        response,
        score: assessment.score,
        score_source: assessment.score_source,
        feedback: assessment.feedback,
        analysis: (!assessment.analysis.is_empty()).then_some(assessment.analysis),
        satisfactory: assessment.satisfactory,
        is_follow_up: session.follow_up_taken,
        answered_at: Utc::now(),
    });
}

/// At most one follow-up per planned question; otherwise move on, or wrap up
/// once the plan is exhausted.
fn branch_after_turn(mut session: InterviewSession, wants_follow_up: bool) -> InterviewSession {
    if wants_follow_up && !session.follow_up_taken {
        session.follow_up_taken = true;
        session.current_question = None;
        session.stage = Stage::FollowUp;
    } else if session.has_more_planned_questions() {
        session.current_question = None;
        session.stage = Stage::NextQuestion;
    } else {
        session.current_question = None;
        session.stage = Stage::Summarizing;
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::scoring::{parse_assessment, DEFAULT_SCORE};
    use crate::models::profile::ExperienceLevel;
    use crate::models::turn::ScoreSource;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            full_name: "Chris Park".to_string(),
            email: "chris@example.com".to_string(),
            phone: "5550101".to_string(),
            experience_years: 2,
            position: "Backend Engineer".to_string(),
            location: None,
            tech_stack: vec!["Python".to_string(), "SQL".to_string()],
            level: ExperienceLevel::Junior,
        }
    }

    fn started(questions: &[&str]) -> InterviewSession {
        let s = apply(InterviewSession::new(), Event::ProfileSubmitted(profile())).unwrap();
        apply(
            s,
            Event::QuestionsGenerated(questions.iter().map(|q| q.to_string()).collect()),
        )
        .unwrap()
    }

    fn answer(s: InterviewSession, text: &str, analysis: &str) -> InterviewSession {
        let s = apply(s, Event::ResponseSubmitted(text.to_string())).unwrap();
        apply(s, Event::AnalysisCompleted(parse_assessment(analysis))).unwrap()
    }

    /// Applies an event and checks the progress key never goes backwards.
    fn step(s: InterviewSession, event: Event) -> Result<InterviewSession, TransitionError> {
        let before = s.progress_key();
        let before_stage = s.stage;
        let after = apply(s, event)?;
        assert!(after.progress_key() >= before);
        if after.stage != before_stage {
            assert!(
                after.progress_key() > before,
                "{before_stage} -> {} did not advance",
                after.stage
            );
        }
        Ok(after)
    }

    #[test]
    fn test_profile_then_questions_reaches_awaiting_response() {
        let s = started(&["[Python] What is a list comprehension?", "[SQL] What is a join?"]);
        assert_eq!(s.stage, Stage::AwaitingResponse);
        assert_eq!(
            s.current_question.as_deref(),
            Some("[Python] What is a list comprehension?")
        );
        assert!(s.greeting.as_deref().unwrap().contains("Chris Park"));
    }

    #[test]
    fn test_empty_question_list_is_rejected() {
        let s = apply(InterviewSession::new(), Event::ProfileSubmitted(profile())).unwrap();
        assert_eq!(
            apply(s, Event::QuestionsGenerated(vec![])).unwrap_err(),
            TransitionError::NoQuestions
        );
    }

    #[test]
    fn test_good_answer_moves_to_next_question() {
        let s = started(&["q1", "q2"]);
        let s = answer(s, "a solid answer", "Score: 8/10, good explanation");
        assert_eq!(s.stage, Stage::NextQuestion);
        assert_eq!(s.turns.len(), 1);
        assert_eq!(s.turns[0].score, 8.0);

        let s = apply(s, Event::Advance).unwrap();
        assert_eq!(s.stage, Stage::AwaitingResponse);
        assert_eq!(s.current_question.as_deref(), Some("q2"));
    }

    #[test]
    fn test_weak_answer_gets_exactly_one_follow_up() {
        let s = started(&["q1", "q2"]);
        let s = answer(s, "no idea", "Score: 2\nFeedback: Incorrect.");
        assert_eq!(s.stage, Stage::FollowUp);
        assert!(s.current_question.is_none());

        let s = apply(s, Event::FollowUpGenerated("Why would q1 matter?".to_string())).unwrap();
        assert_eq!(s.stage, Stage::FollowUp);

        // Second weak answer on the same planned question does not loop again.
        let s = answer(s, "still unsure", "Score: 1");
        assert_eq!(s.stage, Stage::NextQuestion);
        assert_eq!(s.turns.len(), 2);
        assert!(!s.turns[0].is_follow_up);
        assert!(s.turns[1].is_follow_up);
        assert_eq!(s.turns[1].question, "Why would q1 matter?");
    }

    #[test]
    fn test_last_question_goes_to_summarizing_then_done() {
        let s = started(&["only question"]);
        let s = answer(s, "answer", "Score: 9");
        assert_eq!(s.stage, Stage::Summarizing);

        let s = apply(s, Event::SummaryGenerated("Strong hire".to_string())).unwrap();
        assert_eq!(s.stage, Stage::Done);
        assert_eq!(s.final_score, Some(9.0));
        assert_eq!(s.summary.as_deref(), Some("Strong hire"));
    }

    #[test]
    fn test_unparseable_analysis_records_default_score() {
        let s = started(&["q1", "q2"]);
        let s = answer(s, "answer", "Looks fine to me.");
        assert_eq!(s.turns[0].score, DEFAULT_SCORE);
        assert_eq!(s.turns[0].score_source, ScoreSource::Defaulted);
        assert_eq!(s.stage, Stage::NextQuestion);
    }

    #[test]
    fn test_analysis_failure_records_turn_and_stays_analyzing() {
        let s = started(&["q1", "q2"]);
        let s = apply(s, Event::ResponseSubmitted("my answer".to_string())).unwrap();
        let s = apply(s, Event::AnalysisFailed("connection reset".to_string())).unwrap();

        assert_eq!(s.stage, Stage::Analyzing);
        assert_eq!(s.turns.len(), 1);
        assert_eq!(s.turns[0].score, DEFAULT_SCORE);
        assert_eq!(s.turns[0].score_source, ScoreSource::AnalysisFailed);
        assert!(s.pending_response.is_none());

        // A late analysis result cannot double-record the turn.
        let err = apply(s.clone(), Event::AnalysisCompleted(parse_assessment("Score: 9")))
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidEvent { .. }));

        let s = apply(s, Event::Advance).unwrap();
        assert_eq!(s.stage, Stage::NextQuestion);
    }

    #[test]
    fn test_empty_response_rejected() {
        let s = started(&["q1"]);
        assert_eq!(
            apply(s, Event::ResponseSubmitted("   ".to_string())).unwrap_err(),
            TransitionError::EmptyResponse
        );
    }

    #[test]
    fn test_response_rejected_while_follow_up_not_ready() {
        let s = started(&["q1"]);
        let s = answer(s, "x", "Score: 0");
        assert_eq!(s.stage, Stage::FollowUp);
        let err = apply(s, Event::ResponseSubmitted("eager".to_string())).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidEvent { .. }));
    }

    #[test]
    fn test_end_requested_mid_interview() {
        let s = started(&["q1", "q2", "q3"]);
        let s = answer(s, "a", "Score: 7");
        let s = apply(s, Event::EndRequested).unwrap();
        assert_eq!(s.stage, Stage::Summarizing);
        assert!(s.current_question.is_none());
        let s = apply(s, Event::SummaryGenerated(String::new())).unwrap();
        assert_eq!(s.final_score, Some(7.0));
    }

    #[test]
    fn test_end_before_any_answer_has_zero_aggregate() {
        let s = started(&["q1"]);
        let s = apply(s, Event::EndRequested).unwrap();
        let s = apply(s, Event::SummaryGenerated("nothing to say".to_string())).unwrap();
        assert_eq!(s.final_score, Some(0.0));
    }

    #[test]
    fn test_done_is_absorbing() {
        let s = started(&["q1"]);
        let s = answer(s, "a", "Score: 6");
        let done = apply(s, Event::SummaryGenerated("ok".to_string())).unwrap();

        let events = vec![
            Event::ProfileSubmitted(profile()),
            Event::QuestionsGenerated(vec!["again".to_string()]),
            Event::ResponseSubmitted("more".to_string()),
            Event::AnalysisCompleted(parse_assessment("Score: 3")),
            Event::AnalysisFailed("x".to_string()),
            Event::FollowUpGenerated("f".to_string()),
            Event::Advance,
            Event::EndRequested,
            Event::SummaryGenerated("again".to_string()),
        ];
        for event in events {
            let name = event.name();
            let err = apply(done.clone(), event).unwrap_err();
            assert_eq!(
                err,
                TransitionError::InvalidEvent {
                    stage: Stage::Done,
                    event: name
                }
            );
        }
    }

    #[test]
    fn test_progress_is_monotonic_through_full_interview() {
        let s = step(InterviewSession::new(), Event::ProfileSubmitted(profile())).unwrap();
        let s = step(
            s,
            Event::QuestionsGenerated(vec!["q1".into(), "q2".into(), "q3".into()]),
        )
        .unwrap();
        // q1: weak, follow-up, then ok
        let s = step(s, Event::ResponseSubmitted("meh".into())).unwrap();
        let s = step(s, Event::AnalysisCompleted(parse_assessment("Score: 2"))).unwrap();
        let s = step(s, Event::FollowUpGenerated("follow".into())).unwrap();
        let s = step(s, Event::ResponseSubmitted("better".into())).unwrap();
        let s = step(s, Event::AnalysisCompleted(parse_assessment("Score: 6"))).unwrap();
        let s = step(s, Event::Advance).unwrap();
        // q2: analysis fails, user continues
        let s = step(s, Event::ResponseSubmitted("answer".into())).unwrap();
        let s = step(s, Event::AnalysisFailed("timeout".into())).unwrap();
        let s = step(s, Event::Advance).unwrap();
        let s = step(s, Event::Advance).unwrap();
        // q3: good, wraps up
        let s = step(s, Event::ResponseSubmitted("great".into())).unwrap();
        let s = step(s, Event::AnalysisCompleted(parse_assessment("Score: 10"))).unwrap();
        assert_eq!(s.stage, Stage::Summarizing);
        let s = step(s, Event::SummaryGenerated("done".into())).unwrap();

        assert_eq!(s.stage, Stage::Done);
        assert_eq!(s.turns.len(), 4);
        // (2 + 6 + 5 + 10) / 4
        assert_eq!(s.final_score, Some(5.75));
    }

    #[test]
    fn test_aggregate_is_recomputable_by_replay() {
        let s = started(&["q1", "q2"]);
        let s = answer(s, "a", "Score: 4");
        let s = apply(s, Event::FollowUpGenerated("f".into())).unwrap();
        let s = answer(s, "b", "Score: 7");
        let replayed: f64 =
            s.turns.iter().map(|t| t.score as f64).sum::<f64>() / s.turns.len() as f64;
        assert_eq!(s.aggregate_score(), replayed);
    }

    #[test]
    fn test_invalid_event_leaves_caller_copy_untouched() {
        let s = started(&["q1"]);
        let before = s.clone();
        assert!(apply(s.clone(), Event::SummaryGenerated("x".into())).is_err());
        assert_eq!(s.stage, before.stage);
        assert_eq!(s.turns.len(), before.turns.len());
    }
}

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::controller::{
    continue_interview, end_interview, start_interview, submit_response, Outcome,
};
use crate::interview::questions::topic_of;
use crate::interview::session::{InterviewSession, Stage};
use crate::interview::store::SessionHandle;
use crate::interview::summary::{render_summary, summary_filename};
use crate::models::profile::{CandidateForm, CandidateProfile};
use crate::models::turn::InterviewTurn;
use crate::state::AppState;

/// What the page renders. Internal bookkeeping (pending response, follow-up
/// flag, raw question plan) stays on the server.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub stage: Stage,
    pub profile: Option<CandidateProfile>,
    pub greeting: Option<String>,
    pub current_question: Option<String>,
    pub current_topic: Option<String>,
    /// 1-based position in the question plan; 0 before questions exist.
    pub question_number: usize,
    pub planned_question_count: usize,
    pub turns: Vec<InterviewTurn>,
    pub aggregate_score: f64,
    pub final_score: Option<f64>,
    pub summary: Option<String>,
    pub candidate_facing: bool,
    pub last_error: Option<String>,
}

impl From<&InterviewSession> for SessionView {
    fn from(s: &InterviewSession) -> Self {
        let planned = s.planned_questions.len();
        Self {
            id: s.id,
            stage: s.stage,
            profile: s.profile.clone(),
            greeting: s.greeting.clone(),
            current_question: s.current_question.clone(),
            current_topic: s.current_question.as_deref().map(topic_of),
            question_number: if planned == 0 {
                0
            } else {
                (s.question_index + 1).min(planned)
            },
            planned_question_count: planned,
            turns: s.turns.clone(),
            aggregate_score: s.aggregate_score(),
            final_score: s.final_score,
            summary: s.summary.clone(),
            candidate_facing: s.stage.is_candidate_facing(),
            last_error: s.last_error.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InteractionResponse {
    pub session: SessionView,
    /// Inline error from this interaction; the session is still usable.
    pub error: Option<String>,
}

impl From<&Outcome> for InteractionResponse {
    fn from(outcome: &Outcome) -> Self {
        Self {
            session: SessionView::from(&outcome.session),
            error: outcome.error.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResponseRequest {
    #[serde(default)]
    pub response: String,
}

async fn find(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Interview {id} not found")))
}

/// POST /api/v1/interviews
pub async fn handle_start(
    State(state): State<AppState>,
    Json(form): Json<CandidateForm>,
) -> Result<(StatusCode, Json<InteractionResponse>), AppError> {
    let outcome = start_interview(state.model.as_ref(), &form).await?;
    state.sessions.insert(outcome.session.clone()).await;
    info!(
        "Interview {} created ({} active)",
        outcome.session.id,
        state.sessions.len().await
    );
    Ok((StatusCode::CREATED, Json(InteractionResponse::from(&outcome))))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/interviews/:id/responses
pub async fn handle_respond(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResponseRequest>,
) -> Result<Json<InteractionResponse>, AppError> {
    let handle = find(&state, id).await?;
    let mut session = handle.lock().await;
    let outcome = submit_response(state.model.as_ref(), session.clone(), &req.response).await?;
    *session = outcome.session.clone();
    Ok(Json(InteractionResponse::from(&outcome)))
}

/// POST /api/v1/interviews/:id/continue
pub async fn handle_continue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InteractionResponse>, AppError> {
    let handle = find(&state, id).await?;
    let mut session = handle.lock().await;
    let outcome = continue_interview(state.model.as_ref(), session.clone()).await?;
    *session = outcome.session.clone();
    Ok(Json(InteractionResponse::from(&outcome)))
}

/// POST /api/v1/interviews/:id/end
pub async fn handle_end(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InteractionResponse>, AppError> {
    let handle = find(&state, id).await?;
    let mut session = handle.lock().await;
    let outcome = end_interview(state.model.as_ref(), session.clone()).await?;
    *session = outcome.session.clone();
    Ok(Json(InteractionResponse::from(&outcome)))
}

/// GET /api/v1/interviews/:id/summary
pub async fn handle_download_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = find(&state, id).await?;
    let session = handle.lock().await;
    if session.stage != Stage::Done {
        return Err(AppError::Conflict(format!(
            "The summary is available once the interview has ended (stage '{}')",
            session.stage
        )));
    }

    let filename = summary_filename(&session, Utc::now());
    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, render_summary(&session)))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Interview {id} not found")));
    }
    info!("Interview {id} discarded");
    Ok(StatusCode::NO_CONTENT)
}

//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MAX_TOTAL_QUESTIONS;
use crate::errors::AppError;
use crate::interview::export::{export_filename, render_export};
use crate::interview::machine::{Turn, TurnOutcome};
use crate::interview::phase::Phase;
use crate::interview::profile::CandidateProfile;
use crate::interview::progress::Progress;
use crate::interview::session::{AssessmentResponse, Session};
use crate::interview::store::SessionSlot;
use crate::interview::transcript::TranscriptMessage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub total_questions: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    pub content: String,
}

/// Full read-only snapshot of a session, including the transcript for replay.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub phase: Phase,
    pub progress: Progress,
    pub complete: bool,
    pub consent_given: bool,
    pub candidate: CandidateProfile,
    pub live_summary: String,
    pub q_idx: usize,
    pub total_questions: usize,
    pub current_question: Option<String>,
    pub technical_responses: Vec<AssessmentResponse>,
    pub transcript: Vec<TranscriptMessage>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            phase: session.phase,
            progress: session.progress(),
            complete: session.phase.is_terminal(),
            consent_given: session.consent_given,
            candidate: session.candidate.clone(),
            live_summary: session.candidate.live_summary(),
            q_idx: session.q_idx,
            total_questions: session.total_questions,
            current_question: session.current_question.clone(),
            technical_responses: session.technical_responses.clone(),
            transcript: session.messages.replay().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub phase: Phase,
    pub progress: Progress,
    #[serde(flatten)]
    pub outcome: TurnOutcome,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub phase: Phase,
    pub progress: Progress,
    pub live_summary: String,
    pub candidate: CandidateProfile,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Creates a session and emits the welcome sequence.
pub async fn handle_create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let total_questions = request
        .total_questions
        .unwrap_or(state.config.total_questions);
    if !(1..=MAX_TOTAL_QUESTIONS).contains(&total_questions) {
        return Err(AppError::Validation(format!(
            "total_questions must be between 1 and {MAX_TOTAL_QUESTIONS}"
        )));
    }

    let (_, slot) = state.sessions.create(total_questions).await;
    let mut guard = slot.lock().await;
    let SessionSlot { session, rng } = &mut *guard;
    Turn::new(session, state.assessment.as_ref(), rng).begin();

    Ok((StatusCode::CREATED, Json(SessionView::from(&*session))))
}

/// GET /api/v1/sessions/:id
///
/// Replays the stored transcript. Never triggers a phase handler.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let slot = state.sessions.get(id).await?;
    let guard = slot.lock().await;
    tracing::debug!(
        session_id = %id,
        messages = guard.session.messages.len(),
        "Replaying transcript"
    );
    Ok(Json(SessionView::from(&guard.session)))
}

/// POST /api/v1/sessions/:id/messages
///
/// Submits one candidate input. The session lock is held for the whole turn,
/// including any question generation or evaluation calls.
pub async fn handle_submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let slot = state.sessions.get(id).await?;
    let mut guard = slot.lock().await;
    let SessionSlot { session, rng } = &mut *guard;

    let outcome = Turn::new(session, state.assessment.as_ref(), rng)
        .handle_input(&request.content)
        .await;

    Ok(Json(TurnResponse {
        session_id: id,
        phase: session.phase,
        progress: session.progress(),
        outcome,
    }))
}

/// GET /api/v1/sessions/:id/summary
pub async fn handle_get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryResponse>, AppError> {
    let slot = state.sessions.get(id).await?;
    let guard = slot.lock().await;
    let session = &guard.session;

    Ok(Json(SummaryResponse {
        session_id: id,
        phase: session.phase,
        progress: session.progress(),
        live_summary: session.candidate.live_summary(),
        candidate: session.candidate.clone(),
    }))
}

/// GET /api/v1/sessions/:id/export
///
/// Returns the session as a plain-text attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let slot = state.sessions.get(id).await?;
    let guard = slot.lock().await;

    let now = Utc::now();
    let body = render_export(&guard.session, now);
    let disposition = format!("attachment; filename=\"{}\"", export_filename(now));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

/// POST /api/v1/sessions/:id/reset
///
/// Discards all state and starts over from the welcome sequence.
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let slot = state.sessions.get(id).await?;
    let mut guard = slot.lock().await;
    guard.reset(state.config.total_questions);

    let SessionSlot { session, rng } = &mut *guard;
    Turn::new(session, state.assessment.as_ref(), rng).begin();
    tracing::info!(session_id = %id, "Session reset");

    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

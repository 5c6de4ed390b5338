//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/form parameters via axum extractors,
//! calls into AppState services, and returns JSON (or audio) responses.

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use vox_core::types::Turn;
use vox_speech::adapter::{DEFAULT_LANG, DEFAULT_VOICE};
use vox_speech::AudioEncoding;

use crate::error::ApiError;
use crate::state::AppState;

pub const STATUS_MESSAGE: &str = "AI Voice Assistant Backend Running";

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub query: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TtsForm {
    pub text: String,
    pub lang: Option<String>,
    pub voice: Option<String>,
}

/// An empty form value counts as absent, the way browsers submit untouched
/// fields.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub chat_history: Vec<Turn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub chat_history: Vec<Turn>,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / - liveness check.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: STATUS_MESSAGE.to_string(),
    })
}

/// GET /history - transcript of a session, empty if the session is unknown.
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let session_id = state.session_id_or_default(params.session_id);
    let chat_history = state.sessions.list_turns(&session_id).await;
    Json(HistoryResponse { chat_history })
}

/// POST /ask - answer a query and return the updated transcript.
pub async fn ask(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> Result<Json<AskResponse>, ApiError> {
    if form.query.trim().is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "query must not be empty".to_string(),
        ));
    }
    let session_id = state.session_id_or_default(form.session_id);
    tracing::info!(session_id = %session_id, "Ask request");

    let reply = state.engine.converse(&form.query, &session_id).await?;

    Ok(Json(AskResponse {
        answer: reply.answer,
        chat_history: reply.transcript,
    }))
}

/// POST /tts - synthesize speech and return the raw MP3 bytes.
pub async fn tts(
    State(state): State<AppState>,
    Form(form): Form<TtsForm>,
) -> Result<Response, ApiError> {
    let lang = non_empty(form.lang).unwrap_or_else(|| DEFAULT_LANG.to_string());
    let voice = non_empty(form.voice).unwrap_or_else(|| DEFAULT_VOICE.to_string());

    let audio = state
        .speech
        .text_to_speech(&form.text, &lang, &voice)
        .await
        .map_err(|e| ApiError::Synthesis(e.to_string()))?;

    tracing::debug!(bytes = audio.len(), voice = %voice, "TTS response");

    Ok((
        [(header::CONTENT_TYPE, AudioEncoding::Mp3.mime_type())],
        audio,
    )
        .into_response())
}

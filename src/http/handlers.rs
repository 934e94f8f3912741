use super::state::AppState;
use crate::error::{SessionError, StoreError};
use crate::journal::DreamUpdate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub transcript: String,

    /// Recognizer confidence, used for the quality tags
    pub confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDreamRequest {
    pub transcript: String,

    /// Recognizer confidence (0.0 to 1.0)
    #[serde(default)]
    pub confidence: f32,

    /// Seconds recorded
    #[serde(default)]
    pub duration_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct ListDreamsQuery {
    /// Only the newest `limit` dreams
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn store_error(e: StoreError) -> Response {
    match e {
        StoreError::EmptyTranscript => {
            warn!("Rejected empty transcript");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        StoreError::NotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        StoreError::Repository(_) => {
            error!("Dream store failure: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /analyze
/// Analyze a transcript without saving it
pub async fn analyze_transcript(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let analyzer = state.store.analyzer();
    let analysis = match req.confidence {
        Some(confidence) => analyzer.analyze_with_confidence(&req.transcript, confidence),
        None => analyzer.analyze(&req.transcript),
    };
    (StatusCode::OK, Json(analysis))
}

/// POST /dreams
/// Save a transcript as a new dream
pub async fn create_dream(
    State(state): State<AppState>,
    Json(req): Json<CreateDreamRequest>,
) -> Response {
    match state
        .store
        .add_dream_from_voice(&req.transcript, req.confidence, req.duration_secs)
        .await
    {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /dreams?limit=n
/// List dreams, newest first
pub async fn list_dreams(
    State(state): State<AppState>,
    Query(query): Query<ListDreamsQuery>,
) -> Response {
    let dreams = match query.limit {
        Some(limit) => state.store.recent_dreams(limit).await,
        None => state.store.dreams().await,
    };

    match dreams {
        Ok(dreams) => (StatusCode::OK, Json(dreams)).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /dreams/:dream_id
pub async fn get_dream(State(state): State<AppState>, Path(dream_id): Path<String>) -> Response {
    match state.store.get_dream(&dream_id).await {
        Ok(Some(entry)) => (StatusCode::OK, Json(entry)).into_response(),
        Ok(None) => store_error(StoreError::NotFound(dream_id)),
        Err(e) => store_error(e),
    }
}

/// PATCH /dreams/:dream_id
/// Edit a dream's title or transcript
pub async fn update_dream(
    State(state): State<AppState>,
    Path(dream_id): Path<String>,
    Json(update): Json<DreamUpdate>,
) -> Response {
    match state.store.update_dream(&dream_id, update).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => store_error(e),
    }
}

/// DELETE /dreams/:dream_id
pub async fn delete_dream(
    State(state): State<AppState>,
    Path(dream_id): Path<String>,
) -> Response {
    match state.store.delete_dream(&dream_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => store_error(StoreError::NotFound(dream_id)),
        Err(e) => store_error(e),
    }
}

/// GET /dreams/tag/:tag
/// Dreams carrying a tag, dream sign or emotion
pub async fn dreams_by_tag(State(state): State<AppState>, Path(tag): Path<String>) -> Response {
    match state.store.dreams_by_tag(&tag).await {
        Ok(dreams) => (StatusCode::OK, Json(dreams)).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /insights
pub async fn get_insights(State(state): State<AppState>) -> Response {
    match state.store.insights().await {
        Ok(insights) => (StatusCode::OK, Json(insights)).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /session
/// Current recording session state
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.snapshot()))
}

/// POST /session/start
pub async fn start_session(State(state): State<AppState>) -> Response {
    match state.session.start_recording().await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e @ SessionError::SessionBusy) => error_response(StatusCode::CONFLICT, e.to_string()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// POST /session/stop
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.stop_recording().await))
}

/// POST /session/cancel
pub async fn cancel_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.cancel_recording().await))
}

/// POST /session/clear
pub async fn clear_session(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.session.clear_recording().await))
}

/// POST /session/save
/// Take the completed session's transcript and save it as a dream
pub async fn save_session(State(state): State<AppState>) -> Response {
    let Some(transcript) = state.session.take_committed().await else {
        return error_response(StatusCode::CONFLICT, "No completed recording to save");
    };

    match state.store.save_session(&transcript).await {
        Ok(entry) => {
            info!(dream_id = %entry.id, "Saved recorded dream");
            (StatusCode::CREATED, Json(entry)).into_response()
        }
        Err(e) => {
            error!("Recorded dream was not saved: {:?}", transcript.text);
            store_error(e)
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

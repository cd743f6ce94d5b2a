use super::state::AppState;
use crate::error::PipelineError;
use crate::session::{SessionQuery, SessionStatus};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Search in title/transcript (case-insensitive)
    pub search: Option<String>,

    /// Filter by status name (uploading, transcribing, ...)
    pub status: Option<String>,

    /// 1-indexed page (default: 1)
    pub page: Option<usize>,

    /// Items per page (default: 20)
    pub page_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResummarizeRequest {
    /// Number of summary sentences (default: configured value)
    pub sentence_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a pipeline error to the HTTP status it surfaces as.
fn status_for(error: &PipelineError) -> StatusCode {
    match error {
        PipelineError::NotFound { .. } => StatusCode::NOT_FOUND,
        PipelineError::InvalidState { .. } => StatusCode::BAD_REQUEST,
        PipelineError::UnsupportedFormat { .. } => StatusCode::BAD_REQUEST,
        PipelineError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/sessions
/// Upload an audio file and run the full pipeline synchronously.
///
/// Always answers 201 with the created session; processing failures are
/// reported through the session's `status`/`error_message`, not as HTTP
/// errors, so partial results stay reachable.
pub async fn create_session(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    let filename = field.file_name().unwrap_or("recording.wav").to_string();
                    match field.bytes().await {
                        Ok(bytes) => {
                            upload = Some((filename, bytes.to_vec()));
                            break;
                        }
                        Err(e) => {
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                format!("Could not read upload: {}", e),
                            );
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Malformed multipart body: {}", e),
                );
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'file' field");
    };

    info!("Upload received: {} ({} bytes)", filename, bytes.len());
    let session = state.pipeline.process(&bytes, &filename).await;

    (StatusCode::CREATED, Json(session)).into_response()
}

/// GET /api/sessions
/// List sessions with optional search, status filter, and pagination.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let status = match params.status.as_deref() {
        Some(raw) => match raw.parse::<SessionStatus>() {
            Ok(status) => Some(status),
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
        },
        None => None,
    };

    let query = SessionQuery {
        search: params.search,
        status,
        page: params.page.unwrap_or(1).max(1),
        page_size: params.page_size.unwrap_or(20).clamp(1, 100),
    };

    let page = state.pipeline.list(&query).await;
    (StatusCode::OK, Json(page)).into_response()
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.pipeline.get(&session_id).await {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", session_id),
        ),
    }
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.pipeline.delete(&session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Delete failed for session {}: {}", session_id, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

/// POST /api/sessions/:id/resummarize
/// Re-run summarization on an existing session with different settings.
pub async fn resummarize_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<ResummarizeRequest>,
) -> impl IntoResponse {
    match state
        .pipeline
        .resummarize(&session_id, req.sentence_count)
        .await
    {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => {
            error!("Resummarize failed for session {}: {}", session_id, e);
            error_response(status_for(&e), e.to_string())
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

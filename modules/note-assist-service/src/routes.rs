//! Axum route handlers for the note-assist API.

use crate::assist::AssistProxy;
use crate::dashboard;
use crate::error::AssistError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use note_assist_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub assist: AssistProxy,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(assist: AssistProxy) -> Self {
        Self {
            assist,
            start_time: Instant::now(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::get(dashboard::dashboard))
        .route("/api/ai", axum::routing::post(ai_assist))
        .route("/api/status", axum::routing::get(status))
        .with_state(state)
}

// POST /api/ai
//
// The body is decoded by hand so that any JSON payload is accepted regardless
// of its content type, and so a malformed body maps to the generic 500.
pub async fn ai_assist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AssistResponse>, AssistError> {
    let req: AssistRequest =
        serde_json::from_slice(&body).map_err(|e| AssistError::Parse(e.to_string()))?;

    let resp = state.assist.assist(&req).await?;
    log::info!(
        "[NOTE_ASSIST] Assist served ({} chars, demo={})",
        resp.result.len(),
        resp.is_demo()
    );
    Ok(Json(resp))
}

// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ServiceStatus>) {
    (
        StatusCode::OK,
        Json(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            provider: state.assist.mode(),
            model: state.assist.model().map(String::from),
        }),
    )
}

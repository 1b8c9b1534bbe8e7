use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

use super::SessionPath;

#[derive(Serialize)]
pub struct CreateResponse {
    session_id: Uuid,
}

pub async fn create_handler(State(state): State<Arc<AppState>>) -> Json<CreateResponse> {
    let session_id = state.sessions.create();
    info!(%session_id, "created session");

    Json(CreateResponse { session_id })
}

pub async fn delete_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&path.session_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "session {} not found",
            path.session_id
        )))
    }
}

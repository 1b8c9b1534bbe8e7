use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{error::ApiError, session::SessionStatus, state::AppState};

use super::{SessionPath, find_session};

pub async fn poll_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionStatus>, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    let status = session.lock().poll();

    Ok(Json(status))
}

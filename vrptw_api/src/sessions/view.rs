use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, session::View, state::AppState};

use super::{SessionPath, find_session};

#[derive(Serialize, Deserialize)]
pub struct ViewBody {
    view: View,
}

pub async fn get_view_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    let html = session.lock().render_view();

    html.map(Html)
        .ok_or_else(|| ApiError::NotFound(String::from("nothing to show for the current view")))
}

pub async fn set_view_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<ViewBody>,
) -> Result<Json<ViewBody>, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    session.lock().set_view(body.view);

    Ok(Json(body))
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};
use vrptw_core::map::render_solution_map;

use crate::{error::ApiError, state::AppState};

use super::{SessionPath, find_session};

fn no_solution() -> ApiError {
    ApiError::NotFound(String::from("no solution for this session yet"))
}

pub async fn solution_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    let json = session
        .lock()
        .solution()
        .ok_or_else(no_solution)?
        .to_json()
        .map_err(|err| ApiError::InternalServerError(err.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"solution.json\"",
            ),
        ],
        json,
    ))
}

pub async fn map_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    let solution = session
        .lock()
        .solution()
        .ok_or_else(no_solution)?
        .clone();

    render_solution_map(&solution)
        .map(Html)
        .ok_or_else(|| ApiError::NotFound(String::from("infeasible solutions have no map")))
}

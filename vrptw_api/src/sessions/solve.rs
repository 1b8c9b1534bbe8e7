use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::info;
use vrptw_core::{job::SolveJob, params::SolveParams, request::SolveRequest};

use crate::{error::ApiError, state::AppState};

use super::{SessionPath, find_session};

#[derive(Serialize)]
pub struct SolveResponse {
    customers: usize,
    time_budget_secs: f64,
}

#[derive(Serialize)]
pub struct StopResponse {
    stopped: bool,
}

pub async fn solve_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
    Json(params): Json<SolveParams>,
) -> Result<Json<SolveResponse>, ApiError> {
    let session = find_session(&state, &path.session_id)?;

    let mut locations = session.lock().ensure_can_solve()?.to_vec();
    if params.location_limit > 0 {
        locations.truncate(params.location_limit);
    }

    let request = SolveRequest::new(locations, params)?;
    let response = SolveResponse {
        customers: request.locations().len() - 1,
        time_budget_secs: request.time_budget().as_secs_f64(),
    };

    let job = SolveJob::spawn(Arc::clone(&state.engine), request);
    session.lock().begin_solve(job)?;

    info!(
        session_id = %path.session_id,
        customers = response.customers,
        "started solve"
    );

    Ok(Json(response))
}

pub async fn stop_handler(
    Path(path): Path<SessionPath>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StopResponse>, ApiError> {
    let session = find_session(&state, &path.session_id)?;
    let stopped = session.lock().stop();

    if stopped {
        info!(session_id = %path.session_id, "stopping solve");
    }

    Ok(Json(StopResponse { stopped }))
}

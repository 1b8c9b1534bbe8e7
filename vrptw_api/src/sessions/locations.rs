use std::{fs, sync::Arc};

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use vrptw_core::{
    artifacts::ArtifactScope, loader::load_locations_from_path, location::Location,
};

use crate::{error::ApiError, state::AppState};

use super::{SessionPath, find_session};

#[derive(Deserialize)]
pub struct UploadQuery {
    /// Keeps only the first rows, 0 keeps them all.
    #[serde(default)]
    limit: usize,
}

#[derive(Serialize)]
pub struct LocationsPreview {
    depot: Location,
    num_customers: usize,
    locations: Vec<Location>,
}

pub async fn upload_handler(
    Path(path): Path<SessionPath>,
    Query(query): Query<UploadQuery>,
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<LocationsPreview>, ApiError> {
    let session = find_session(&state, &path.session_id)?;

    let scope = ArtifactScope::new()?;
    fs::write(scope.input_path(), body)?;
    let locations = load_locations_from_path(scope.input_path(), query.limit)?;

    info!(
        session_id = %path.session_id,
        locations = locations.len(),
        "uploaded locations"
    );

    session.lock().set_locations(locations.clone())?;

    Ok(Json(LocationsPreview {
        depot: locations[0].clone(),
        num_customers: locations.len() - 1,
        locations,
    }))
}

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    session::{Session, SessionError},
    state::AppState,
};

pub mod download;
pub mod lifecycle;
pub mod locations;
pub mod poll;
pub mod routes;
pub mod solve;
pub mod view;

#[derive(Deserialize)]
pub struct SessionPath {
    pub session_id: Uuid,
}

pub(crate) fn find_session(
    state: &AppState,
    session_id: &Uuid,
) -> Result<Arc<Mutex<Session>>, ApiError> {
    state
        .sessions
        .get(session_id)
        .ok_or_else(|| ApiError::NotFound(format!("session {session_id} not found")))
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::AlreadySolving => {
                ApiError::Conflict(String::from("a solve is already running for this session"))
            }
            SessionError::NoLocations => {
                ApiError::BadRequest(String::from("upload locations before solving"))
            }
        }
    }
}

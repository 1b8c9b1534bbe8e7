use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use vrptw_core::{error::SolveError, loader::LoadError};

pub enum ApiError {
    BadRequest(String),
    /// Every problem found in an uploaded file.
    Validation(Vec<String>),
    Conflict(String),
    InternalServerError(String),
    NotFound(String),
}

#[derive(Serialize)]
struct ValidationBody {
    errors: Vec<String>,
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::InternalServerError(error.to_string())
    }
}

impl From<LoadError> for ApiError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::Invalid(errors) => {
                ApiError::Validation(errors.iter().map(ToString::to_string).collect())
            }
            LoadError::Read(message) => ApiError::BadRequest(message),
        }
    }
}

impl From<SolveError> for ApiError {
    fn from(error: SolveError) -> Self {
        match error {
            SolveError::InvalidParams(_) | SolveError::InsufficientLocations(_) => {
                ApiError::BadRequest(error.to_string())
            }
            _ => ApiError::InternalServerError(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
            }
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
        }
    }
}

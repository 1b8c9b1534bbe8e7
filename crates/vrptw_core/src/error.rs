use thiserror::Error;
use vrptw_engine::model::ModelError;
use vrptw_matrix::travel_matrices::MatrixError;

use crate::params::InvalidParams;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] InvalidParams),
    #[error("at least 2 locations are needed (1 depot + 1 customer), got {0}")]
    InsufficientLocations(usize),
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("failed to build routing model: {0}")]
    ModelBuild(#[from] ModelError),
    #[error("solver failed: {0}")]
    Engine(String),
    #[error("solve was cancelled")]
    Cancelled,
}

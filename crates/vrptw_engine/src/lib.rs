mod acceptor;
pub mod cancellation;
pub mod model;
pub mod problem;
mod recreate;
mod ruin;
pub mod score;
pub mod solution;
pub mod solver;
pub mod solver_params;

#[cfg(test)]
pub(crate) mod test_utils;

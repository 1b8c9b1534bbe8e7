use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use vrptw_engine::{
    cancellation::CancellationToken,
    model::{Client, Depot, Model, ModelError, VehicleType},
    solver_params::SolverParams,
};

use crate::request::SolveRequest;

/// Coordinates are handed to the engine as integers, in 1e-5 degrees.
pub const COORDINATE_SCALE: f64 = 100_000.0;

/// Edge distances are handed to the engine in hundredths of a mile.
pub const DISTANCE_SCALE: f64 = 100.0;

/// What a routing engine returns: location indices per route, depot excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSolution {
    pub feasible: bool,
    pub cost: Option<f64>,
    pub routes: Vec<Vec<usize>>,
}

impl RawSolution {
    pub fn infeasible() -> Self {
        RawSolution {
            feasible: false,
            cost: None,
            routes: vec![],
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("{0}")]
    Failed(String),
}

/// Anything able to solve a [`Model`] within a time budget.
pub trait RoutingEngine: Send + Sync {
    fn solve(
        &self,
        model: &Model,
        time_budget: SignedDuration,
        cancellation: &CancellationToken,
    ) -> Result<RawSolution, EngineError>;
}

/// Ruin and recreate search from `vrptw_engine`.
#[derive(Debug, Clone)]
pub struct RuinRecreateEngine {
    pub seed: u64,
}

impl Default for RuinRecreateEngine {
    fn default() -> Self {
        RuinRecreateEngine { seed: 42 }
    }
}

impl RoutingEngine for RuinRecreateEngine {
    fn solve(
        &self,
        model: &Model,
        time_budget: SignedDuration,
        cancellation: &CancellationToken,
    ) -> Result<RawSolution, EngineError> {
        let params = SolverParams {
            seed: self.seed,
            ..SolverParams::with_time_limit(time_budget)
        };

        let result = model.solve(params, cancellation)?;

        Ok(RawSolution {
            feasible: result.is_feasible(),
            cost: result.cost().map(|cost| cost as f64),
            routes: result.routes,
        })
    }
}

fn scaled(value: f64, scale: f64) -> i64 {
    (value * scale) as i64
}

/// Translates a request into an engine model.
///
/// Depot and customers share the request's window, each customer takes one
/// unit of capacity, and every directed pair of locations gets an edge with
/// the precomputed distance and duration.
pub fn build_model(request: &SolveRequest) -> Model {
    let locations = request.locations();
    let matrices = request.matrices();
    let window = request.time_window();

    let mut model = Model::new();

    let depot = request.depot();
    let mut nodes = vec![model.add_depot(Depot {
        x: scaled(depot.longitude, COORDINATE_SCALE),
        y: scaled(depot.latitude, COORDINATE_SCALE),
        tw_early: window.start,
        tw_late: window.end,
    })];

    for location in &locations[1..] {
        nodes.push(model.add_client(Client {
            x: scaled(location.longitude, COORDINATE_SCALE),
            y: scaled(location.latitude, COORDINATE_SCALE),
            delivery: 1,
            service_duration: request.service_time(),
            tw_early: window.start,
            tw_late: window.end,
            name: location.name.clone(),
        }));
    }

    model.add_vehicle_type(VehicleType {
        num_available: request.params().num_vehicles,
        capacity: i64::from(request.params().vehicle_capacity),
        max_duration: Some(request.max_route_duration()),
        name: String::from("Vehicle"),
    });

    for (from, &from_node) in nodes.iter().enumerate() {
        for (to, &to_node) in nodes.iter().enumerate().skip(from + 1) {
            let distance = scaled(matrices.distance(from, to), DISTANCE_SCALE);
            let duration = matrices.duration(from, to);

            model.add_edge(from_node, to_node, distance, duration);
            model.add_edge(to_node, from_node, distance, duration);
        }
    }

    debug!(
        clients = model.clients().len(),
        edges = model.edges().len(),
        "built routing model"
    );

    model
}

#[cfg(test)]
mod tests {
    use vrptw_engine::model::Node;

    use super::*;
    use crate::{params::SolveParams, test_utils::rochester_locations};

    #[test]
    fn test_model_shape() {
        let request = SolveRequest::new(rochester_locations(4), SolveParams::default()).unwrap();
        let model = build_model(&request);

        assert_eq!(model.depots().len(), 1);
        assert_eq!(model.clients().len(), 3);
        assert_eq!(model.edges().len(), 4 * 3);

        let vehicle_type = &model.vehicle_types()[0];
        assert_eq!(vehicle_type.num_available, 5);
        assert_eq!(vehicle_type.capacity, 99);
        assert_eq!(vehicle_type.max_duration, Some(480));
    }

    #[test]
    fn test_scaled_coordinates_and_windows() {
        let request = SolveRequest::new(rochester_locations(2), SolveParams::default()).unwrap();
        let model = build_model(&request);

        let depot = &model.depots()[0];
        let location = &request.locations()[0];
        assert_eq!(depot.x, (location.longitude * 100_000.0) as i64);
        assert_eq!(depot.y, (location.latitude * 100_000.0) as i64);
        assert_eq!((depot.tw_early, depot.tw_late), (540, 1020));

        let client = &model.clients()[0];
        assert_eq!(client.delivery, 1);
        assert_eq!(client.service_duration, 60);
        assert_eq!(client.name, request.locations()[1].name);
    }

    #[test]
    fn test_edges_reuse_matrices() {
        let request = SolveRequest::new(rochester_locations(3), SolveParams::default()).unwrap();
        let model = build_model(&request);
        let matrices = request.matrices();

        let edge = model
            .edges()
            .iter()
            .find(|edge| edge.from == Node::Client(1) && edge.to == Node::Depot(0))
            .unwrap();

        assert_eq!(edge.distance, (matrices.distance(2, 0) * 100.0) as i64);
        assert_eq!(edge.duration, matrices.duration(2, 0));
        assert!(model.build().is_ok());
    }

    #[test]
    fn test_engine_surfaces_model_errors() {
        let request = SolveRequest::new(rochester_locations(3), SolveParams::default()).unwrap();
        let mut model = build_model(&request);
        model.add_edge(Node::Depot(0), Node::Client(0), 1, 1);

        let result = RuinRecreateEngine::default().solve(
            &model,
            SignedDuration::from_secs(1),
            &CancellationToken::new(),
        );

        assert!(matches!(
            result,
            Err(EngineError::Model(ModelError::DuplicateEdge { .. }))
        ));
    }
}

use thiserror::Error;
use tracing::debug;

use crate::{
    cancellation::CancellationToken,
    problem::{ClientData, DepotData, Problem, VehicleData},
    solver::{SolveResult, Solver},
    solver_params::SolverParams,
};

/// Handle returned when a depot or client is added to a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Depot(usize),
    Client(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Depot {
    pub x: i64,
    pub y: i64,
    pub tw_early: i64,
    pub tw_late: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub x: i64,
    pub y: i64,
    pub delivery: i64,
    pub service_duration: i64,
    pub tw_early: i64,
    pub tw_late: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleType {
    pub num_available: usize,
    pub capacity: i64,
    /// Upper bound on the time between leaving and returning to the depot.
    pub max_duration: Option<i64>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: Node,
    pub to: Node,
    pub distance: i64,
    pub duration: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("model needs exactly one depot, found {0}")]
    DepotCount(usize),
    #[error("model needs exactly one vehicle type, found {0}")]
    VehicleTypeCount(usize),
    #[error("vehicle type {0} has no available vehicles")]
    NoVehiclesAvailable(String),
    #[error("vehicle type {name} has invalid capacity {capacity}")]
    InvalidCapacity { name: String, capacity: i64 },
    #[error("vehicle type {name} has invalid max duration {max_duration}")]
    InvalidMaxDuration { name: String, max_duration: i64 },
    #[error("{node:?} has an empty time window [{early}, {late}]")]
    InvalidTimeWindow { node: Node, early: i64, late: i64 },
    #[error("{0:?} has a negative delivery or service duration")]
    InvalidClient(Node),
    #[error("edge references unknown node {0:?}")]
    UnknownNode(Node),
    #[error("edge {from:?} -> {to:?} must connect two different nodes")]
    SelfEdge { from: Node, to: Node },
    #[error("edge {from:?} -> {to:?} has a negative distance or duration")]
    NegativeEdge { from: Node, to: Node },
    #[error("edge {from:?} -> {to:?} is defined more than once")]
    DuplicateEdge { from: Node, to: Node },
    #[error("missing edge {from:?} -> {to:?}")]
    MissingEdge { from: Node, to: Node },
}

/// Incremental description of a routing problem.
///
/// Depots are numbered before clients once the model is built, whatever the
/// order they were added in.
#[derive(Debug, Default, Clone)]
pub struct Model {
    depots: Vec<Depot>,
    clients: Vec<Client>,
    vehicle_types: Vec<VehicleType>,
    edges: Vec<Edge>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_depot(&mut self, depot: Depot) -> Node {
        self.depots.push(depot);
        Node::Depot(self.depots.len() - 1)
    }

    pub fn add_client(&mut self, client: Client) -> Node {
        self.clients.push(client);
        Node::Client(self.clients.len() - 1)
    }

    pub fn add_vehicle_type(&mut self, vehicle_type: VehicleType) -> usize {
        self.vehicle_types.push(vehicle_type);
        self.vehicle_types.len() - 1
    }

    pub fn add_edge(&mut self, from: Node, to: Node, distance: i64, duration: i64) {
        self.edges.push(Edge {
            from,
            to,
            distance,
            duration,
        });
    }

    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn num_locations(&self) -> usize {
        self.depots.len() + self.clients.len()
    }

    fn location_index(&self, node: Node) -> Result<usize, ModelError> {
        match node {
            Node::Depot(index) if index < self.depots.len() => Ok(index),
            Node::Client(index) if index < self.clients.len() => Ok(self.depots.len() + index),
            _ => Err(ModelError::UnknownNode(node)),
        }
    }

    fn node_at(&self, location: usize) -> Node {
        if location < self.depots.len() {
            Node::Depot(location)
        } else {
            Node::Client(location - self.depots.len())
        }
    }

    /// Validates the model and compiles it into dense matrices.
    pub fn build(&self) -> Result<Problem, ModelError> {
        if self.depots.len() != 1 {
            return Err(ModelError::DepotCount(self.depots.len()));
        }

        if self.vehicle_types.len() != 1 {
            return Err(ModelError::VehicleTypeCount(self.vehicle_types.len()));
        }

        let vehicle_type = &self.vehicle_types[0];
        if vehicle_type.num_available == 0 {
            return Err(ModelError::NoVehiclesAvailable(vehicle_type.name.clone()));
        }

        if vehicle_type.capacity < 0 {
            return Err(ModelError::InvalidCapacity {
                name: vehicle_type.name.clone(),
                capacity: vehicle_type.capacity,
            });
        }

        if let Some(max_duration) = vehicle_type.max_duration
            && max_duration < 0
        {
            return Err(ModelError::InvalidMaxDuration {
                name: vehicle_type.name.clone(),
                max_duration,
            });
        }

        let depot = &self.depots[0];
        if depot.tw_early > depot.tw_late {
            return Err(ModelError::InvalidTimeWindow {
                node: Node::Depot(0),
                early: depot.tw_early,
                late: depot.tw_late,
            });
        }

        for (index, client) in self.clients.iter().enumerate() {
            if client.tw_early > client.tw_late {
                return Err(ModelError::InvalidTimeWindow {
                    node: Node::Client(index),
                    early: client.tw_early,
                    late: client.tw_late,
                });
            }

            if client.delivery < 0 || client.service_duration < 0 {
                return Err(ModelError::InvalidClient(Node::Client(index)));
            }
        }

        let num_locations = self.num_locations();
        let mut weights: Vec<Option<(i64, i64)>> = vec![None; num_locations * num_locations];

        for edge in &self.edges {
            let from = self.location_index(edge.from)?;
            let to = self.location_index(edge.to)?;

            if from == to {
                return Err(ModelError::SelfEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }

            if edge.distance < 0 || edge.duration < 0 {
                return Err(ModelError::NegativeEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }

            let slot = &mut weights[from * num_locations + to];
            if slot.is_some() {
                return Err(ModelError::DuplicateEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }

            *slot = Some((edge.distance, edge.duration));
        }

        let mut distances = vec![0; num_locations * num_locations];
        let mut durations = vec![0; num_locations * num_locations];

        for from in 0..num_locations {
            for to in 0..num_locations {
                if from == to {
                    continue;
                }

                let (distance, duration) =
                    weights[from * num_locations + to].ok_or(ModelError::MissingEdge {
                        from: self.node_at(from),
                        to: self.node_at(to),
                    })?;

                distances[from * num_locations + to] = distance;
                durations[from * num_locations + to] = duration;
            }
        }

        debug!(
            num_locations,
            num_edges = self.edges.len(),
            "compiled routing model"
        );

        Ok(Problem::new(
            DepotData {
                tw_early: depot.tw_early,
                tw_late: depot.tw_late,
            },
            self.clients
                .iter()
                .map(|client| ClientData {
                    delivery: client.delivery,
                    service_duration: client.service_duration,
                    tw_early: client.tw_early,
                    tw_late: client.tw_late,
                    name: client.name.clone(),
                })
                .collect(),
            VehicleData {
                num_available: vehicle_type.num_available,
                capacity: vehicle_type.capacity,
                max_duration: vehicle_type.max_duration,
            },
            distances,
            durations,
        ))
    }

    /// Builds the model and runs the solver on it.
    pub fn solve(
        &self,
        params: SolverParams,
        cancellation: &CancellationToken,
    ) -> Result<SolveResult, ModelError> {
        let problem = self.build()?;
        Ok(Solver::new(problem, params).solve(cancellation))
    }
}

use crate::model::{Client, Depot, Model, Node, VehicleType};

/// Depot at x = 0 and one client per position, all on a line.
/// Distance and duration both equal the gap between positions.
pub struct LineModel {
    pub positions: Vec<i64>,
    pub num_vehicles: usize,
    pub capacity: i64,
    pub service_duration: i64,
    pub tw_early: i64,
    pub tw_late: i64,
    pub max_duration: Option<i64>,
}

impl LineModel {
    pub fn new(positions: &[i64]) -> Self {
        LineModel {
            positions: positions.to_vec(),
            num_vehicles: 1,
            capacity: positions.len() as i64,
            service_duration: 0,
            tw_early: 0,
            tw_late: 10_000,
            max_duration: None,
        }
    }

    pub fn model(&self) -> Model {
        let mut model = Model::new();
        let depot = model.add_depot(Depot {
            x: 0,
            y: 0,
            tw_early: self.tw_early,
            tw_late: self.tw_late,
        });

        let mut nodes: Vec<(Node, i64)> = vec![(depot, 0)];
        for (index, &x) in self.positions.iter().enumerate() {
            let client = model.add_client(Client {
                x,
                y: 0,
                delivery: 1,
                service_duration: self.service_duration,
                tw_early: self.tw_early,
                tw_late: self.tw_late,
                name: format!("client {index}"),
            });
            nodes.push((client, x));
        }

        model.add_vehicle_type(VehicleType {
            num_available: self.num_vehicles,
            capacity: self.capacity,
            max_duration: self.max_duration,
            name: String::from("vehicle"),
        });

        for &(from, from_x) in &nodes {
            for &(to, to_x) in &nodes {
                if from != to {
                    let gap = (from_x - to_x).abs();
                    model.add_edge(from, to, gap, gap);
                }
            }
        }

        model
    }
}

pub fn create_line_model(positions: &[i64], num_vehicles: usize, capacity: i64) -> Model {
    LineModel {
        num_vehicles,
        capacity,
        ..LineModel::new(positions)
    }
    .model()
}

use jiff::SignedDuration;
use vrptw_engine::{cancellation::CancellationToken, model::Model};

use crate::{
    adapter::{EngineError, RawSolution, RoutingEngine},
    location::Location,
};

const ROCHESTER: [(&str, &str, f64, f64); 8] = [
    ("Depot", "100 State St, Rochester, NY", 43.1566, -77.6088),
    ("Park Ave", "650 Park Ave, Rochester, NY", 43.1474, -77.5835),
    ("Charlotte", "4600 Lake Ave, Rochester, NY", 43.2530, -77.6130),
    ("Brighton", "1500 Monroe Ave, Rochester, NY", 43.1263, -77.5754),
    ("Gates", "2000 Buffalo Rd, Gates, NY", 43.1562, -77.6994),
    ("Irondequoit", "1 Titus Ave, Irondequoit, NY", 43.1980, -77.5840),
    ("Henrietta", "3000 W Henrietta Rd, Henrietta, NY", 43.0790, -77.6283),
    ("Pittsford", "20 N Main St, Pittsford, NY", 43.0906, -77.5150),
];

/// The first `n` of a fixed set of locations around Rochester, NY.
pub fn rochester_locations(n: usize) -> Vec<Location> {
    ROCHESTER
        .iter()
        .take(n)
        .map(|&(name, address, latitude, longitude)| {
            Location::new(name, address, latitude, longitude)
        })
        .collect()
}

/// Returns a fixed solution after an optional delay, or cancels early.
pub struct FixedEngine {
    pub solution: RawSolution,
    pub delay: SignedDuration,
}

impl FixedEngine {
    pub fn new(solution: RawSolution) -> Self {
        FixedEngine {
            solution,
            delay: SignedDuration::ZERO,
        }
    }
}

impl RoutingEngine for FixedEngine {
    fn solve(
        &self,
        _model: &Model,
        _time_budget: SignedDuration,
        cancellation: &CancellationToken,
    ) -> Result<RawSolution, EngineError> {
        let deadline = jiff::Timestamp::now() + self.delay;
        while jiff::Timestamp::now() < deadline {
            if cancellation.is_cancelled() {
                return Ok(RawSolution::infeasible());
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        Ok(self.solution.clone())
    }
}

pub struct FailingEngine;

impl RoutingEngine for FailingEngine {
    fn solve(
        &self,
        _model: &Model,
        _time_budget: SignedDuration,
        _cancellation: &CancellationToken,
    ) -> Result<RawSolution, EngineError> {
        Err(EngineError::Failed(String::from("engine exploded")))
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;
use vrptw_matrix::travel_matrices::TravelMatrices;

use crate::{adapter::RawSolution, location::Location};

/// Suggestions shown when no feasible solution exists.
pub const INFEASIBLE_GUIDANCE: [&str; 6] = [
    "Add more vehicles",
    "Increase vehicle capacity",
    "Extend the time window",
    "Reduce the service time per stop",
    "Solve for fewer locations",
    "Increase the max route duration",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Location indices, depot excluded.
    pub visits: Vec<usize>,
    /// Names along the route, starting and ending at the depot.
    pub locations: Vec<String>,
    /// Miles.
    pub distance: f64,
    /// Minutes, travel plus service.
    pub duration: i64,
}

/// The persisted solution record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub feasible: bool,
    pub cost: Option<f64>,
    pub routes: Vec<RouteSummary>,
    pub num_routes: usize,
    pub total_distance: f64,
    pub total_duration: i64,
    pub locations: Vec<Location>,
}

impl Solution {
    pub fn customers_served(&self) -> usize {
        self.routes.iter().map(|route| route.visits.len()).sum()
    }

    pub fn guidance(&self) -> &'static [&'static str] {
        if self.feasible {
            &[]
        } else {
            &INFEASIBLE_GUIDANCE
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn summarize_route(
    visits: &[usize],
    locations: &[Location],
    matrices: &TravelMatrices,
    service_time: i64,
) -> RouteSummary {
    let mut distance = 0.0;
    let mut duration = 0;

    let mut previous = 0;
    for &visit in visits.iter().chain(std::iter::once(&0)) {
        distance += matrices.distance(previous, visit);
        duration += matrices.duration(previous, visit);
        previous = visit;
    }
    duration += service_time * visits.len() as i64;

    let depot = &locations[0].name;
    let mut names = Vec::with_capacity(visits.len() + 2);
    names.push(depot.clone());
    names.extend(visits.iter().map(|&visit| locations[visit].name.clone()));
    names.push(depot.clone());

    RouteSummary {
        visits: visits.to_vec(),
        locations: names,
        distance,
        duration,
    }
}

/// Turns raw engine routes into the solution record.
///
/// Empty routes are unused vehicles and are dropped. An infeasible verdict
/// yields a record with no routes and zeroed totals.
pub fn aggregate(
    raw: &RawSolution,
    locations: &[Location],
    matrices: &TravelMatrices,
    service_time: i64,
) -> Solution {
    if !raw.feasible {
        return Solution {
            feasible: false,
            cost: None,
            routes: vec![],
            num_routes: 0,
            total_distance: 0.0,
            total_duration: 0,
            locations: locations.to_vec(),
        };
    }

    let routes: Vec<RouteSummary> = raw
        .routes
        .iter()
        .filter(|visits| !visits.is_empty())
        .map(|visits| summarize_route(visits, locations, matrices, service_time))
        .collect();

    let total_distance = routes.iter().map(|route| route.distance).sum();
    let total_duration = routes.iter().map(|route| route.duration).sum();

    debug!(
        num_routes = routes.len(),
        total_distance, total_duration, "aggregated solution"
    );

    Solution {
        feasible: true,
        cost: raw.cost,
        num_routes: routes.len(),
        routes,
        total_distance,
        total_duration,
        locations: locations.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use vrptw_matrix::haversine::{haversine_miles, travel_minutes};

    use super::*;
    use crate::test_utils::rochester_locations;

    fn fixture(n: usize) -> (Vec<Location>, TravelMatrices) {
        let locations = rochester_locations(n);
        let matrices = TravelMatrices::haversine(&locations, 30.0).unwrap();
        (locations, matrices)
    }

    fn feasible(routes: Vec<Vec<usize>>) -> RawSolution {
        RawSolution {
            feasible: true,
            cost: Some(1234.0),
            routes,
        }
    }

    #[test]
    fn test_single_visit_route() {
        let (locations, matrices) = fixture(2);
        let solution = aggregate(&feasible(vec![vec![1]]), &locations, &matrices, 60);

        let leg = haversine_miles(&locations[0], &locations[1]);
        assert_eq!(solution.num_routes, 1);
        assert_eq!(solution.routes[0].locations, vec!["Depot", "Park Ave", "Depot"]);
        assert!((solution.total_distance - 2.0 * leg).abs() < 1e-9);
        assert_eq!(solution.total_duration, 2 * travel_minutes(leg, 30.0) + 60);
    }

    #[test]
    fn test_service_time_once_per_stop() {
        let (locations, matrices) = fixture(4);
        let solution = aggregate(&feasible(vec![vec![1, 2, 3]]), &locations, &matrices, 15);

        let travel = matrices.duration(0, 1)
            + matrices.duration(1, 2)
            + matrices.duration(2, 3)
            + matrices.duration(3, 0);
        assert_eq!(solution.routes[0].duration, travel + 3 * 15);
    }

    #[test]
    fn test_route_path_starts_and_ends_at_depot() {
        let (locations, matrices) = fixture(3);
        let solution = aggregate(&feasible(vec![vec![1, 2]]), &locations, &matrices, 15);

        assert_eq!(
            solution.routes[0].locations,
            vec!["Depot", "Park Ave", "Charlotte", "Depot"]
        );
        assert_eq!(solution.routes[0].visits, vec![1, 2]);
    }

    #[test]
    fn test_empty_routes_are_dropped() {
        let (locations, matrices) = fixture(5);
        let solution = aggregate(
            &feasible(vec![vec![], vec![2, 1], vec![], vec![3, 4]]),
            &locations,
            &matrices,
            30,
        );

        assert_eq!(solution.num_routes, 2);
        assert_eq!(solution.customers_served(), 4);
        assert_eq!(
            solution.total_duration,
            solution.routes[0].duration + solution.routes[1].duration
        );
        assert_eq!(solution.cost, Some(1234.0));
    }

    #[test]
    fn test_infeasible_record() {
        let (locations, matrices) = fixture(4);
        let raw = RawSolution {
            feasible: false,
            cost: Some(99.0),
            routes: vec![vec![1], vec![2]],
        };
        let solution = aggregate(&raw, &locations, &matrices, 30);

        assert!(!solution.feasible);
        assert!(solution.routes.is_empty());
        assert_eq!(solution.cost, None);
        assert_eq!(solution.total_distance, 0.0);
        assert_eq!(solution.total_duration, 0);
        assert_eq!(solution.guidance().len(), 6);
    }

    #[test]
    fn test_json_round_trip() {
        let (locations, matrices) = fixture(6);
        let solution = aggregate(&feasible(vec![vec![3, 1], vec![5, 2, 4]]), &locations, &matrices, 45);

        let parsed = Solution::from_json(&solution.to_json().unwrap()).unwrap();

        assert_eq!(parsed.num_routes, solution.num_routes);
        assert_eq!(parsed.total_duration, solution.total_duration);
        for (parsed, original) in parsed.routes.iter().zip(&solution.routes) {
            assert_eq!(parsed.visits, original.visits);
            assert_eq!(parsed.duration, original.duration);
            assert!((parsed.distance - original.distance).abs() < 1e-9);
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let (locations, matrices) = fixture(6);
        let raw = feasible(vec![vec![3, 1], vec![5, 2, 4]]);

        let first = aggregate(&raw, &locations, &matrices, 45).to_json().unwrap();
        let second = aggregate(&raw, &locations, &matrices, 45).to_json().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_json_shape() {
        let (locations, matrices) = fixture(2);
        let raw = RawSolution::infeasible();
        let value = serde_json::to_value(aggregate(&raw, &locations, &matrices, 60)).unwrap();

        assert_eq!(value["cost"], serde_json::Value::Null);
        assert_eq!(value["locations"][0]["name"], "Depot");
        assert!(value["routes"].as_array().unwrap().is_empty());
    }

    // Customers 1..=7 in random order, each assigned to one of 4 vehicles.
    fn route_split() -> impl Strategy<Value = Vec<Vec<usize>>> {
        (
            Just((1..8).collect::<Vec<usize>>()).prop_shuffle(),
            prop::collection::vec(0..4usize, 7),
        )
            .prop_map(|(customers, vehicles)| {
                let mut routes = vec![vec![]; 4];
                for (customer, vehicle) in customers.into_iter().zip(vehicles) {
                    routes[vehicle].push(customer);
                }
                routes
            })
    }

    proptest! {
        #[test]
        fn prop_aggregation_is_byte_identical(routes in route_split()) {
            let (locations, matrices) = fixture(8);
            let raw = feasible(routes);

            let first = aggregate(&raw, &locations, &matrices, 20).to_json().unwrap();
            let second = aggregate(&raw, &locations, &matrices, 20).to_json().unwrap();

            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_json_round_trip(routes in route_split()) {
            let (locations, matrices) = fixture(8);
            let non_empty = routes.iter().filter(|route| !route.is_empty()).count();
            let solution = aggregate(&feasible(routes), &locations, &matrices, 20);

            let parsed = Solution::from_json(&solution.to_json().unwrap()).unwrap();

            prop_assert_eq!(parsed.num_routes, non_empty);
            prop_assert_eq!(parsed.customers_served(), 7);
            prop_assert_eq!(parsed.total_duration, solution.total_duration);
            for (parsed, original) in parsed.routes.iter().zip(&solution.routes) {
                prop_assert_eq!(&parsed.visits, &original.visits);
                prop_assert_eq!(&parsed.locations, &original.locations);
                prop_assert_eq!(parsed.duration, original.duration);
                prop_assert!((parsed.distance - original.distance).abs() < 1e-9);
            }
        }
    }
}

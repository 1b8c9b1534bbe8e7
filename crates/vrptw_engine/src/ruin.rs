use rand::{Rng, seq::SliceRandom};

use crate::{problem::Problem, solution::working_solution::WorkingSolution};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RuinStrategy {
    /// Removes clients picked uniformly at random.
    Random,
    /// Removes the clients closest to a random client.
    Radial,
    /// Empties one whole route.
    Route,
}

impl RuinStrategy {
    pub(crate) fn choose<R: Rng>(rng: &mut R) -> Self {
        match rng.random_range(0..10) {
            0..4 => RuinStrategy::Random,
            4..9 => RuinStrategy::Radial,
            _ => RuinStrategy::Route,
        }
    }

    pub(crate) fn ruin<R: Rng>(
        &self,
        problem: &Problem,
        solution: &mut WorkingSolution,
        num_to_remove: usize,
        rng: &mut R,
    ) {
        match self {
            RuinStrategy::Random => {
                let mut assigned: Vec<usize> = solution.assigned_clients().collect();
                assigned.shuffle(rng);

                for client in assigned.into_iter().take(num_to_remove) {
                    solution.remove_client(problem, client);
                }
            }
            RuinStrategy::Radial => {
                if problem.num_clients() == 0 {
                    return;
                }

                let center = rng.random_range(1..problem.num_locations());
                let mut remaining = num_to_remove;

                if solution.remove_client(problem, center) {
                    remaining -= 1;
                }

                for &client in problem.nearest_clients(center) {
                    if remaining == 0 {
                        break;
                    }

                    if solution.remove_client(problem, client) {
                        remaining -= 1;
                    }
                }
            }
            RuinStrategy::Route => {
                let candidates: Vec<usize> = solution
                    .routes()
                    .iter()
                    .enumerate()
                    .filter(|(_, route)| !route.is_empty())
                    .map(|(index, _)| index)
                    .collect();

                if let Some(&route_index) = candidates.get(rng.random_range(0..candidates.len().max(1)))
                {
                    solution.remove_route(problem, route_index);
                }
            }
        }

        solution.repair(problem);
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::test_utils::create_line_model;

    #[test]
    fn test_random_ruin_removes_requested_amount() {
        let problem = create_line_model(&[10, 20, 30, 40], 2, 4).build().unwrap();
        let mut solution = WorkingSolution::from_routes(&problem, vec![vec![1, 2], vec![3, 4]]);
        let mut rng = SmallRng::seed_from_u64(7);

        RuinStrategy::Random.ruin(&problem, &mut solution, 3, &mut rng);

        assert_eq!(solution.num_assigned(), 1);
        assert_eq!(solution.unassigned().len(), 3);
    }

    #[test]
    fn test_radial_ruin_removes_neighbors() {
        let problem = create_line_model(&[10, 11, 12, 100], 1, 4).build().unwrap();
        let mut solution = WorkingSolution::from_routes(&problem, vec![vec![1, 2, 3, 4]]);
        let mut rng = SmallRng::seed_from_u64(3);

        RuinStrategy::Radial.ruin(&problem, &mut solution, 2, &mut rng);

        assert_eq!(solution.num_assigned(), 2);
        let mut removed = solution.unassigned().to_vec();
        removed.sort_unstable();

        // Either the far client and its nearest neighbor, or two of the cluster
        assert!(
            removed == vec![3, 4] || removed.iter().all(|&client| client <= 3),
            "{removed:?}"
        );
    }

    #[test]
    fn test_route_ruin_empties_one_route() {
        let problem = create_line_model(&[10, 20, 30], 2, 3).build().unwrap();
        let mut solution = WorkingSolution::from_routes(&problem, vec![vec![1, 2], vec![3]]);
        let mut rng = SmallRng::seed_from_u64(1);

        RuinStrategy::Route.ruin(&problem, &mut solution, 1, &mut rng);

        assert_eq!(solution.routes().len(), 1);
        assert!(solution.unassigned().len() == 1 || solution.unassigned().len() == 2);
    }
}

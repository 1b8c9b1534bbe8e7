use jiff::{SignedDuration, Timestamp};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::IndexedRandom};
use tracing::{debug, info};

use crate::{
    acceptor::SolutionAcceptor,
    cancellation::CancellationToken,
    problem::Problem,
    recreate::{InsertionOrder, recreate},
    ruin::RuinStrategy,
    score::Score,
    solution::working_solution::WorkingSolution,
    solver_params::{SolverParams, Termination},
};

/// Best solution found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub feasible: bool,
    /// Total distance of the returned routes, in model units.
    pub cost: i64,
    /// Client location indices per route, depot excluded.
    pub routes: Vec<Vec<usize>>,
    pub unassigned: Vec<usize>,
    pub iterations: usize,
    pub runtime: SignedDuration,
    pub cancelled: bool,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    pub fn cost(&self) -> Option<i64> {
        self.feasible.then_some(self.cost)
    }
}

pub struct Solver {
    problem: Problem,
    params: SolverParams,
}

impl Solver {
    pub fn new(problem: Problem, params: SolverParams) -> Self {
        Solver { problem, params }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    fn should_terminate(
        &self,
        elapsed: SignedDuration,
        iteration: usize,
        iterations_without_improvement: usize,
    ) -> bool {
        self.params
            .terminations
            .iter()
            .any(|termination| match termination {
                Termination::Duration(duration) => elapsed >= *duration,
                Termination::Iterations(max) => iteration >= *max,
                Termination::IterationsWithoutImprovement(max) => {
                    iterations_without_improvement >= *max
                }
            })
    }

    /// How far the search is towards its closest budget, in `[0, 1]`.
    fn progress(&self, elapsed: SignedDuration, iteration: usize) -> f64 {
        self.params
            .terminations
            .iter()
            .filter_map(|termination| match termination {
                Termination::Duration(duration) if !duration.is_zero() => {
                    Some(elapsed.as_secs_f64() / duration.as_secs_f64())
                }
                Termination::Iterations(max) if *max > 0 => Some(iteration as f64 / *max as f64),
                _ => None,
            })
            .fold(0.0, f64::max)
            .min(1.0)
    }

    fn ruin_size(&self, num_assigned: usize, rng: &mut SmallRng) -> usize {
        let by_ratio = (num_assigned as f64 * self.params.ruin_maximum_ratio).ceil() as usize;
        let maximum = self
            .params
            .ruin_maximum_size
            .min(by_ratio)
            .min(num_assigned)
            .max(1);
        let minimum = self.params.ruin_minimum_size.clamp(1, maximum);

        rng.random_range(minimum..=maximum)
    }

    pub fn solve(&self, cancellation: &CancellationToken) -> SolveResult {
        let problem = &self.problem;
        let started_at = Timestamp::now();
        let mut rng = SmallRng::seed_from_u64(self.params.seed);

        let mut current = WorkingSolution::empty(problem);
        recreate(problem, &mut current, InsertionOrder::Far, &mut rng);
        let mut current_score = current.score(problem);

        let mut best = current.clone();
        let mut best_score = current_score;
        debug!(?best_score, "constructed initial solution");

        let acceptor = SolutionAcceptor::new(&self.params.solver_acceptor, best_score);

        let mut iteration = 0;
        let mut iterations_without_improvement = 0;
        let mut cancelled = false;

        while problem.num_clients() > 0 {
            if cancellation.is_cancelled() {
                cancelled = true;
                break;
            }

            let elapsed = Timestamp::now().duration_since(started_at);
            if self.should_terminate(elapsed, iteration, iterations_without_improvement) {
                break;
            }

            let mut candidate = current.clone();
            let num_to_remove = self.ruin_size(candidate.num_assigned(), &mut rng);
            RuinStrategy::choose(&mut rng).ruin(problem, &mut candidate, num_to_remove, &mut rng);

            let order = InsertionOrder::ALL
                .choose(&mut rng)
                .copied()
                .unwrap_or_default();
            recreate(problem, &mut candidate, order, &mut rng);

            let score = candidate.score(problem);
            if score < best_score {
                best = candidate.clone();
                best_score = score;
                iterations_without_improvement = 0;
                debug!(iteration, ?best_score, "found better solution");
            } else {
                iterations_without_improvement += 1;
            }

            if acceptor.accept(current_score, score, self.progress(elapsed, iteration)) {
                current = candidate;
                current_score = score;
            }

            iteration += 1;
        }

        let runtime = Timestamp::now().duration_since(started_at);
        let feasible = best.unassigned().is_empty() && !best_score.is_failure();

        info!(
            iterations = iteration,
            cancelled,
            feasible,
            cost = best_score.soft_score,
            "search finished in {runtime:#}"
        );

        let unassigned = best.unassigned().to_vec();
        SolveResult {
            feasible,
            cost: best_score.soft_score,
            routes: best.into_visits(),
            unassigned,
            iterations: iteration,
            runtime,
            cancelled,
        }
    }

    pub fn score_of(&self, routes: Vec<Vec<usize>>) -> Score {
        WorkingSolution::from_routes(&self.problem, routes).score(&self.problem)
    }
}

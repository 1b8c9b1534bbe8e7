use jiff::SignedDuration;

#[derive(Clone, Debug, PartialEq)]
pub enum Termination {
    /// Wall-clock budget for the whole search.
    Duration(SignedDuration),
    Iterations(usize),
    /// Stop once the best solution has not improved for this many iterations.
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverAcceptorStrategy {
    Greedy,
    Schrimpf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    pub terminations: Vec<Termination>,
    pub solver_acceptor: SolverAcceptorStrategy,
    pub seed: u64,

    pub ruin_minimum_size: usize,
    pub ruin_maximum_size: usize,
    /// Upper bound on the share of assigned clients removed in one iteration.
    pub ruin_maximum_ratio: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            terminations: vec![
                Termination::Duration(SignedDuration::from_secs(60)),
                Termination::IterationsWithoutImprovement(20_000),
            ],
            solver_acceptor: SolverAcceptorStrategy::Schrimpf,
            seed: 42,
            ruin_minimum_size: 1,
            ruin_maximum_size: 30,
            ruin_maximum_ratio: 0.3,
        }
    }
}

impl SolverParams {
    pub fn with_time_limit(time_limit: SignedDuration) -> Self {
        let mut params = SolverParams::default();
        params
            .terminations
            .retain(|termination| !matches!(termination, Termination::Duration(_)));
        params.terminations.push(Termination::Duration(time_limit));
        params
    }
}

use crate::{score::Score, solver_params::SolverAcceptorStrategy};

pub(crate) enum SolutionAcceptor {
    Greedy,
    Schrimpf(SchrimpfAcceptor),
}

impl SolutionAcceptor {
    pub(crate) fn new(strategy: &SolverAcceptorStrategy, initial_score: Score) -> Self {
        match strategy {
            SolverAcceptorStrategy::Greedy => SolutionAcceptor::Greedy,
            SolverAcceptorStrategy::Schrimpf => {
                SolutionAcceptor::Schrimpf(SchrimpfAcceptor::for_initial_score(initial_score))
            }
        }
    }

    /// `progress` goes from 0 at the start of the search to 1 at termination.
    pub(crate) fn accept(&self, current: Score, candidate: Score, progress: f64) -> bool {
        match self {
            SolutionAcceptor::Greedy => candidate <= current,
            SolutionAcceptor::Schrimpf(acceptor) => acceptor.accept(current, candidate, progress),
        }
    }
}

/// Threshold acceptance with an exponentially decaying threshold.
pub(crate) struct SchrimpfAcceptor {
    initial_threshold: f64,
    alpha: f64,
}

impl SchrimpfAcceptor {
    pub(crate) fn for_initial_score(initial_score: Score) -> Self {
        SchrimpfAcceptor {
            initial_threshold: (initial_score.soft_score as f64 * 0.02).max(1.0),
            alpha: 0.15,
        }
    }

    // threshold(p) = initial * exp(-ln(2) * p / alpha)
    fn compute_threshold(&self, progress: f64) -> f64 {
        self.initial_threshold * (-(2.0_f64).ln() * progress.clamp(0.0, 1.0) / self.alpha).exp()
    }

    fn accept(&self, current: Score, candidate: Score, progress: f64) -> bool {
        if candidate.hard_score != current.hard_score {
            return candidate.hard_score < current.hard_score;
        }

        (candidate.soft_score as f64) < current.soft_score as f64 + self.compute_threshold(progress)
    }
}

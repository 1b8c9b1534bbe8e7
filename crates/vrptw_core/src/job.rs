use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, OnceLock},
    thread::{self, JoinHandle},
    time::Duration,
};

use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use tracing::{error, info, warn};
use vrptw_engine::cancellation::CancellationToken;

use crate::{
    adapter::{EngineError, RoutingEngine, build_model},
    aggregator::{Solution, aggregate},
    error::SolveError,
    request::SolveRequest,
    timer_debug,
};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Highest progress reported while a job is still running.
const MAX_RUNNING_PROGRESS: f64 = 0.99;

/// Time based estimate, the engine reports no progress of its own.
pub fn progress_estimate(elapsed: SignedDuration, time_budget: SignedDuration) -> f64 {
    if time_budget.is_zero() || time_budget.is_negative() {
        return MAX_RUNNING_PROGRESS;
    }

    (elapsed.as_secs_f64() / time_budget.as_secs_f64()).clamp(0.0, MAX_RUNNING_PROGRESS)
}

/// Builds the model, runs the engine and aggregates its output on the
/// calling thread.
pub fn solve_blocking(
    engine: &dyn RoutingEngine,
    request: &SolveRequest,
    cancellation: &CancellationToken,
) -> Result<Solution, SolveError> {
    let model = build_model(request);

    let raw = timer_debug!("engine solve", {
        engine.solve(&model, request.time_budget(), cancellation)
    });

    if cancellation.is_cancelled() {
        info!("solve cancelled");
        return Err(SolveError::Cancelled);
    }

    let raw = raw.map_err(|err| match err {
        EngineError::Model(err) => {
            warn!("rejected routing model: {err}");
            SolveError::ModelBuild(err)
        }
        EngineError::Failed(message) => {
            error!("routing engine failed: {message}");
            SolveError::Engine(message)
        }
    })?;

    let solution = aggregate(
        &raw,
        request.locations(),
        request.matrices(),
        request.service_time(),
    );

    info!(
        feasible = solution.feasible,
        num_routes = solution.num_routes,
        total_distance = solution.total_distance,
        "solve finished"
    );

    Ok(solution)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("routing engine panicked"))
}

/// A solve running on its own thread.
///
/// The result slot is written once by the worker. Readers join the worker
/// before reading it.
pub struct SolveJob {
    started_at: Timestamp,
    time_budget: SignedDuration,
    cancellation: CancellationToken,
    result: Arc<OnceLock<Result<Solution, SolveError>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SolveJob {
    pub fn spawn(engine: Arc<dyn RoutingEngine>, request: SolveRequest) -> Self {
        let cancellation = CancellationToken::new();
        let result = Arc::new(OnceLock::new());
        let time_budget = request.time_budget();

        let handle = {
            let cancellation = cancellation.clone();
            let result = Arc::clone(&result);

            thread::spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    solve_blocking(engine.as_ref(), &request, &cancellation)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload);
                    error!("solve thread panicked: {message}");
                    Err(SolveError::Engine(message))
                });

                let _ = result.set(outcome);
            })
        };

        SolveJob {
            started_at: Timestamp::now(),
            time_budget,
            cancellation,
            result,
            handle: Mutex::new(Some(handle)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.get().is_some()
    }

    pub fn elapsed(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.started_at)
    }

    /// 1.0 once finished, otherwise the time based estimate.
    pub fn progress(&self) -> f64 {
        if self.is_finished() {
            1.0
        } else {
            progress_estimate(self.elapsed(), self.time_budget)
        }
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    fn join(&self) {
        if let Some(handle) = self.handle.lock().take()
            && handle.join().is_err()
        {
            error!("solve thread ended abnormally");
        }
    }

    fn read_result(&self) -> Result<Solution, SolveError> {
        self.result.get().cloned().unwrap_or_else(|| {
            Err(SolveError::Engine(String::from(
                "solve thread ended without a result",
            )))
        })
    }

    /// The outcome when finished, without blocking otherwise.
    pub fn try_result(&self) -> Option<Result<Solution, SolveError>> {
        if !self.is_finished() {
            return None;
        }

        self.join();
        Some(self.read_result())
    }

    /// Blocks until the worker is done.
    pub fn wait(&self) -> Result<Solution, SolveError> {
        self.join();
        self.read_result()
    }

    /// Blocks until the worker is done, reporting progress every `interval`.
    pub fn wait_with_progress(
        &self,
        interval: Duration,
        mut on_progress: impl FnMut(f64),
    ) -> Result<Solution, SolveError> {
        while !self.is_finished() {
            on_progress(self.progress());
            thread::sleep(interval);
        }

        on_progress(1.0);
        self.wait()
    }
}

impl Drop for SolveJob {
    fn drop(&mut self) {
        if !self.is_finished() {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use vrptw_engine::model::Model;

    use super::*;
    use crate::{
        adapter::RawSolution,
        params::SolveParams,
        test_utils::{FailingEngine, FixedEngine, rochester_locations},
    };

    fn request() -> SolveRequest {
        SolveRequest::new(rochester_locations(4), SolveParams::default()).unwrap()
    }

    fn two_routes() -> RawSolution {
        RawSolution {
            feasible: true,
            cost: Some(1500.0),
            routes: vec![vec![1, 2], vec![], vec![3]],
        }
    }

    struct PanickingEngine;

    impl RoutingEngine for PanickingEngine {
        fn solve(
            &self,
            _model: &Model,
            _time_budget: SignedDuration,
            _cancellation: &CancellationToken,
        ) -> Result<RawSolution, EngineError> {
            panic!("boom");
        }
    }

    #[test]
    fn test_progress_estimate() {
        let budget = SignedDuration::from_secs(60);

        assert_eq!(progress_estimate(SignedDuration::ZERO, budget), 0.0);
        assert_eq!(progress_estimate(SignedDuration::from_secs(30), budget), 0.5);
        assert_eq!(progress_estimate(SignedDuration::from_secs(600), budget), 0.99);
        assert_eq!(progress_estimate(SignedDuration::from_secs(1), SignedDuration::ZERO), 0.99);
    }

    #[test]
    fn test_job_completes() {
        let job = SolveJob::spawn(Arc::new(FixedEngine::new(two_routes())), request());
        let solution = job.wait().unwrap();

        assert!(job.is_finished());
        assert_eq!(job.progress(), 1.0);
        assert_eq!(solution.num_routes, 2);
        assert_eq!(solution.customers_served(), 3);
    }

    #[test]
    fn test_progress_is_reported_until_done() {
        let engine = FixedEngine {
            solution: two_routes(),
            delay: SignedDuration::from_millis(300),
        };
        let job = SolveJob::spawn(Arc::new(engine), request());

        let mut reports = vec![];
        let solution = job
            .wait_with_progress(Duration::from_millis(20), |progress| reports.push(progress))
            .unwrap();

        assert!(solution.feasible);
        assert!(reports.len() > 1);
        assert_eq!(reports.last(), Some(&1.0));
        assert!(reports[..reports.len() - 1].iter().all(|&p| p < 1.0));
    }

    #[test]
    fn test_cancelled_job() {
        let engine = FixedEngine {
            solution: two_routes(),
            delay: SignedDuration::from_secs(30),
        };
        let job = SolveJob::spawn(Arc::new(engine), request());
        assert!(job.try_result().is_none());

        job.cancel();

        assert_eq!(job.wait(), Err(SolveError::Cancelled));
    }

    #[test]
    fn test_engine_failure_is_a_solve_failure() {
        let job = SolveJob::spawn(Arc::new(FailingEngine), request());

        assert_eq!(
            job.wait(),
            Err(SolveError::Engine(String::from("engine exploded")))
        );
    }

    #[test]
    fn test_engine_panic_is_caught() {
        let job = SolveJob::spawn(Arc::new(PanickingEngine), request());

        assert_eq!(job.wait(), Err(SolveError::Engine(String::from("boom"))));
    }

    #[test]
    fn test_infeasible_is_not_an_error() {
        let job = SolveJob::spawn(
            Arc::new(FixedEngine::new(RawSolution::infeasible())),
            request(),
        );
        let solution = job.wait().unwrap();

        assert!(!solution.feasible);
        assert!(!solution.guidance().is_empty());
    }
}

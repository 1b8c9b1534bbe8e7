use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use vrptw_core::{
    aggregator::Solution,
    error::SolveError,
    job::SolveJob,
    location::Location,
    map::{render_locations_map, render_solution_map},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Locations,
    Solution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum SessionStatus {
    Idle,
    Solving {
        progress: f64,
    },
    Solved {
        num_routes: usize,
        total_distance: f64,
        total_duration: i64,
        customers_served: usize,
    },
    Infeasible {
        guidance: Vec<&'static str>,
    },
    /// Stopped by the client before the engine finished.
    Cancelled,
    Failed {
        message: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum SessionError {
    AlreadySolving,
    NoLocations,
}

/// State kept for one client between requests.
#[derive(Default)]
pub struct Session {
    locations: Option<Vec<Location>>,
    solution: Option<Solution>,
    current_view: View,
    solving: Option<SolveJob>,
    failure: Option<SolveError>,
}

impl Session {
    pub fn locations(&self) -> Option<&[Location]> {
        self.locations.as_deref()
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn is_solving(&self) -> bool {
        self.solving.is_some()
    }

    pub fn set_locations(&mut self, locations: Vec<Location>) -> Result<(), SessionError> {
        if self.is_solving() {
            return Err(SessionError::AlreadySolving);
        }

        self.locations = Some(locations);
        self.solution = None;
        self.failure = None;
        self.current_view = View::Locations;
        Ok(())
    }

    /// Checks a solve may start. Nothing changes when it may not.
    pub fn ensure_can_solve(&self) -> Result<&[Location], SessionError> {
        if self.is_solving() {
            return Err(SessionError::AlreadySolving);
        }

        self.locations().ok_or(SessionError::NoLocations)
    }

    pub fn begin_solve(&mut self, job: SolveJob) -> Result<(), SessionError> {
        if self.is_solving() {
            job.cancel();
            return Err(SessionError::AlreadySolving);
        }

        self.solving = Some(job);
        self.solution = None;
        self.failure = None;
        self.current_view = View::Locations;
        Ok(())
    }

    pub fn stop(&self) -> bool {
        match &self.solving {
            Some(job) => {
                job.cancel();
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, outcome: Result<Solution, SolveError>) {
        self.solving = None;

        match outcome {
            Ok(solution) => {
                info!(
                    feasible = solution.feasible,
                    num_routes = solution.num_routes,
                    "stored session solution"
                );
                if solution.feasible {
                    self.current_view = View::Solution;
                }
                self.solution = Some(solution);
            }
            Err(SolveError::Cancelled) => {
                info!("session solve cancelled");
                self.failure = Some(SolveError::Cancelled);
            }
            Err(err) => {
                warn!("session solve failed: {err}");
                self.failure = Some(err);
            }
        }
    }

    /// Collects the outcome of a finished job before reporting.
    pub fn poll(&mut self) -> SessionStatus {
        if let Some(job) = &self.solving {
            match job.try_result() {
                Some(outcome) => self.finish(outcome),
                None => {
                    return SessionStatus::Solving {
                        progress: job.progress(),
                    };
                }
            }
        }

        match &self.failure {
            Some(SolveError::Cancelled) => return SessionStatus::Cancelled,
            Some(err) => {
                return SessionStatus::Failed {
                    message: err.to_string(),
                };
            }
            None => {}
        }

        match &self.solution {
            Some(solution) if solution.feasible => SessionStatus::Solved {
                num_routes: solution.num_routes,
                total_distance: solution.total_distance,
                total_duration: solution.total_duration,
                customers_served: solution.customers_served(),
            },
            Some(solution) => SessionStatus::Infeasible {
                guidance: solution.guidance().to_vec(),
            },
            None => SessionStatus::Idle,
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// HTML for the current view, `None` when there is nothing to show.
    pub fn render_view(&self) -> Option<String> {
        match self.current_view {
            View::Locations => self.locations().map(render_locations_map),
            View::Solution => self.solution().and_then(render_solution_map),
        }
    }
}

struct StoredSession {
    session: Arc<Mutex<Session>>,
    last_seen: Mutex<Instant>,
}

impl StoredSession {
    fn new() -> Self {
        StoredSession {
            session: Arc::new(Mutex::new(Session::default())),
            last_seen: Mutex::new(Instant::now()),
        }
    }
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, StoredSession>>,
}

impl SessionStore {
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().insert(id, StoredSession::new());
        id
    }

    /// Looks up a session and marks it as used.
    pub fn get(&self, id: &Uuid) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read();
        let stored = sessions.get(id)?;
        *stored.last_seen.lock() = Instant::now();
        Some(Arc::clone(&stored.session))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        match self.sessions.write().remove(id) {
            Some(stored) => {
                stored.session.lock().stop();
                true
            }
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drops sessions not used for longer than `max_idle`, cancelling any
    /// solve they still run. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();

        sessions.retain(|id, stored| {
            let idle = now.saturating_duration_since(*stored.last_seen.lock());
            if idle <= max_idle {
                return true;
            }
            info!(%id, idle_secs = idle.as_secs(), "evicting idle session");
            stored.session.lock().stop();
            false
        });

        before - sessions.len()
    }
}

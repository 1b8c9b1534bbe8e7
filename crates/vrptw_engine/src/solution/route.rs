use crate::problem::Problem;

/// One vehicle's visits with cached schedule data.
///
/// Positions index the node sequence `depot, visits.., depot`, so position 0
/// is the start depot and position `len + 1` the end depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    visits: Vec<usize>,
    load: i64,
    distance: i64,
    end_time: i64,
    feasible: bool,

    // Departure time from each position, end depot excluded
    departures: Vec<i64>,

    // Latest arrival at each position keeping the rest of the route feasible
    latest_arrivals: Vec<i64>,
}

impl Route {
    pub fn new(problem: &Problem) -> Self {
        Route::with_visits(problem, vec![])
    }

    pub fn with_visits(problem: &Problem, visits: Vec<usize>) -> Self {
        let mut route = Route {
            visits,
            load: 0,
            distance: 0,
            end_time: 0,
            feasible: true,
            departures: vec![],
            latest_arrivals: vec![],
        };
        route.update(problem);
        route
    }

    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn contains(&self, client: usize) -> bool {
        self.visits.contains(&client)
    }

    pub fn load(&self) -> i64 {
        self.load
    }

    pub fn distance(&self) -> i64 {
        self.distance
    }

    /// Time from leaving the depot to coming back, waiting included.
    pub fn duration(&self, problem: &Problem) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.end_time - problem.depot().tw_early
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    #[inline(always)]
    fn node(&self, position: usize) -> usize {
        if position == 0 || position > self.visits.len() {
            Problem::DEPOT
        } else {
            self.visits[position - 1]
        }
    }

    /// Recomputes load, distance, the forward schedule and the backward slack.
    pub fn update(&mut self, problem: &Problem) {
        let num_visits = self.visits.len();

        self.load = 0;
        self.distance = 0;
        self.feasible = true;
        self.departures.clear();
        self.latest_arrivals.clear();

        let mut time = problem.depot().tw_early;
        let mut previous = Problem::DEPOT;
        self.departures.push(time);

        for &client in &self.visits {
            let data = problem.client(client);
            self.load += data.delivery;
            self.distance += problem.distance(previous, client);

            let arrival = time + problem.duration(previous, client);
            let start = arrival.max(data.tw_early);
            if start > data.tw_late {
                self.feasible = false;
            }

            time = start + data.service_duration;
            self.departures.push(time);
            previous = client;
        }

        self.distance += problem.distance(previous, Problem::DEPOT);
        self.end_time = time + problem.duration(previous, Problem::DEPOT);

        if self.end_time > problem.latest_return() || self.load > problem.vehicle().capacity {
            self.feasible = false;
        }

        self.latest_arrivals.resize(num_visits + 2, 0);
        self.latest_arrivals[num_visits + 1] = problem.latest_return();
        for position in (1..=num_visits).rev() {
            let client = self.node(position);
            let data = problem.client(client);
            let next = self.node(position + 1);

            self.latest_arrivals[position] = data.tw_late.min(
                self.latest_arrivals[position + 1]
                    - problem.duration(client, next)
                    - data.service_duration,
            );
        }
        self.latest_arrivals[0] =
            self.latest_arrivals[1] - problem.duration(Problem::DEPOT, self.node(1));
    }

    /// Distance added by inserting `client` before the node at `position + 1`,
    /// or `None` when the insertion breaks capacity or timing.
    pub fn insertion_delta(&self, problem: &Problem, client: usize, position: usize) -> Option<i64> {
        if !self.feasible || position > self.visits.len() {
            return None;
        }

        let data = problem.client(client);
        if self.load + data.delivery > problem.vehicle().capacity {
            return None;
        }

        let previous = self.node(position);
        let next = self.node(position + 1);

        let arrival = self.departures[position] + problem.duration(previous, client);
        let start = arrival.max(data.tw_early);
        if start > data.tw_late {
            return None;
        }

        let next_arrival = start + data.service_duration + problem.duration(client, next);
        if next_arrival > self.latest_arrivals[position + 1] {
            return None;
        }

        Some(
            problem.distance(previous, client) + problem.distance(client, next)
                - problem.distance(previous, next),
        )
    }

    pub fn insert(&mut self, problem: &Problem, client: usize, position: usize) {
        self.visits.insert(position, client);
        self.update(problem);
    }

    pub fn remove(&mut self, problem: &Problem, client: usize) -> bool {
        match self.visits.iter().position(|&visit| visit == client) {
            Some(index) => {
                self.visits.remove(index);
                self.update(problem);
                true
            }
            None => false,
        }
    }

    pub fn take_visits(&mut self, problem: &Problem) -> Vec<usize> {
        let visits = std::mem::take(&mut self.visits);
        self.update(problem);
        visits
    }
}

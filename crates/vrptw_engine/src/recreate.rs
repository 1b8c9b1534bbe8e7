use rand::{Rng, seq::SliceRandom};

use crate::{problem::Problem, solution::working_solution::WorkingSolution};

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum InsertionOrder {
    #[default]
    Random,
    Far,
    Close,
    TimeWindow,
}

impl InsertionOrder {
    pub(crate) const ALL: [InsertionOrder; 4] = [
        InsertionOrder::Random,
        InsertionOrder::Far,
        InsertionOrder::Close,
        InsertionOrder::TimeWindow,
    ];

    fn sort<R: Rng>(&self, problem: &Problem, clients: &mut [usize], rng: &mut R) {
        match self {
            InsertionOrder::Random => clients.shuffle(rng),
            InsertionOrder::Far => clients
                .sort_unstable_by_key(|&client| (-problem.distance(Problem::DEPOT, client), client)),
            InsertionOrder::Close => clients
                .sort_unstable_by_key(|&client| (problem.distance(Problem::DEPOT, client), client)),
            InsertionOrder::TimeWindow => clients.sort_unstable_by_key(|&client| {
                let data = problem.client(client);
                (data.tw_late - data.tw_early, client)
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Insertion {
    pub route_index: Option<usize>,
    pub position: usize,
    pub delta: i64,
}

/// Cheapest feasible place for `client`, opening a new route if the fleet allows it.
pub(crate) fn best_insertion(
    problem: &Problem,
    solution: &WorkingSolution,
    client: usize,
) -> Option<Insertion> {
    let mut best: Option<Insertion> = None;

    for (route_index, route) in solution.routes().iter().enumerate() {
        for position in 0..=route.len() {
            if let Some(delta) = route.insertion_delta(problem, client, position)
                && best.is_none_or(|insertion| delta < insertion.delta)
            {
                best = Some(Insertion {
                    route_index: Some(route_index),
                    position,
                    delta,
                });
            }
        }
    }

    if solution.can_open_route(problem) {
        let data = problem.client(client);
        let arrival = problem.depot().tw_early + problem.duration(Problem::DEPOT, client);
        let start = arrival.max(data.tw_early);
        let back = start + data.service_duration + problem.duration(client, Problem::DEPOT);

        if data.delivery <= problem.vehicle().capacity
            && start <= data.tw_late
            && back <= problem.latest_return()
        {
            let delta =
                problem.distance(Problem::DEPOT, client) + problem.distance(client, Problem::DEPOT);
            if best.is_none_or(|insertion| delta < insertion.delta) {
                best = Some(Insertion {
                    route_index: None,
                    position: 0,
                    delta,
                });
            }
        }
    }

    best
}

/// Inserts every unassigned client at its cheapest feasible position, one at
/// a time in `order`. Clients without a feasible position stay unassigned.
pub(crate) fn recreate<R: Rng>(
    problem: &Problem,
    solution: &mut WorkingSolution,
    order: InsertionOrder,
    rng: &mut R,
) {
    let mut clients = solution.take_unassigned();
    order.sort(problem, &mut clients, rng);

    let mut skipped = vec![];
    for client in clients {
        match best_insertion(problem, solution, client) {
            Some(insertion) => {
                solution.insert(problem, client, insertion.route_index, insertion.position)
            }
            None => skipped.push(client),
        }
    }

    solution.restore_unassigned(skipped);
}

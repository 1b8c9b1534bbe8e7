use crate::{problem::Problem, score::Score};

use super::route::Route;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSolution {
    routes: Vec<Route>,
    unassigned: Vec<usize>,
}

impl WorkingSolution {
    /// Solution with no routes and every client unassigned.
    pub fn empty(problem: &Problem) -> Self {
        WorkingSolution {
            routes: vec![],
            unassigned: problem.client_locations().collect(),
        }
    }

    pub fn from_routes(problem: &Problem, routes: Vec<Vec<usize>>) -> Self {
        let routes: Vec<Route> = routes
            .into_iter()
            .map(|visits| Route::with_visits(problem, visits))
            .collect();

        let unassigned = problem
            .client_locations()
            .filter(|&client| !routes.iter().any(|route| route.contains(client)))
            .collect();

        WorkingSolution { routes, unassigned }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    pub fn num_assigned(&self) -> usize {
        self.routes.iter().map(Route::len).sum()
    }

    pub fn assigned_clients(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes
            .iter()
            .flat_map(|route| route.visits().iter().copied())
    }

    pub fn score(&self, problem: &Problem) -> Score {
        let broken_routes = self
            .routes
            .iter()
            .filter(|route| !route.is_feasible())
            .count();
        let extra_vehicles = self
            .routes
            .len()
            .saturating_sub(problem.vehicle().num_available);

        let distance: Score = self
            .routes
            .iter()
            .map(|route| Score::soft(route.distance()))
            .sum();

        distance + Score::hard((self.unassigned.len() + broken_routes + extra_vehicles) as i64)
    }

    pub fn can_open_route(&self, problem: &Problem) -> bool {
        self.routes.len() < problem.vehicle().num_available
    }

    /// Inserts `client` into route `route_index`, or into a new route when `None`.
    pub fn insert(
        &mut self,
        problem: &Problem,
        client: usize,
        route_index: Option<usize>,
        position: usize,
    ) {
        match route_index {
            Some(index) => self.routes[index].insert(problem, client, position),
            None => self.routes.push(Route::with_visits(problem, vec![client])),
        }

        self.unassigned.retain(|&unassigned| unassigned != client);
    }

    pub fn remove_client(&mut self, problem: &Problem, client: usize) -> bool {
        let removed = self
            .routes
            .iter_mut()
            .any(|route| route.remove(problem, client));

        if removed {
            self.unassigned.push(client);
        }

        removed
    }

    pub fn remove_route(&mut self, problem: &Problem, route_index: usize) {
        let visits = self.routes[route_index].take_visits(problem);
        self.unassigned.extend(visits);
    }

    /// Unassigns the visits of routes that no longer satisfy their constraints
    /// and drops routes left without visits.
    pub fn repair(&mut self, problem: &Problem) {
        for index in 0..self.routes.len() {
            if !self.routes[index].is_feasible() {
                self.remove_route(problem, index);
            }
        }

        self.routes.retain(|route| !route.is_empty());
    }

    pub fn take_unassigned(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.unassigned)
    }

    pub fn restore_unassigned(&mut self, clients: Vec<usize>) {
        self.unassigned.extend(clients);
    }

    pub fn into_visits(self) -> Vec<Vec<usize>> {
        self.routes
            .into_iter()
            .map(|route| route.visits().to_vec())
            .collect()
    }
}

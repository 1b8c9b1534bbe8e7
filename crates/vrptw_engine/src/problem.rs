use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct DepotData {
    pub tw_early: i64,
    pub tw_late: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientData {
    pub delivery: i64,
    pub service_duration: i64,
    pub tw_early: i64,
    pub tw_late: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleData {
    pub num_available: usize,
    pub capacity: i64,
    pub max_duration: Option<i64>,
}

/// Compiled problem: location 0 is the depot, locations `1..n` are clients.
#[derive(Debug, Clone)]
pub struct Problem {
    num_locations: usize,
    depot: DepotData,
    clients: Vec<ClientData>,
    vehicle: VehicleData,
    distances: Vec<i64>,
    durations: Vec<i64>,
    nearest_clients: Vec<Vec<usize>>,
}

impl Problem {
    pub const DEPOT: usize = 0;

    pub(crate) fn new(
        depot: DepotData,
        clients: Vec<ClientData>,
        vehicle: VehicleData,
        distances: Vec<i64>,
        durations: Vec<i64>,
    ) -> Self {
        let num_locations = clients.len() + 1;

        let nearest_clients = (0..num_locations)
            .map(|from| {
                let mut others: Vec<usize> = (1..num_locations).filter(|&to| to != from).collect();
                others.sort_by_key(|&to| (distances[from * num_locations + to], to));
                others
            })
            .collect();

        Problem {
            num_locations,
            depot,
            clients,
            vehicle,
            distances,
            durations,
            nearest_clients,
        }
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn client_locations(&self) -> Range<usize> {
        1..self.num_locations
    }

    pub fn depot(&self) -> &DepotData {
        &self.depot
    }

    pub fn vehicle(&self) -> &VehicleData {
        &self.vehicle
    }

    pub fn client(&self, location: usize) -> &ClientData {
        &self.clients[location - 1]
    }

    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distances[from * self.num_locations + to]
    }

    #[inline(always)]
    pub fn duration(&self, from: usize, to: usize) -> i64 {
        self.durations[from * self.num_locations + to]
    }

    /// Latest time a vehicle may be back at the depot, combining the depot
    /// window with the maximum route duration.
    pub fn latest_return(&self) -> i64 {
        match self.vehicle.max_duration {
            Some(max_duration) => self
                .depot
                .tw_late
                .min(self.depot.tw_early.saturating_add(max_duration)),
            None => self.depot.tw_late,
        }
    }

    /// Clients sorted by increasing distance from `location`, excluding itself.
    pub fn nearest_clients(&self, location: usize) -> &[usize] {
        &self.nearest_clients[location]
    }
}

use jiff::SignedDuration;
use tracing::info;
use vrptw_matrix::travel_matrices::TravelMatrices;

use crate::{
    error::SolveError,
    location::Location,
    params::{SolveParams, TimeWindow},
    timer_debug,
};

/// Everything one solve needs. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    locations: Vec<Location>,
    matrices: TravelMatrices,
    params: SolveParams,
}

impl SolveRequest {
    /// Validates the parameters and computes the travel matrices.
    ///
    /// Fails before any matrix is built when the parameters are out of range.
    pub fn new(locations: Vec<Location>, params: SolveParams) -> Result<Self, SolveError> {
        params.validate()?;

        if locations.len() < 2 {
            return Err(SolveError::InsufficientLocations(locations.len()));
        }

        let matrices = timer_debug!("travel matrices", {
            TravelMatrices::haversine(&locations, params.avg_speed_mph)
        })?;

        info!(
            locations = locations.len(),
            vehicles = params.num_vehicles,
            capacity = params.vehicle_capacity,
            service_time = params.service_time,
            time_window = %params.time_window,
            max_route_duration = params.max_route_duration(),
            "prepared solve request"
        );

        Ok(SolveRequest {
            locations,
            matrices,
            params,
        })
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn depot(&self) -> &Location {
        &self.locations[0]
    }

    pub fn matrices(&self) -> &TravelMatrices {
        &self.matrices
    }

    pub fn params(&self) -> &SolveParams {
        &self.params
    }

    pub fn time_window(&self) -> TimeWindow {
        self.params.time_window
    }

    pub fn service_time(&self) -> i64 {
        self.params.service_time
    }

    pub fn max_route_duration(&self) -> i64 {
        self.params.max_route_duration()
    }

    pub fn time_budget(&self) -> SignedDuration {
        self.params.time_budget
    }
}

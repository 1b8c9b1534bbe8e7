use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::haversine::{haversine_miles, travel_minutes};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("average speed must be a positive number of miles per hour, got {0}")]
    InvalidSpeed(f64),
}

/// Distance (miles) and travel time (whole minutes) between every pair of locations.
/// Stored as flat row-major vectors, index 0 being the depot.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TravelMatrices {
    num_locations: usize,
    avg_speed_mph: f64,
    distances: Vec<f64>,
    durations: Vec<i64>,
}

impl TravelMatrices {
    /// Builds both matrices from great-circle distances and a constant speed.
    ///
    /// Every unordered pair is computed once and mirrored, the diagonal stays zero.
    pub fn haversine<P>(points: &[P], avg_speed_mph: f64) -> Result<Self, MatrixError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if !avg_speed_mph.is_finite() || avg_speed_mph <= 0.0 {
            return Err(MatrixError::InvalidSpeed(avg_speed_mph));
        }

        let num_locations = points.len();
        let mut distances = vec![0.0; num_locations * num_locations];
        let mut durations = vec![0; num_locations * num_locations];

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate().skip(i + 1) {
                let distance = haversine_miles(from, to);
                let duration = travel_minutes(distance, avg_speed_mph);

                distances[i * num_locations + j] = distance;
                distances[j * num_locations + i] = distance;
                durations[i * num_locations + j] = duration;
                durations[j * num_locations + i] = duration;
            }
        }

        debug!(
            num_locations,
            avg_speed_mph, "built haversine distance and duration matrices"
        );

        Ok(TravelMatrices {
            num_locations,
            avg_speed_mph,
            distances,
            durations,
        })
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn avg_speed_mph(&self) -> f64 {
        self.avg_speed_mph
    }

    /// Miles between two locations.
    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances[self.index(from, to)]
    }

    /// Whole minutes between two locations.
    #[inline(always)]
    pub fn duration(&self, from: usize, to: usize) -> i64 {
        self.durations[self.index(from, to)]
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn durations(&self) -> &[i64] {
        &self.durations
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| {
            (i + 1..self.num_locations).all(|j| {
                self.distance(i, j) == self.distance(j, i)
                    && self.duration(i, j) == self.duration(j, i)
            })
        })
    }
}

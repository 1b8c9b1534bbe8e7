use serde::{Deserialize, Serialize};

/// One input row. The first location of a set is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Location {
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
        }
    }
}

impl From<&Location> for geo_types::Point {
    fn from(location: &Location) -> Self {
        geo_types::Point::new(location.longitude, location.latitude)
    }
}

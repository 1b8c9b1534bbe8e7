pub mod haversine;
pub mod travel_matrices;

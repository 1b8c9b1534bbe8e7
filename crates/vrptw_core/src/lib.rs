pub mod adapter;
pub mod aggregator;
pub mod artifacts;
pub mod error;
pub mod job;
pub mod loader;
pub mod location;
pub mod map;
pub mod params;
pub mod request;
mod timer;

#[cfg(test)]
pub(crate) mod test_utils;

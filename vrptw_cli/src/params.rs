use clap::{Args, ValueEnum};
use jiff::{SignedDuration, civil::Time};
use vrptw_core::params::{Preset, SolveParams, TimeWindow};

use crate::parsers;

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Example1,
    Example2,
}

impl From<PresetArg> for Preset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Example1 => Preset::Example1,
            PresetArg::Example2 => Preset::Example2,
        }
    }
}

/// Solve parameters, each overriding the preset or the defaults.
#[derive(Args)]
pub struct ParamArgs {
    /// Start from a ready-made parameter set
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    #[arg(long)]
    vehicles: Option<usize>,

    /// Maximum number of stops per vehicle
    #[arg(long)]
    capacity: Option<u32>,

    /// Minutes spent at each customer
    #[arg(long)]
    service_time: Option<i64>,

    /// Opening of the shared time window (e.g., "09:00")
    #[arg(long, value_parser = parsers::parse_clock)]
    start: Option<Time>,

    /// Length of the shared time window (e.g., "8h", "2d")
    #[arg(long, value_parser = parsers::parse_duration)]
    duration: Option<SignedDuration>,

    /// Longest route, defaults to the window length (e.g., "6h")
    #[arg(long, value_parser = parsers::parse_duration)]
    max_route_duration: Option<SignedDuration>,

    /// Average travel speed in miles per hour
    #[arg(long)]
    speed: Option<f64>,

    /// Time budget for the solver (e.g., "30s", "2m")
    #[arg(long, value_parser = parsers::parse_duration)]
    time_limit: Option<SignedDuration>,

    /// Only use the first N locations, 0 uses all of them
    #[arg(long)]
    limit: Option<usize>,
}

impl ParamArgs {
    pub fn into_params(self) -> SolveParams {
        let mut params = self
            .preset
            .map(|preset| Preset::from(preset).params())
            .unwrap_or_default();

        if let Some(vehicles) = self.vehicles {
            params.num_vehicles = vehicles;
        }
        if let Some(capacity) = self.capacity {
            params.vehicle_capacity = capacity;
        }
        if let Some(service_time) = self.service_time {
            params.service_time = service_time;
        }

        let duration = self
            .duration
            .unwrap_or_else(|| SignedDuration::from_mins(params.time_window.span()));
        params.time_window = match self.start {
            Some(start) => TimeWindow::from_clock(start, duration),
            None => TimeWindow::from_start_and_duration(params.time_window.start, duration.as_mins()),
        };

        if let Some(max_route_duration) = self.max_route_duration {
            params.max_route_duration = Some(max_route_duration.as_mins());
        }
        if let Some(speed) = self.speed {
            params.avg_speed_mph = speed;
        }
        if let Some(time_limit) = self.time_limit {
            params.time_budget = time_limit;
        }
        if let Some(limit) = self.limit {
            params.location_limit = limit;
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        params: ParamArgs,
    }

    fn parse(args: &[&str]) -> SolveParams {
        TestCli::parse_from(std::iter::once("vrptw").chain(args.iter().copied()))
            .params
            .into_params()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse(&[]), SolveParams::default());
    }

    #[test]
    fn test_preset_with_override() {
        let params = parse(&["--preset", "example2", "--vehicles", "3"]);

        assert_eq!(params.num_vehicles, 3);
        assert_eq!(params.vehicle_capacity, 8);
        assert_eq!(params.location_limit, 30);
    }

    #[test]
    fn test_window_from_clock() {
        let params = parse(&["--start", "08:30", "--duration", "2d", "--time-limit", "90s"]);

        assert_eq!(params.time_window, TimeWindow::new(510, 510 + 48 * 60));
        assert_eq!(params.time_budget, SignedDuration::from_secs(90));
    }

    #[test]
    fn test_duration_keeps_default_start() {
        let params = parse(&["--duration", "4h", "--max-route-duration", "3h"]);

        assert_eq!(params.time_window, TimeWindow::new(540, 780));
        assert_eq!(params.max_route_duration(), 180);
    }
}

use std::fmt::Display;

use jiff::{SignedDuration, civil::Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Longest window accepted, one week and 59 minutes.
pub const MAX_WINDOW_MINUTES: i64 = 168 * 60 + 59;

/// Window shared by the depot and every customer, in minutes after the
/// reference midnight. The end may fall on a later day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn from_start_and_duration(start: i64, duration: i64) -> Self {
        TimeWindow {
            start,
            end: start + duration,
        }
    }

    /// Window opening at a wall clock time and lasting `duration`, truncated to
    /// whole minutes.
    pub fn from_clock(start: Time, duration: SignedDuration) -> Self {
        let start = i64::from(start.hour()) * 60 + i64::from(start.minute());
        TimeWindow::from_start_and_duration(start, duration.as_mins())
    }

    pub fn span(&self) -> i64 {
        self.end - self.start
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            format_clock(self.start),
            format_clock(self.end)
        )
    }
}

/// `H:MM`, hours keep counting past midnight of the first day.
pub fn format_clock(minutes: i64) -> String {
    format!("{}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}

/// `Xh Ym`.
pub fn format_minutes(minutes: i64) -> String {
    format!("{}h {}m", minutes.div_euclid(60), minutes.rem_euclid(60))
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("time window end ({end}) must be after its start ({start})")]
    EmptyTimeWindow { start: i64, end: i64 },
    #[error("max route duration must be positive, got {0}")]
    MaxRouteDuration(i64),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
pub struct InvalidParams(pub Vec<ParamError>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveParams {
    pub num_vehicles: usize,
    /// Maximum number of customers per vehicle.
    pub vehicle_capacity: u32,
    /// Minutes spent at each customer.
    pub service_time: i64,
    pub time_window: TimeWindow,
    /// Minutes; the window span when not set.
    pub max_route_duration: Option<i64>,
    pub avg_speed_mph: f64,
    pub time_budget: SignedDuration,
    /// Keeps only the first rows of the location file, 0 keeps them all.
    pub location_limit: usize,
}

impl Default for SolveParams {
    fn default() -> Self {
        SolveParams {
            num_vehicles: 5,
            vehicle_capacity: 99,
            service_time: 60,
            time_window: TimeWindow::from_start_and_duration(9 * 60, 8 * 60),
            max_route_duration: None,
            avg_speed_mph: 30.0,
            time_budget: SignedDuration::from_secs(60),
            location_limit: 0,
        }
    }
}

fn check_range(
    errors: &mut Vec<ParamError>,
    name: &'static str,
    value: f64,
    (min, max): (f64, f64),
) {
    // NaN fails both comparisons and lands here too
    if !(min..=max).contains(&value) {
        errors.push(ParamError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
}

impl SolveParams {
    pub fn max_route_duration(&self) -> i64 {
        self.max_route_duration
            .unwrap_or_else(|| self.time_window.span())
    }

    pub fn validate(&self) -> Result<(), InvalidParams> {
        let mut errors = vec![];

        check_range(&mut errors, "vehicle count", self.num_vehicles as f64, (1.0, 100.0));
        check_range(
            &mut errors,
            "vehicle capacity",
            f64::from(self.vehicle_capacity),
            (1.0, 200.0),
        );
        check_range(
            &mut errors,
            "service time",
            self.service_time as f64,
            (1.0, 240.0),
        );
        check_range(
            &mut errors,
            "time window start",
            self.time_window.start as f64,
            (0.0, (MINUTES_PER_DAY - 1) as f64),
        );

        if self.time_window.end <= self.time_window.start {
            errors.push(ParamError::EmptyTimeWindow {
                start: self.time_window.start,
                end: self.time_window.end,
            });
        } else {
            check_range(
                &mut errors,
                "time window duration",
                self.time_window.span() as f64,
                (1.0, MAX_WINDOW_MINUTES as f64),
            );
        }

        if let Some(max_route_duration) = self.max_route_duration
            && max_route_duration <= 0
        {
            errors.push(ParamError::MaxRouteDuration(max_route_duration));
        }

        check_range(&mut errors, "average speed", self.avg_speed_mph, (10.0, 70.0));
        check_range(
            &mut errors,
            "time budget in seconds",
            self.time_budget.as_secs_f64(),
            (10.0, 300.0),
        );
        check_range(
            &mut errors,
            "location limit",
            self.location_limit as f64,
            (0.0, 1000.0),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvalidParams(errors))
        }
    }
}

/// Ready-made parameter sets for the sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Example1,
    Example2,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Example1, Preset::Example2];

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Example1 => "Small problem: 20 locations, 60-min service",
            Preset::Example2 => "30 locations, 30-min service",
        }
    }

    pub fn params(&self) -> SolveParams {
        let (vehicle_capacity, service_time, location_limit) = match self {
            Preset::Example1 => (5, 60, 20),
            Preset::Example2 => (8, 30, 30),
        };

        SolveParams {
            num_vehicles: 5,
            vehicle_capacity,
            service_time,
            time_window: TimeWindow::from_start_and_duration(9 * 60, 8 * 60),
            max_route_duration: None,
            avg_speed_mph: 30.0,
            time_budget: SignedDuration::from_secs(30),
            location_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = SolveParams::default();

        assert!(params.validate().is_ok());
        assert_eq!(params.time_window, TimeWindow::new(540, 1020));
        assert_eq!(params.max_route_duration(), 480);
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in Preset::ALL {
            assert!(preset.params().validate().is_ok(), "{preset:?}");
        }

        assert_eq!(Preset::Example2.params().vehicle_capacity, 8);
        assert_eq!(Preset::Example1.params().location_limit, 20);
    }

    #[test]
    fn test_window_end_not_after_start() {
        let params = SolveParams {
            time_window: TimeWindow::new(600, 600),
            ..SolveParams::default()
        };

        assert_eq!(
            params.validate(),
            Err(InvalidParams(vec![ParamError::EmptyTimeWindow {
                start: 600,
                end: 600,
            }]))
        );
    }

    #[test]
    fn test_every_violation_is_reported() {
        let params = SolveParams {
            num_vehicles: 0,
            vehicle_capacity: 201,
            service_time: 0,
            avg_speed_mph: 75.0,
            time_budget: SignedDuration::from_secs(5),
            location_limit: 1001,
            max_route_duration: Some(0),
            ..SolveParams::default()
        };

        let InvalidParams(errors) = params.validate().unwrap_err();
        assert_eq!(errors.len(), 7);
        assert!(errors.contains(&ParamError::MaxRouteDuration(0)));
    }

    #[test]
    fn test_multi_day_window() {
        let window = TimeWindow::from_start_and_duration(540, 48 * 60);
        let params = SolveParams {
            time_window: window,
            ..SolveParams::default()
        };

        assert!(params.validate().is_ok());
        assert_eq!(params.max_route_duration(), 2880);
        assert_eq!(window.to_string(), "9:00 - 57:00");
    }

    #[test]
    fn test_window_longer_than_a_week() {
        let params = SolveParams {
            time_window: TimeWindow::from_start_and_duration(0, MAX_WINDOW_MINUTES + 1),
            ..SolveParams::default()
        };

        assert!(params.validate().is_err());
    }

    #[test]
    fn test_nan_speed_is_rejected() {
        let params = SolveParams {
            avg_speed_mph: f64::NAN,
            ..SolveParams::default()
        };

        assert!(params.validate().is_err());
    }

    #[test]
    fn test_from_clock() {
        let window = TimeWindow::from_clock(
            Time::new(8, 30, 0, 0).unwrap(),
            SignedDuration::from_mins(90),
        );

        assert_eq!(window, TimeWindow::new(510, 600));
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(125), "2h 5m");
        assert_eq!(format_clock(1020), "17:00");
    }

    #[test]
    fn test_params_from_json() {
        let params: SolveParams =
            serde_json::from_str(r#"{"num_vehicles": 3, "time_budget": "PT30S"}"#).unwrap();

        assert_eq!(params.num_vehicles, 3);
        assert_eq!(params.time_budget, SignedDuration::from_secs(30));
        assert_eq!(params.vehicle_capacity, 99);
    }
}

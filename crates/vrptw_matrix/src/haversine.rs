use geo::{Distance, HaversineMeasure};

/// Mean Earth radius used for every great-circle computation, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Great-circle distance in miles between two points given as (lon, lat).
pub fn haversine_miles<P>(from: P, to: P) -> f64
where
    P: Into<geo::Point>,
{
    HaversineMeasure::new(EARTH_RADIUS_MILES).distance(from.into(), to.into())
}

/// Travel time in whole minutes, truncated toward zero.
///
/// A 0.4 mile hop at 30 mph takes 0.8 minutes and is reported as 0.
pub fn travel_minutes(distance_miles: f64, avg_speed_mph: f64) -> i64 {
    (distance_miles / avg_speed_mph * 60.0).floor() as i64
}

#[cfg(test)]
mod tests {
    use geo_types::Point;

    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = Point::new(-77.6109, 43.1566);
        assert_eq!(haversine_miles(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);

        let expected = EARTH_RADIUS_MILES * 1.0_f64.to_radians();
        assert!((haversine_miles(a, b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_known_city_pair() {
        // Rochester, NY to Buffalo, NY as the crow flies
        let rochester = Point::new(-77.6109, 43.1566);
        let buffalo = Point::new(-78.8784, 42.8864);

        let distance = haversine_miles(rochester, buffalo);
        assert!((distance - 66.645_510_208_543).abs() < 1e-9, "{distance}");
    }

    #[test]
    fn test_antipodal_points() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(180.0, 0.0);

        let expected = EARTH_RADIUS_MILES * std::f64::consts::PI;
        assert!((haversine_miles(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_travel_minutes_truncates() {
        assert_eq!(travel_minutes(0.4, 30.0), 0);
        assert_eq!(travel_minutes(10.0, 20.0), 30);
        assert_eq!(travel_minutes(14.99, 30.0), 29);
        assert_eq!(travel_minutes(15.0, 30.0), 30);
        assert_eq!(travel_minutes(0.0, 10.0), 0);
    }
}

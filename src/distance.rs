//! Great-circle distance between two coordinate pairs.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two lat/lng points.
///
/// Inputs are assumed to be already-validated finite coordinates.
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    // Floating-point rounding can push `a` slightly outside [0, 1] for
    // near-antipodal points, which would put sqrt out of its domain.
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(40.7128, -74.0060, 40.7128, -74.0060), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(distance_km(-90.0, 180.0, -90.0, 180.0), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let forward = distance_km(40.7128, -74.0060, 51.5074, -0.1278);
        let backward = distance_km(51.5074, -0.1278, 40.7128, -74.0060);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_new_york_to_london() {
        let d = distance_km(40.7128, -74.0060, 51.5074, -0.1278);
        assert!((d - 5570.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        // Half the Earth's circumference, and no NaN from sqrt domain overshoot.
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - 20015.0).abs() < 10.0, "got {}", d);

        let d = distance_km(45.0, 0.0, -45.0, 180.0);
        assert!(d.is_finite());
        assert!((d - 20015.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_short_hop() {
        // Minneapolis to St. Paul is roughly 16 km
        let d = distance_km(44.98, -93.27, 44.95, -93.09);
        assert!(d > 15.0 && d < 17.0, "got {}", d);
    }
}

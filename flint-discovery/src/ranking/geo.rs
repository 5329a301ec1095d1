use flint_shared::errors::{AppError, AppResult, ErrorCode};

const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance between two (latitude, longitude) pairs in degrees,
/// in miles, rounded to one decimal place.
///
/// Coordinates outside [-90, 90] / [-180, 180] are rejected. Scoring callers
/// treat a missing or invalid coordinate as "distance unknown" instead of
/// failing the batch.
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> AppResult<f64> {
    validate(lat1, lon1)?;
    validate(lat2, lon2)?;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(round_tenth(EARTH_RADIUS_MILES * c))
}

fn validate(lat: f64, lon: f64) -> AppResult<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::new(
            ErrorCode::InvalidCoordinates,
            format!("coordinates out of range: ({lat}, {lon})"),
        ));
    }
    Ok(())
}

fn round_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        assert_eq!(distance_miles(0.0, 0.0, 0.0, 0.0).unwrap(), 0.0);
        assert_eq!(distance_miles(51.5074, -0.1278, 51.5074, -0.1278).unwrap(), 0.0);
    }

    #[test]
    fn symmetric() {
        let ab = distance_miles(40.7128, -74.0060, 34.0522, -118.2437).unwrap();
        let ba = distance_miles(34.0522, -118.2437, 40.7128, -74.0060).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn known_pair_nyc_to_la() {
        // Great-circle NYC -> LA is about 2,445 miles.
        let d = distance_miles(40.7128, -74.0060, 34.0522, -118.2437).unwrap();
        assert!((2400.0..2500.0).contains(&d), "got {d}");
    }

    #[test]
    fn rounded_to_one_decimal() {
        let d = distance_miles(51.5074, -0.1278, 48.8566, 2.3522).unwrap();
        assert_eq!(d, round_tenth(d));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(distance_miles(91.0, 0.0, 0.0, 0.0).is_err());
        assert!(distance_miles(0.0, 181.0, 0.0, 0.0).is_err());
        assert!(distance_miles(0.0, 0.0, -90.5, 0.0).is_err());
        assert!(distance_miles(0.0, 0.0, 0.0, -180.5).is_err());
    }

    #[test]
    fn poles_are_valid() {
        assert!(distance_miles(90.0, 180.0, -90.0, -180.0).is_ok());
    }
}

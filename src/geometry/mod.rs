mod sphere;

pub use sphere::{coverage_central_angle, destination_point};

/// Equatorial radius used by the coverage model (km).
pub const EARTH_RADIUS_KM: f64 = 6378.135;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Wraps a longitude into `[0, 360)`.
pub fn normalize_360(lon_deg: f64) -> f64 {
    let lon = lon_deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_180(lon_deg: f64) -> f64 {
    let lon = normalize_360(lon_deg);
    if lon >= 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::PI;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(180.0, PI)]
    #[case(-90.0, -PI / 2.0)]
    #[case(360.0, 2.0 * PI)]
    fn degrees_and_radians_agree(#[case] deg: f64, #[case] rad: f64) {
        assert!((deg_to_rad(deg) - rad).abs() < 1e-12);
        assert!((rad_to_deg(rad) - deg).abs() < 1e-9);
    }

    #[test]
    fn conversions_invert_each_other() {
        for i in -720..=720 {
            let deg = i as f64 * 0.5;
            assert!((rad_to_deg(deg_to_rad(deg)) - deg).abs() < 1e-9);
        }
    }

    #[rstest]
    #[case(-10.0, 350.0)]
    #[case(360.0, 0.0)]
    #[case(725.0, 5.0)]
    #[case(-1e-20, 0.0)]
    fn wraps_into_positive_frame(#[case] input: f64, #[case] expected: f64) {
        assert!((normalize_360(input) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(190.0, -170.0)]
    #[case(180.0, -180.0)]
    #[case(-181.0, 179.0)]
    #[case(45.0, 45.0)]
    fn wraps_into_signed_frame(#[case] input: f64, #[case] expected: f64) {
        assert!((normalize_180(input) - expected).abs() < 1e-9);
    }
}

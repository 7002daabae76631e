use super::{deg_to_rad, rad_to_deg, EARTH_RADIUS_KM};

/// Earth central angle (radians) between the sub-satellite point and the edge
/// of the footprint seen above `min_elevation_deg` from `altitude_km`.
pub fn coverage_central_angle(altitude_km: f64, min_elevation_deg: f64) -> f64 {
    let elevation = deg_to_rad(min_elevation_deg);
    (elevation.cos() / (1.0 + altitude_km / EARTH_RADIUS_KM)).acos() - elevation
}

/// Point reached travelling `angular_distance` radians from `(lat_deg, lon_deg)`
/// along the great circle with initial `bearing_deg` (clockwise from north).
///
/// Longitude is returned unwrapped, continuous with `lon_deg`, so callers can
/// compare it against other longitudes in the same frame.
pub fn destination_point(
    lat_deg: f64,
    lon_deg: f64,
    bearing_deg: f64,
    angular_distance: f64,
) -> (f64, f64) {
    let lat1 = deg_to_rad(lat_deg);
    let lon1 = deg_to_rad(lon_deg);
    let bearing = deg_to_rad(bearing_deg);
    let (sin_d, cos_d) = angular_distance.sin_cos();

    let lat2 = (lat1.sin() * cos_d + lat1.cos() * sin_d * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * sin_d * lat1.cos()).atan2(cos_d - lat1.sin() * lat2.sin());

    (rad_to_deg(lat2), rad_to_deg(lon2))
}

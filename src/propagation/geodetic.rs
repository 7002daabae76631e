use crate::geometry::{normalize_180, rad_to_deg};

use super::{EciState, GeodeticFix};

// WGS-84
const WGS84_A_KM: f64 = 6378.137;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const MAX_ITERATIONS: usize = 20;
const LATITUDE_TOLERANCE_RAD: f64 = 1e-12;

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Geodetic latitude, longitude and altitude of an inertial state.
///
/// Latitude is solved iteratively on the WGS-84 ellipsoid. Velocity is the
/// magnitude of the inertial velocity vector.
pub fn eci_to_geodetic(state: &EciState, gmst: f64) -> GeodeticFix {
    let [x, y, z] = teme_to_ecef_position(state.position_km, gmst);
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let r = x.hypot(y);

    let mut latitude = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + WGS84_A_KM * c * e2 * sin_lat).atan2(r);
        let done = (next - latitude).abs() < LATITUDE_TOLERANCE_RAD;
        latitude = next;
        if done {
            break;
        }
    }

    let altitude_km = if latitude.cos().abs() > 1e-9 {
        r / latitude.cos() - WGS84_A_KM * c
    } else {
        z.abs() - WGS84_A_KM * (1.0 - WGS84_F)
    };

    let [vx, vy, vz] = state.velocity_km_s;

    GeodeticFix {
        latitude_deg: rad_to_deg(latitude),
        longitude_deg: normalize_180(rad_to_deg(y.atan2(x))),
        altitude_km,
        velocity_km_s: (vx * vx + vy * vy + vz * vz).sqrt(),
    }
}

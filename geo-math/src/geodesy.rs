//! Great-circle geodesy primitives.
//!
//! Distances between GPS fixes are computed on a spherical Earth using
//! the haversine formulation, which stays well-conditioned at the short
//! separations a single site plan covers.

/// Mean Earth radius in meters (IUGG mean radius).
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance in meters between two GPS coordinates.
///
/// # Arguments
/// * `lat1`, `lng1` - First coordinate in decimal degrees
/// * `lat2`, `lng2` - Second coordinate in decimal degrees
///
/// # Returns
/// Distance along the sphere surface in meters
pub fn haversine_distance_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();
    let lat1r = lat1.to_radians();
    let lat2r = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1r.cos() * lat2r.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Normalize an angle in radians into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(2.0 * std::f64::consts::PI);
    if wrapped > std::f64::consts::PI {
        wrapped - 2.0 * std::f64::consts::PI
    } else {
        wrapped
    }
}

//! Great-circle distance helpers.

use nearby_core::Coordinate;

/// Mean Earth radius in metres used for all reported distances.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in metres.
#[must_use]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Position on the unit sphere.
///
/// Chord length between unit vectors grows monotonically with the
/// great-circle angle, so nearest-by-chord is nearest-by-haversine.
pub(crate) fn unit_vector(c: Coordinate) -> [f64; 3] {
    let lat = c.lat.to_radians();
    let lon = c.lon.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

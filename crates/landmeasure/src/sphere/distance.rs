use super::types::{Coordinate, CoordinateRing, EARTH_RADIUS_M};

/// Central angle (radians) between two points via the haversine formula.
///
/// `sqrt(h)` is clamped to 1 so rounding near antipodes cannot push `asin` out of domain.
pub fn central_angle(a: Coordinate, b: Coordinate) -> f64 {
    let p = a.radians();
    let q = b.radians();
    let half_dlat = (q.y - p.y) / 2.0;
    let half_dlon = (q.x - p.x) / 2.0;
    let h = half_dlat.sin().powi(2) + p.y.cos() * q.y.cos() * half_dlon.sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Great-circle distance in meters on the Earth sphere.
#[inline]
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

/// Boundary length in meters, including the edge from the last vertex back to the first.
///
/// For a pre-closed ring that final edge has length 0.
pub fn ring_perimeter_m(ring: &CoordinateRing) -> f64 {
    let v = ring.vertices();
    let n = v.len();
    (0..n).map(|i| haversine_m(v[i], v[(i + 1) % n])).sum()
}

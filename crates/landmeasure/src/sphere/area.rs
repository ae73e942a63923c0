//! Enclosed area on a sphere (spherical shoelace).

use nalgebra::Vector2;

use super::types::{Coordinate, CoordinateRing, EARTH_RADIUS_M, M2_PER_HECTARE};

/// Area enclosed by `vertices` on a sphere of `radius`, in squared radius units.
///
/// Every index i contributes `(lon[i+1] - lon[i-1]) · sin(lat[i])` with modular
/// wraparound, so the ring is closed implicitly and an explicit closing
/// duplicate cancels out. Winding order does not matter (absolute value).
/// Fewer than 3 vertices enclose nothing and return 0.
pub fn spherical_polygon_area(vertices: &[Coordinate], radius: f64) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let rad: Vec<Vector2<f64>> = vertices.iter().map(Coordinate::radians).collect();
    let mut sum = 0.0;
    for i in 0..n {
        let lower = rad[(i + n - 1) % n];
        let middle = rad[i];
        let upper = rad[(i + 1) % n];
        sum += (upper.x - lower.x) * middle.y.sin();
    }
    sum.abs() * radius * radius / 2.0
}

/// Ring area in square meters on the Earth sphere.
#[inline]
pub fn ring_area_m2(ring: &CoordinateRing) -> f64 {
    spherical_polygon_area(ring.vertices(), EARTH_RADIUS_M)
}

/// Ring area in hectares.
#[inline]
pub fn ring_area_hectares(ring: &CoordinateRing) -> f64 {
    ring_area_m2(ring) / M2_PER_HECTARE
}

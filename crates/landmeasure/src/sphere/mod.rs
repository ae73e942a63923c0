//! Geometry on a spherical Earth.
//!
//! Purpose
//! - Validate traced boundaries into a `CoordinateRing` and measure them.
//! - Area and perimeter share one radius (`EARTH_RADIUS_M`) so the two
//!   results stay mutually consistent.
//!
//! Model
//! - Coordinates are `(lon, lat)` in decimal degrees, converted to radians
//!   only inside the formulas.
//! - Area uses the longitude-delta / sine-of-latitude summation with modular
//!   wraparound; a duplicated closing vertex contributes nothing extra.
//! - Distances use the haversine formula, clamped against rounding overshoot.
//!
//! Code cross-refs: `CoordinateRing`, `ring_area_m2`, `haversine_m`, `ring_perimeter_m`

mod area;
mod distance;
mod types;

pub use area::{ring_area_hectares, ring_area_m2, spherical_polygon_area};
pub use distance::{central_angle, haversine_m, ring_perimeter_m};
pub use types::{
    Coordinate, CoordinateRing, EARTH_RADIUS_M, M2_PER_HECTARE, MIN_OPEN_VERTICES, MIN_RING_LEN,
};

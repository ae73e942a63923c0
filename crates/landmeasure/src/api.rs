//! Curated internal API for the CLI (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for in-tree callers.
//!   Breaking changes are allowed and expected.

// Geometry
pub use crate::sphere::{
    haversine_m, ring_area_hectares, ring_area_m2, ring_perimeter_m, Coordinate, CoordinateRing,
    EARTH_RADIUS_M, M2_PER_HECTARE,
};
// Records and request/response shapes
pub use crate::record::{CalculationRequest, Measurement, MeasurementRecord};
// Stores
pub use crate::store::{JsonlStore, MeasurementStore, MemoryStore, StoreError};
// Glue
pub use crate::service::{Clock, MeasurementService, SystemClock, HISTORY_LIMIT};
pub use crate::{MeasureError, Result};

/// Compute a measurement for a ring without persisting anything.
///
/// Post: `Ok` values are finite and non-negative.
pub fn measure(ring: &CoordinateRing) -> Result<Measurement> {
    crate::service::compute(ring)
}

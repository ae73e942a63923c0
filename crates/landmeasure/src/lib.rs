//! Spherical land measurement: area and perimeter of traced regions.
//!
//! Layout
//! - `sphere`: coordinates, validated rings, area/distance/perimeter math.
//! - `record`: immutable measurement records and the request/response shapes.
//! - `store`: the append-only record log trait plus memory and JSON-lines stores.
//! - `service`: validate → compute → persist → report glue.
//! - `rand`: seeded random rings for property tests and benchmarks.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - The CLI crate is the only in-tree consumer; prefer `api` re-exports there.

pub mod api;
pub mod error;
pub mod rand;
pub mod record;
pub mod service;
pub mod sphere;
pub mod store;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{MeasureError, Result};
pub use sphere::{Coordinate, CoordinateRing, EARTH_RADIUS_M};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::record::{CalculationRequest, Measurement, MeasurementRecord};
    pub use crate::service::{Clock, MeasurementService, SystemClock, HISTORY_LIMIT};
    pub use crate::sphere::{
        haversine_m, ring_area_hectares, ring_area_m2, ring_perimeter_m, Coordinate,
        CoordinateRing, EARTH_RADIUS_M,
    };
    pub use crate::store::{JsonlStore, MeasurementStore, MemoryStore, StoreError};
    pub use crate::{MeasureError, Result};
}

//! Measurement records and the request/response shapes around them.
//!
//! Wire names are camelCase (`areaHectares`, `perimeterMeters`) so stored
//! records and responses keep the shape map clients already consume.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::sphere::CoordinateRing;

/// Body of a calculation request: `{ "coordinates": [[lon, lat], ...] }`.
///
/// `coordinates` stays untyped so shape errors are reported by
/// `CoordinateRing::from_json` rather than by the decoder.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CalculationRequest {
    #[serde(default)]
    pub coordinates: Option<Value>,
}

/// Calculation response.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub area_hectares: f64,
    pub perimeter_meters: f64,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area: {:.4} ha - Perimeter: {:.2} m",
            self.area_hectares, self.perimeter_meters
        )
    }
}

/// One persisted calculation. Immutable after construction.
///
/// `coordinates` holds exactly one ring (a polygon without holes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    coordinates: [CoordinateRing; 1],
    area_hectares: f64,
    perimeter_meters: f64,
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
}

impl MeasurementRecord {
    pub fn new(ring: CoordinateRing, measurement: Measurement, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinates: [ring],
            area_hectares: measurement.area_hectares,
            perimeter_meters: measurement.perimeter_meters,
            timestamp,
        }
    }

    #[inline]
    pub fn ring(&self) -> &CoordinateRing {
        &self.coordinates[0]
    }

    /// Polygon view: the outer sequence of rings (always length 1).
    #[inline]
    pub fn coordinates(&self) -> &[CoordinateRing] {
        &self.coordinates
    }

    #[inline]
    pub fn area_hectares(&self) -> f64 {
        self.area_hectares
    }

    #[inline]
    pub fn perimeter_meters(&self) -> f64 {
        self.perimeter_meters
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn measurement(&self) -> Measurement {
        Measurement {
            area_hectares: self.area_hectares,
            perimeter_meters: self.perimeter_meters,
        }
    }
}

impl fmt::Display for MeasurementRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.measurement(), f)
    }
}

//! Calculation and history requests over an explicit store.
//!
//! Flow: validate → area + perimeter → record → append → report.
//! The store append happens before anything is returned; if it fails the
//! request fails and the computed values are dropped.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::record::{CalculationRequest, Measurement, MeasurementRecord};
use crate::sphere::{ring_area_hectares, ring_perimeter_m, CoordinateRing};
use crate::store::MeasurementStore;
use crate::{MeasureError, Result};

/// Maximum number of records returned by `history`.
pub const HISTORY_LIMIT: usize = 10;

/// Source of record creation times.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pure part of a calculation: both scalars or a `Computation` error.
pub(crate) fn compute(ring: &CoordinateRing) -> Result<Measurement> {
    let area_hectares = ring_area_hectares(ring);
    let perimeter_meters = ring_perimeter_m(ring);
    if !area_hectares.is_finite() || !perimeter_meters.is_finite() {
        return Err(MeasureError::Computation(format!(
            "non-finite result (area {area_hectares} ha, perimeter {perimeter_meters} m)"
        )));
    }
    Ok(Measurement {
        area_hectares,
        perimeter_meters,
    })
}

/// Owns the store handle for the lifetime of the process-level service.
#[derive(Debug)]
pub struct MeasurementService<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: MeasurementStore> MeasurementService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: MeasurementStore, C: Clock> MeasurementService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the store (e.g. to close it explicitly).
    pub fn into_store(self) -> S {
        self.store
    }

    /// Measure `ring`, persist the record, and report the measurement.
    pub fn calculate(&self, ring: CoordinateRing) -> Result<Measurement> {
        let measurement = compute(&ring).inspect_err(|err| {
            tracing::warn!(%err, vertices = ring.len(), "calculation_failed");
        })?;
        tracing::debug!(
            vertices = ring.len(),
            closed = ring.is_closed(),
            area_hectares = measurement.area_hectares,
            perimeter_meters = measurement.perimeter_meters,
            "measured"
        );
        let record = MeasurementRecord::new(ring, measurement, self.clock.now());
        self.store.append(record).map_err(|err| {
            tracing::warn!(%err, "append_failed");
            MeasureError::from(err)
        })?;
        Ok(measurement)
    }

    /// Validate an untyped coordinate candidate, then `calculate`.
    pub fn calculate_json(&self, candidate: Option<&Value>) -> Result<Measurement> {
        let ring = CoordinateRing::from_json(candidate).inspect_err(|err| {
            tracing::warn!(%err, "rejected");
        })?;
        self.calculate(ring)
    }

    /// Handle a decoded request body.
    pub fn handle(&self, request: &CalculationRequest) -> Result<Measurement> {
        self.calculate_json(request.coordinates.as_ref())
    }

    /// Up to `HISTORY_LIMIT` records, newest first. Empty when nothing was stored.
    pub fn history(&self) -> Result<Vec<MeasurementRecord>> {
        self.store.recent(HISTORY_LIMIT).map_err(|err| {
            tracing::warn!(%err, "history_failed");
            MeasureError::from(err)
        })
    }
}

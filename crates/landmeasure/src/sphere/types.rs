//! Coordinates, rings, and the constants shared by the sphere formulas.
//!
//! - `Coordinate`: `(lon, lat)` degrees, serialized as `[lon, lat]`.
//! - `CoordinateRing`: ≥ 4 vertices, closure expected but not enforced.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{MeasureError, Result};

/// Sphere radius used by both area and distance (WGS84 semi-major axis).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;
/// Square meters per hectare.
pub const M2_PER_HECTARE: f64 = 10_000.0;
/// Minimum ring length, counting the duplicated closing vertex.
pub const MIN_RING_LEN: usize = 4;
/// Minimum number of distinct traced vertices before a ring can be closed.
pub const MIN_OPEN_VERTICES: usize = 3;

/// Geographic position in decimal degrees. Ranges are not enforced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `(lon, lat)` in radians.
    #[inline]
    pub fn radians(&self) -> Vector2<f64> {
        Vector2::new(self.lon.to_radians(), self.lat.to_radians())
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

/// Closed polygon boundary without holes.
///
/// Enforced: at least `MIN_RING_LEN` vertices. Not enforced: first == last,
/// coordinate ranges, absence of self-intersection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct CoordinateRing {
    vertices: Vec<Coordinate>,
}

impl CoordinateRing {
    /// Wrap `vertices` unchanged (no dedup, no closure repair, no clamping).
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self> {
        if vertices.len() < MIN_RING_LEN {
            return Err(MeasureError::validation(format!(
                "a closed polygon needs at least {MIN_RING_LEN} points, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Close an open trace by repeating its first vertex at the end.
    ///
    /// Pre: at least `MIN_OPEN_VERTICES` traced vertices.
    pub fn close_from_vertices(mut open: Vec<Coordinate>) -> Result<Self> {
        if open.len() < MIN_OPEN_VERTICES {
            return Err(MeasureError::validation(format!(
                "tracing a region needs at least {MIN_OPEN_VERTICES} points, got {}",
                open.len()
            )));
        }
        let first = open[0];
        open.push(first);
        Self::new(open)
    }

    /// Validate an untyped candidate (e.g. a decoded request body field).
    ///
    /// Fails when the candidate is missing or null, is not an array, has fewer
    /// than `MIN_RING_LEN` elements, or holds an element that is not a
    /// 2-element numeric pair.
    pub fn from_json(candidate: Option<&Value>) -> Result<Self> {
        let items = match candidate {
            None | Some(Value::Null) => {
                return Err(MeasureError::validation("coordinates are missing"));
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(MeasureError::validation(
                    "coordinates must be a sequence of [longitude, latitude] pairs",
                ));
            }
        };
        if items.len() < MIN_RING_LEN {
            return Err(MeasureError::validation(format!(
                "a closed polygon needs at least {MIN_RING_LEN} points, got {}",
                items.len()
            )));
        }
        let vertices = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Coordinate::deserialize(item).map_err(|err| {
                    MeasureError::validation(format!(
                        "vertex {i} is not a [longitude, latitude] pair: {err}"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(vertices)
    }

    #[inline]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false for a constructed ring; kept for slice-like ergonomics.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// First vertex equals the last one.
    pub fn is_closed(&self) -> bool {
        self.vertices.first() == self.vertices.last()
    }

    /// Same vertices in the opposite traversal order.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }
}

impl TryFrom<Vec<Coordinate>> for CoordinateRing {
    type Error = MeasureError;

    fn try_from(vertices: Vec<Coordinate>) -> Result<Self> {
        Self::new(vertices)
    }
}

impl From<CoordinateRing> for Vec<Coordinate> {
    fn from(ring: CoordinateRing) -> Self {
        ring.vertices
    }
}

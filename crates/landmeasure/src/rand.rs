//! Random star-shaped rings around a center (radial jitter, seeded).
//!
//! Model
//! - `n` equally spaced bearings on [0, 2π) plus an optional global phase,
//!   each at distance `radius_m · (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
//! - Offsets are mapped to degrees with a local tangent-plane approximation,
//!   which keeps the ring simple (no self-intersection) for small radii.
//! - The returned ring is closed (first vertex repeated at the end).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::sphere::{Coordinate, CoordinateRing, EARTH_RADIUS_M, MIN_OPEN_VERTICES};
use crate::Result;

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RingCfg {
    /// Distinct vertices before closing. Raised to 3 if smaller.
    pub vertex_count: usize,
    /// Mean distance from the center, meters.
    pub radius_m: f64,
    /// Relative radial amplitude. Clamped to [0, 0.95].
    pub radial_jitter: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}

impl Default for RingCfg {
    fn default() -> Self {
        Self {
            vertex_count: 12,
            radius_m: 500.0,
            radial_jitter: 0.25,
            random_phase: true,
        }
    }
}

/// Draw one closed ring around `center`. Same `(center, cfg, seed)` → same ring.
pub fn draw_ring_radial(center: Coordinate, cfg: RingCfg, seed: u64) -> Result<CoordinateRing> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = cfg.vertex_count.max(MIN_OPEN_VERTICES);
    let jitter = cfg.radial_jitter.clamp(0.0, 0.95);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    let cos_lat = center.lat.to_radians().cos().max(1e-6);
    let step = std::f64::consts::TAU / n as f64;
    let open = (0..n)
        .map(|k| {
            let theta = phase + step * k as f64;
            let u = if jitter > 0.0 {
                rng.gen_range(-jitter..=jitter)
            } else {
                0.0
            };
            let r = cfg.radius_m * (1.0 + u);
            let dlat = (r * theta.sin() / EARTH_RADIUS_M).to_degrees();
            let dlon = (r * theta.cos() / (EARTH_RADIUS_M * cos_lat)).to_degrees();
            Coordinate::new(center.lon + dlon, center.lat + dlat)
        })
        .collect();
    CoordinateRing::close_from_vertices(open)
}

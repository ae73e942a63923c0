//! Trace a few random fields, store them in memory, and print the history.
//!
//! Usage:
//!   cargo run -p landmeasure --example trace_field -- [count]

use landmeasure::prelude::*;
use landmeasure::rand::{draw_ring_radial, RingCfg};

fn main() -> Result<()> {
    let count: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let svc = MeasurementService::new(MemoryStore::new());
    let center = Coordinate::new(78.9629, 20.5937);
    for seed in 0..count {
        let cfg = RingCfg {
            radius_m: 100.0 + 50.0 * seed as f64,
            ..RingCfg::default()
        };
        let ring = draw_ring_radial(center, cfg, seed)?;
        let m = svc.calculate(ring)?;
        println!("field {seed}: {m}");
    }
    for record in svc.history()? {
        println!("{} {}", record.timestamp().to_rfc3339(), record);
    }
    Ok(())
}

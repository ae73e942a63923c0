//! Tabular export of measurement history (CSV or Parquet, by extension).

use anyhow::{bail, Context, Result};
use landmeasure::api::MeasurementRecord;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// One row per record: timestamp, both scalars, vertex count, ring as JSON.
pub fn history_frame(records: &[MeasurementRecord]) -> Result<DataFrame> {
    let timestamps: Vec<String> = records.iter().map(|r| r.timestamp().to_rfc3339()).collect();
    let area: Vec<f64> = records.iter().map(|r| r.area_hectares()).collect();
    let perimeter: Vec<f64> = records.iter().map(|r| r.perimeter_meters()).collect();
    let vertices: Vec<u32> = records.iter().map(|r| r.ring().len() as u32).collect();
    let rings = records
        .iter()
        .map(|r| serde_json::to_string(r.ring()))
        .collect::<serde_json::Result<Vec<String>>>()?;
    let df = df!(
        "timestamp" => timestamps,
        "area_hectares" => area,
        "perimeter_meters" => perimeter,
        "vertices" => vertices,
        "ring" => rings
    )?;
    Ok(df)
}

pub fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let ext = out.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "csv" => {
            let mut file =
                File::create(out).with_context(|| format!("creating {}", out.display()))?;
            CsvWriter::new(&mut file).include_header(true).finish(df)?;
        }
        "parquet" => {
            let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
            ParquetWriter::new(file).finish(df)?;
        }
        other => bail!("unsupported export format {other:?} (use .csv or .parquet)"),
    }
    tracing::info!(rows = df.height(), out = %out.display(), "exported");
    Ok(())
}

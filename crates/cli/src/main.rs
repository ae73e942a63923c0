use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use landmeasure::api::{
    CalculationRequest, JsonlStore, MeasurementRecord, MeasurementService, MeasurementStore,
    MemoryStore, StoreError,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod export;
mod provenance;

#[derive(Parser)]
#[command(name = "landmeasure-cli")]
#[command(about = "Measure traced land regions and recall recent results")]
struct Cmd {
    /// JSON-lines measurement log
    #[arg(
        long,
        global = true,
        env = "LANDMEASURE_STORE",
        default_value = "data/measurements.jsonl"
    )]
    store: PathBuf,

    /// Keep records in memory only; nothing outlives the process
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Measure a ring of [longitude, latitude] pairs and store the result
    Calculate {
        /// Inline JSON: a bare array of pairs or `{"coordinates": [...]}`
        #[arg(long, conflicts_with = "input")]
        coords: Option<String>,
        /// File holding the same JSON
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Show the most recent measurements, newest first
    History {
        #[arg(long)]
        json: bool,
    },
    /// Write recent history as a table (.csv or .parquet) plus provenance
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Store chosen on the command line; closed explicitly before exit.
enum StoreHandle {
    Memory(MemoryStore),
    File(JsonlStore),
}

impl StoreHandle {
    fn open(cmd: &Cmd) -> Result<Self> {
        if cmd.memory {
            return Ok(StoreHandle::Memory(MemoryStore::new()));
        }
        let store = JsonlStore::open(&cmd.store)
            .with_context(|| format!("opening store {}", cmd.store.display()))?;
        Ok(StoreHandle::File(store))
    }

    fn describe(&self) -> String {
        match self {
            StoreHandle::Memory(_) => "memory".to_string(),
            StoreHandle::File(s) => s.path().display().to_string(),
        }
    }

    fn close(&self) -> Result<()> {
        if let StoreHandle::File(s) = self {
            s.close()?;
        }
        Ok(())
    }
}

impl MeasurementStore for StoreHandle {
    fn append(&self, record: MeasurementRecord) -> Result<(), StoreError> {
        match self {
            StoreHandle::Memory(s) => s.append(record),
            StoreHandle::File(s) => s.append(record),
        }
    }

    fn recent(&self, limit: usize) -> Result<Vec<MeasurementRecord>, StoreError> {
        match self {
            StoreHandle::Memory(s) => s.recent(limit),
            StoreHandle::File(s) => s.recent(limit),
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    let cmd = Cmd::parse();
    let svc = MeasurementService::new(StoreHandle::open(&cmd)?);
    let outcome = match cmd.action {
        Action::Calculate { coords, input } => calculate(&svc, coords, input),
        Action::History { json } => history(&svc, json),
        Action::Export { out } => export_history(&svc, out),
        Action::Report => report(&svc),
    };
    let closed = svc.into_store().close();
    outcome.and(closed)
}

/// Accept either a request body or a bare coordinate array.
fn parse_request(raw: &str) -> Result<CalculationRequest> {
    let value: Value = serde_json::from_str(raw).context("input is not valid JSON")?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value)?,
        other => CalculationRequest {
            coordinates: Some(other),
        },
    })
}

fn calculate(
    svc: &MeasurementService<StoreHandle>,
    coords: Option<String>,
    input: Option<PathBuf>,
) -> Result<()> {
    let raw = match (coords, input) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        (None, None) => bail!("pass --coords or --input"),
    };
    let request = parse_request(&raw)?;
    let measurement = svc.handle(&request)?;
    tracing::info!(%measurement, "calculated");
    println!("{}", serde_json::to_string_pretty(&measurement)?);
    Ok(())
}

fn history(svc: &MeasurementService<StoreHandle>, as_json: bool) -> Result<()> {
    let records = match svc.history() {
        Ok(records) => records,
        Err(err) => {
            println!("Error loading history.");
            return Err(err.into());
        }
    };
    if as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No history yet.");
    } else {
        for record in &records {
            println!("{} {}", record.timestamp().to_rfc3339(), record);
        }
    }
    Ok(())
}

fn export_history(svc: &MeasurementService<StoreHandle>, out: PathBuf) -> Result<()> {
    let records = svc.history()?;
    let mut df = export::history_frame(&records)?;
    export::write_table(&mut df, &out)?;
    let prov = provenance::Provenance::new(
        &svc.store().describe(),
        json!({ "rows": records.len(), "format": out.extension().and_then(|e| e.to_str()) }),
    );
    let sidecar = provenance::write_sidecar(&out, prov)?;
    tracing::info!(sidecar = %sidecar.display(), "provenance");
    Ok(())
}

fn report(svc: &MeasurementService<StoreHandle>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "version": landmeasure::VERSION,
        "store": svc.store().describe(),
        "history_limit": landmeasure::api::HISTORY_LIMIT,
        "earth_radius_m": landmeasure::EARTH_RADIUS_M,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_consistent() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn coords_and_input_conflict() {
        let parsed = Cmd::try_parse_from([
            "landmeasure-cli",
            "calculate",
            "--coords",
            "[]",
            "--input",
            "ring.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_store_flags_after_subcommand() {
        let cmd = Cmd::try_parse_from(["landmeasure-cli", "history", "--memory", "--json"]).unwrap();
        assert!(cmd.memory);
        assert!(matches!(cmd.action, Action::History { json: true }));
    }

    #[test]
    fn parse_request_accepts_body_or_bare_array() {
        let bare = parse_request("[[0,0],[0,1],[1,0],[0,0]]").unwrap();
        assert!(bare.coordinates.unwrap().is_array());
        let body = parse_request(r#"{"coordinates": [[0,0],[0,1],[1,0],[0,0]]}"#).unwrap();
        assert!(body.coordinates.unwrap().is_array());
        let empty = parse_request("{}").unwrap();
        assert!(empty.coordinates.is_none());
        assert!(parse_request("not json").is_err());
    }

    #[test]
    fn file_store_round_trip_through_service() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("m.jsonl");
        let cmd = Cmd::try_parse_from([
            "landmeasure-cli",
            "history",
            "--store",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let svc = MeasurementService::new(StoreHandle::open(&cmd).unwrap());
        let req = parse_request("[[0,0],[0,0.01],[0.01,0.01],[0.01,0],[0,0]]").unwrap();
        svc.handle(&req).unwrap();
        assert_eq!(svc.history().unwrap().len(), 1);
        svc.into_store().close().unwrap();

        let reopened = MeasurementService::new(StoreHandle::open(&cmd).unwrap());
        assert_eq!(reopened.history().unwrap().len(), 1);
    }
}

//! confsched-gen — conference schedule generator
//!
//! Parses the hand-authored order file into an agenda, resolves every
//! scheduled item against the metadata facade, and writes the combined
//! result as JSON. Items without metadata are reported as warnings and
//! emitted as `null` — gaps are surfaced, never guessed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use confsched_agenda::{parse_order_file, Agenda};
use confsched_common::config::{resolve_data_root, DataLayout};
use confsched_common::Error;
use confsched_metadata::{MetadataRecord, ScheduleMetadata};

#[derive(Parser)]
#[clap(name = "confsched-gen")]
#[clap(about = "Resolve a conference order file into a metadata-enriched JSON agenda")]
struct Args {
    /// Data root containing the order/, mapping/, xml/ and extra/ subdirectories
    #[clap(long)]
    data_root: Option<String>,

    /// Event namespace used for unscoped item lookups
    #[clap(long, default_value = "main")]
    event: String,

    /// Order file to parse (default: <data root>/order/order.txt)
    #[clap(long, value_name = "FILE")]
    order: Option<PathBuf>,

    /// Write the JSON here instead of stdout
    #[clap(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Emitted JSON: the schedule tree plus one metadata entry per item ID
#[derive(Serialize)]
struct ResolvedSchedule {
    agenda: Agenda,
    metadata: BTreeMap<String, Option<MetadataRecord>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting confsched-gen v{}", env!("CARGO_PKG_VERSION"));

    let layout = DataLayout::new(resolve_data_root(args.data_root.as_deref()));
    info!("Data root: {}", layout.root().display());

    let order_path = args
        .order
        .clone()
        .unwrap_or_else(|| layout.order_dir().join("order.txt"));
    let agenda = parse_order_file(&order_path)
        .with_context(|| format!("failed to parse order file {}", order_path.display()))?;
    info!(
        "Parsed agenda: {} days, {} scheduled items",
        agenda.days.len(),
        agenda.items().count()
    );

    let xmls = files_with_extension(&layout.xml_dir(), "xml")?;
    let mappings = files_with_suffix(&layout.mapping_dir(), "_id_map.txt")?;
    let overlays = files_with_suffix(&layout.extra_dir(), "_extra.tsv")?;
    info!(
        "Metadata sources: {} xml, {} mapping, {} extra",
        xmls.len(),
        mappings.len(),
        overlays.len()
    );

    let sm = ScheduleMetadata::from_sources(&xmls, &mappings, &overlays, &args.event)
        .context("failed to build schedule metadata")?;

    let mut metadata = BTreeMap::new();
    let mut missing = 0usize;
    for item in agenda.items() {
        let record = match sm.lookup_in(&item.id, &args.event) {
            Ok(record) => Some(record.clone()),
            Err(Error::NotFound { .. }) => {
                warn!("no metadata for item '{}' (event '{}')", item.id, args.event);
                missing += 1;
                None
            }
            Err(err) => return Err(err.into()),
        };
        metadata.insert(item.id.clone(), record);
    }
    if missing > 0 {
        warn!("{} scheduled items have no metadata yet", missing);
    }

    let resolved = ResolvedSchedule { agenda, metadata };
    let json = serde_json::to_string_pretty(&resolved)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Collect `dir/*.<ext>`, sorted by name so last-write-wins merging across
/// republished sources is deterministic.
fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ext) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Collect `dir/<event><suffix>` files as (event, path) pairs, sorted.
fn files_with_suffix(dir: &Path, suffix: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if let Some(event) = name.strip_suffix(suffix) {
                if !event.is_empty() {
                    files.push((event.to_string(), path));
                }
            }
        }
    }
    files.sort();
    Ok(files)
}

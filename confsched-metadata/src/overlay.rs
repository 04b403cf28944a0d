//! Extra-metadata overlay: per-event fallback records for IDs that never
//! appear in any anthology source
//!
//! Each file is a tab-separated table of
//! `<ID>\t<title>\t<authors>\t<abstract>` rows, with the authors field a
//! `;`-separated list. An optional header row (first field `id` or
//! `paper_id`) is tolerated. Overlay records carry no pdf/video URLs.

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use confsched_common::{Error, Result};

use crate::record::MetadataRecord;

/// Separator for the authors field within one row
const AUTHOR_SEPARATOR: char = ';';

/// Immutable per-event order-file-ID → metadata maps
#[derive(Debug, Default)]
pub struct ExtraMetadataOverlay {
    events: HashMap<String, HashMap<String, MetadataRecord>>,
}

impl ExtraMetadataOverlay {
    /// Parse one or more overlay TSV files, each scoped to its named event.
    pub fn from_files(overlays: &[(String, PathBuf)]) -> Result<Self> {
        let mut overlay = ExtraMetadataOverlay::default();
        for (event, path) in overlays {
            let file = std::fs::File::open(path)?;
            debug!("loading extra metadata for event '{}' from {}", event, path.display());
            overlay.parse_overlay(event, file)?;
        }
        Ok(overlay)
    }

    pub fn get(&self, event: &str, order_id: &str) -> Option<&MetadataRecord> {
        self.events.get(event)?.get(order_id)
    }

    fn parse_overlay<R: Read>(&mut self, event: &str, source: R) -> Result<()> {
        let map = self.events.entry(event.to_string()).or_default();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(source);

        for (index, row) in reader.records().enumerate() {
            let row = row?;
            if index == 0 && matches!(row.get(0), Some("id") | Some("paper_id")) {
                continue;
            }

            let id = field(&row, 0, event, "id")?;
            let title = field(&row, 1, event, "title")?;
            let authors = row
                .get(2)
                .unwrap_or("")
                .split(AUTHOR_SEPARATOR)
                .map(str::trim)
                .filter(|author| !author.is_empty())
                .map(str::to_string)
                .collect();
            let abstract_text = row.get(3).unwrap_or("").trim().to_string();

            map.insert(
                id,
                MetadataRecord {
                    title,
                    authors,
                    abstract_text,
                    pdf_url: String::new(),
                    video_url: String::new(),
                },
            );
        }
        Ok(())
    }
}

fn field(row: &csv::StringRecord, index: usize, event: &str, name: &str) -> Result<String> {
    let value = row.get(index).map(str::trim).unwrap_or("");
    if value.is_empty() {
        return Err(Error::Data(format!(
            "extra-metadata row for event '{}' is missing its {} field: {:?}",
            event, name, row
        )));
    }
    Ok(value.to_string())
}

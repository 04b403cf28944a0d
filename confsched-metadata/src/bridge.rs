//! ID bridge: per-event mapping from order-file ID to anthology ID
//!
//! Mapping files are tab-separated `<order-file ID>\t<anthology ID>` rows,
//! one file per named event. Events are independent namespaces: the same
//! literal order-file ID may appear in different events with unrelated
//! meanings. Suffixed IDs ("7-tutorial", "45-srw") are opaque string keys;
//! suffix conventions are an authoring convention upstream, not parsed here.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use confsched_common::{Error, Result};

/// Immutable per-event order-file-ID → anthology-ID maps
#[derive(Debug, Default)]
pub struct IdBridge {
    events: HashMap<String, HashMap<String, String>>,
}

impl IdBridge {
    /// Parse one or more mapping files, each scoped to its named event.
    pub fn from_files(mappings: &[(String, PathBuf)]) -> Result<Self> {
        let mut bridge = IdBridge::default();
        for (event, path) in mappings {
            let text = std::fs::read_to_string(path)?;
            debug!("loading id mapping for event '{}' from {}", event, path.display());
            bridge.parse_mapping(event, &text)?;
        }
        Ok(bridge)
    }

    /// Resolve an order-file ID within one event's namespace.
    pub fn resolve(&self, event: &str, order_id: &str) -> Option<&str> {
        self.events
            .get(event)?
            .get(order_id)
            .map(String::as_str)
    }

    /// The full mapping for one event, if any file declared it.
    pub fn map_for(&self, event: &str) -> Option<&HashMap<String, String>> {
        self.events.get(event)
    }

    fn parse_mapping(&mut self, event: &str, text: &str) -> Result<()> {
        let map = self.events.entry(event.to_string()).or_default();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (order_id, anthology_id) = line.split_once('\t').ok_or_else(|| {
                Error::Data(format!(
                    "malformed mapping row for event '{}': '{}'",
                    event, line
                ))
            })?;
            let order_id = order_id.trim();
            let anthology_id = anthology_id.trim();
            if order_id.is_empty() || anthology_id.is_empty() {
                return Err(Error::Data(format!(
                    "empty id in mapping row for event '{}': '{}'",
                    event, line
                )));
            }
            // Ambiguous mapping within one event's namespace
            if map
                .insert(order_id.to_string(), anthology_id.to_string())
                .is_some()
            {
                return Err(Error::Data(format!(
                    "duplicate order-file id '{}' in event '{}' mapping",
                    order_id, event
                )));
            }
        }
        Ok(())
    }
}

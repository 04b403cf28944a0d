//! Schedule-metadata facade: one lookup surface over three sources
//!
//! The three maps are built once at construction and stay immutable; the
//! precedence rule is an explicit function rather than an eager merge, so
//! it can be tested directly. The anthology is the canonical source once a
//! paper is indexed there: an overlay entry never shadows a present
//! anthology record.

use std::path::PathBuf;

use tracing::debug;

use confsched_common::{Error, Result};

use crate::anthology::AnthologyIndex;
use crate::bridge::IdBridge;
use crate::overlay::ExtraMetadataOverlay;
use crate::record::MetadataRecord;

/// Composed lookup facade keyed by order-file ID (event-scoped) or
/// anthology ID (unscoped)
#[derive(Debug)]
pub struct ScheduleMetadata {
    anthology: AnthologyIndex,
    bridge: IdBridge,
    overlay: ExtraMetadataOverlay,
    default_event: String,
}

impl ScheduleMetadata {
    /// Build the facade from its source files. Construction errors are
    /// fatal; only lookups may fail recoverably afterwards.
    pub fn from_sources(
        xmls: &[PathBuf],
        mappings: &[(String, PathBuf)],
        overlays: &[(String, PathBuf)],
        default_event: &str,
    ) -> Result<Self> {
        let anthology = AnthologyIndex::from_files(xmls)?;
        let bridge = IdBridge::from_files(mappings)?;
        let overlay = ExtraMetadataOverlay::from_files(overlays)?;
        debug!(
            "schedule metadata ready: {} anthology records, default event '{}'",
            anthology.len(),
            default_event
        );
        Ok(Self {
            anthology,
            bridge,
            overlay,
            default_event: default_event.to_string(),
        })
    }

    /// Look up an ID in the default event's namespace.
    pub fn lookup(&self, id: &str) -> Result<&MetadataRecord> {
        self.lookup_in(id, &self.default_event)
    }

    /// Look up an ID in a named event's namespace.
    ///
    /// Resolution order: anthology-shaped IDs go straight to the anthology
    /// index; otherwise the event's ID bridge resolves to an anthology
    /// record; the extra-metadata overlay is consulted only when the
    /// anthology path yields nothing.
    pub fn lookup_in(&self, id: &str, event: &str) -> Result<&MetadataRecord> {
        if is_anthology_id(id) {
            return self.lookup_anthology(id);
        }

        if let Some(anthology_id) = self.bridge.resolve(event, id) {
            if let Some(record) = self.anthology.get(anthology_id) {
                return Ok(record);
            }
            debug!(
                "bridged id {} -> {} absent from anthology, trying overlay",
                id, anthology_id
            );
        }

        if let Some(record) = self.overlay.get(event, id) {
            return Ok(record);
        }

        Err(Error::NotFound {
            id: id.to_string(),
            event: Some(event.to_string()),
        })
    }

    /// Direct lookup by anthology ID; needs no event since anthology IDs
    /// are globally unique.
    pub fn lookup_anthology(&self, anthology_id: &str) -> Result<&MetadataRecord> {
        self.anthology
            .get(anthology_id)
            .ok_or_else(|| Error::NotFound {
                id: anthology_id.to_string(),
                event: None,
            })
    }
}

/// Whether an ID has the anthology shape: an uppercase collection letter,
/// two digits, a hyphen, then the paper number (e.g. "N19-5002").
/// Order-file IDs always start with a digit, so the spaces are disjoint.
fn is_anthology_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    bytes.len() > 4
        && bytes[0].is_ascii_uppercase()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
        && bytes[3] == b'-'
        && bytes[4..].iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const XML: &str = r#"<volume>
  <paper id="5002">
    <title>Transfer Learning Tutorial</title>
    <author><first>Sebastian</first><last>Ruder</last></author>
    <url>http://www.aclweb.org/anthology/N19-5002</url>
  </paper>
  <paper id="1074">
    <title>Practical Semantic Parsing</title>
    <author><first>Ada</first><last>Lovelace</last></author>
    <url>http://www.aclweb.org/anthology/N19-1074</url>
  </paper>
</volume>"#;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn build_facade(dir: &Path) -> ScheduleMetadata {
        let xml = write(dir, "N19.xml", XML);
        let mapping = write(dir, "main_id_map.txt", "7-tutorial\tN19-5002\n737\tN19-1074\n");
        // 737 also has an overlay row: the anthology must win.
        let extra = write(
            dir,
            "main_extra.tsv",
            "737\tShadowing Title\tNobody\t\n12-demo\tLive Demo of a Parser\tGrace Hopper\t\n",
        );

        ScheduleMetadata::from_sources(
            &[xml],
            &[("main".to_string(), mapping)],
            &[("main".to_string(), extra)],
            "main",
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_via_bridge_returns_anthology_record() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        let record = sm.lookup("7-tutorial").unwrap();
        assert_eq!(record.title, "Transfer Learning Tutorial");
        assert_eq!(record.authors, vec!["Sebastian Ruder"]);
    }

    #[test]
    fn test_anthology_beats_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        // "737" is present both through the bridge->anthology path and in
        // the overlay; the anthology-sourced record must be returned.
        let record = sm.lookup("737").unwrap();
        assert_eq!(record.title, "Practical Semantic Parsing");
    }

    #[test]
    fn test_overlay_fallback_when_no_bridge_entry() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        let record = sm.lookup("12-demo").unwrap();
        assert_eq!(record.title, "Live Demo of a Parser");
        assert_eq!(record.pdf_url, "");
    }

    #[test]
    fn test_anthology_id_lookup_ignores_event() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        let a = sm.lookup_in("N19-5002", "main").unwrap();
        let b = sm.lookup_in("N19-5002", "some other event").unwrap();
        let c = sm.lookup_anthology("N19-5002").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_anthology_shaped_id_never_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        match sm.lookup("N19-9999").unwrap_err() {
            Error::NotFound { id, event } => {
                assert_eq!(id, "N19-9999");
                assert_eq!(event, None);
            }
            other => panic!("expected not-found, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_id_and_event_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let sm = build_facade(dir.path());

        match sm.lookup_in("999", "srw").unwrap_err() {
            Error::NotFound { id, event } => {
                assert_eq!(id, "999");
                assert_eq!(event.as_deref(), Some("srw"));
            }
            other => panic!("expected not-found, got {:?}", other),
        }
    }

    #[test]
    fn test_bridged_id_absent_from_anthology_falls_back_to_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let xml = write(dir.path(), "N19.xml", XML);
        let mapping = write(dir.path(), "main_id_map.txt", "55\tN19-0000\n");
        let extra = write(dir.path(), "main_extra.tsv", "55\tPending Paper\tB Two\t\n");

        let sm = ScheduleMetadata::from_sources(
            &[xml],
            &[("main".to_string(), mapping)],
            &[("main".to_string(), extra)],
            "main",
        )
        .unwrap();

        assert_eq!(sm.lookup("55").unwrap().title, "Pending Paper");
    }

    #[test]
    fn test_is_anthology_id_shape() {
        assert!(is_anthology_id("N19-5002"));
        assert!(is_anthology_id("W19-0401"));
        assert!(is_anthology_id("S19-1007"));
        assert!(!is_anthology_id("737"));
        assert!(!is_anthology_id("7-tutorial"));
        assert!(!is_anthology_id("N19-"));
        assert!(!is_anthology_id("n19-5002"));
    }
}

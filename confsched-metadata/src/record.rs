//! Bibliographic metadata record shared by all three sources

use serde::Serialize;

/// Metadata for one scheduled item, from exactly one authoritative source.
/// Optional fields default to an empty string rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    pub title: String,
    /// Ordered author list, "First Last" per entry
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub pdf_url: String,
    pub video_url: String,
}

impl MetadataRecord {
    /// Render the author list for schedule display: "A, B and C"
    pub fn authors_display(&self) -> String {
        match self.authors.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [head @ .., last] => format!("{} and {}", head.join(", "), last),
        }
    }
}

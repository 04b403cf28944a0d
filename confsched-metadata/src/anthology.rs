//! Anthology index: bibliographic XML sources keyed by anthology ID
//!
//! Each XML source contributes `<paper id="...">` entries; the anthology ID
//! is `<file stem>-<paper id>` (e.g. stem `N19` + id `5002` → `N19-5002`),
//! matching the external ID scheme. Anthology IDs are globally unique by
//! construction; if two sources carry the same ID the later source silently
//! overrides the earlier one (republished records are expected).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use confsched_common::{Error, Result};

use crate::record::MetadataRecord;

/// Immutable map from anthology ID to metadata record
#[derive(Debug, Default)]
pub struct AnthologyIndex {
    records: HashMap<String, MetadataRecord>,
}

impl AnthologyIndex {
    /// Parse one or more anthology XML files, in last-write-wins order.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut index = AnthologyIndex::default();
        for path in paths {
            let stem = file_stem(path)?;
            let xml = std::fs::read_to_string(path)?;
            debug!("indexing anthology source {}", path.display());
            index.parse_source(&stem, &xml)?;
        }
        Ok(index)
    }

    pub fn get(&self, anthology_id: &str) -> Option<&MetadataRecord> {
        self.records.get(anthology_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse one XML source, merging its papers into the index.
    ///
    /// Text is deliberately not trimmed at the reader: mid-word markup
    /// such as `<fixed-case>E</fixed-case>nglish` splits a word across
    /// text events, and only exact concatenation reassembles it.
    fn parse_source(&mut self, stem: &str, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);

        let mut paper: Option<PaperState> = None;
        let mut field: Option<Field> = None;
        let mut in_author = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"paper" => {
                        let id = e
                            .try_get_attribute("id")
                            .map_err(quick_xml::Error::from)?
                            .map(|attr| attr.unescape_value())
                            .transpose()?
                            .map(|value| value.into_owned());
                        paper = Some(PaperState::new(id));
                    }
                    b"author" if paper.is_some() => in_author = true,
                    b"title" if paper.is_some() && field.is_none() => field = Some(Field::Title),
                    b"abstract" if paper.is_some() && field.is_none() => {
                        field = Some(Field::Abstract)
                    }
                    b"url" if paper.is_some() && field.is_none() => field = Some(Field::Url),
                    b"video" if paper.is_some() && field.is_none() => field = Some(Field::Video),
                    b"first" if in_author && field.is_none() => field = Some(Field::First),
                    b"last" if in_author && field.is_none() => field = Some(Field::Last),
                    _ => {}
                },

                Event::Empty(e) => {
                    // <video href="..."/> carries its URL as an attribute
                    if e.name().as_ref() == b"video" {
                        if let Some(paper) = paper.as_mut() {
                            let href = e
                                .try_get_attribute("href")
                                .map_err(quick_xml::Error::from)?;
                            if let Some(attr) = href {
                                paper.video_url = attr.unescape_value()?.into_owned();
                            }
                        }
                    }
                }

                Event::Text(t) => {
                    if let (Some(paper), Some(field)) = (paper.as_mut(), field.as_ref()) {
                        paper.append(field, &t.unescape()?);
                    }
                }

                Event::End(e) => match e.name().as_ref() {
                    b"paper" => {
                        if let Some(state) = paper.take() {
                            self.insert_paper(stem, state)?;
                        }
                        field = None;
                        in_author = false;
                    }
                    b"author" => {
                        if let Some(paper) = paper.as_mut() {
                            paper.finish_author();
                        }
                        in_author = false;
                    }
                    b"title" if matches!(field, Some(Field::Title)) => field = None,
                    b"abstract" if matches!(field, Some(Field::Abstract)) => field = None,
                    b"url" if matches!(field, Some(Field::Url)) => field = None,
                    b"video" if matches!(field, Some(Field::Video)) => field = None,
                    b"first" if matches!(field, Some(Field::First)) => field = None,
                    b"last" if matches!(field, Some(Field::Last)) => field = None,
                    _ => {}
                },

                Event::Eof => break,
                _ => {}
            }
        }

        Ok(())
    }

    fn insert_paper(&mut self, stem: &str, state: PaperState) -> Result<()> {
        let paper_id = state.id.as_deref().ok_or_else(|| {
            Error::Data(format!("paper without an id attribute in source '{}'", stem))
        })?;
        let anthology_id = format!("{}-{}", stem, paper_id);

        let record = MetadataRecord {
            title: state.title.trim().to_string(),
            authors: state.authors,
            abstract_text: state.abstract_text.trim().to_string(),
            pdf_url: state.pdf_url.trim().to_string(),
            video_url: state.video_url.trim().to_string(),
        };

        if self.records.insert(anthology_id.clone(), record).is_some() {
            debug!("anthology id {} republished, keeping later source", anthology_id);
        }
        Ok(())
    }
}

/// Text fields accumulated while inside a `<paper>` entry
enum Field {
    Title,
    Abstract,
    Url,
    Video,
    First,
    Last,
}

#[derive(Default)]
struct PaperState {
    id: Option<String>,
    title: String,
    abstract_text: String,
    pdf_url: String,
    video_url: String,
    authors: Vec<String>,
    first: String,
    last: String,
}

impl PaperState {
    fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Append text to the active field. Nested markup inside titles and
    /// abstracts (e.g. fixed-case tags) splits the text across multiple
    /// events; they concatenate exactly as written, and each field is
    /// trimmed once when the paper is finished.
    fn append(&mut self, field: &Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Abstract => &mut self.abstract_text,
            Field::Url => &mut self.pdf_url,
            Field::Video => &mut self.video_url,
            Field::First => &mut self.first,
            Field::Last => &mut self.last,
        };
        target.push_str(text);
    }

    fn finish_author(&mut self) {
        let full = format!("{} {}", self.first.trim(), self.last.trim());
        let full = full.trim().to_string();
        if !full.is_empty() {
            self.authors.push(full);
        }
        self.first.clear();
        self.last.clear();
    }
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .ok_or_else(|| Error::Data(format!("anthology source has no usable stem: {}", path.display())))
}

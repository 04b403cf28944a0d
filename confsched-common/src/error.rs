//! Common error types for the conference schedule toolkit

use thiserror::Error;

/// Common result type for schedule operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the schedule crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line or field does not match its expected grammar.
    /// Fatal to the parse; no partial agenda is produced.
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// A line is syntactically valid but illegal in context
    /// (e.g. an item outside any session). Fatal to the parse.
    #[error("structural error at line {line}: {message}")]
    Structural { line: usize, message: String },

    /// Ambiguous or malformed mapping/overlay data.
    /// Fatal to facade construction.
    #[error("data error: {0}")]
    Data(String),

    /// A lookup found no record in any source. Recoverable per-lookup;
    /// never aborts the facade.
    #[error("no metadata found for id '{id}'{}", event_suffix(.event))]
    NotFound { id: String, event: Option<String> },

    /// Configuration loading or validation error
    #[error("configuration error: {0}")]
    Config(String),

    /// XML parse error (wraps quick_xml::Error)
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// TSV parse error (wraps csv::Error)
    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn event_suffix(event: &Option<String>) -> String {
    match event {
        Some(event) => format!(" in event '{}'", event),
        None => String::new(),
    }
}

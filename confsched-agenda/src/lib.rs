//! Order-file parsing into a structured, time-ordered agenda
//!
//! The hand-authored order file is a line-oriented schedule skeleton:
//! day headers, session and session-group headers, and presentation item
//! references, pre-sorted chronologically. This crate classifies each line
//! by its leading sentinel, then assembles the nested schedule model in a
//! single forward pass. Malformed input fails loudly with file/line
//! context; nothing is silently dropped.

pub mod builder;
pub mod line;
pub mod model;

pub use builder::{parse_order_file, parse_order_text};
pub use model::{Agenda, Day, DayEntry, Item, Session, SessionGroup, SessionKind};

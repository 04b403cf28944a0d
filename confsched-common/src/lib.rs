//! # Confsched Common Library
//!
//! Shared code for the conference schedule toolkit:
//! - Error types (`Error` enum, `Result` alias)
//! - Time-of-day parsing for order-file header lines
//! - Data-root configuration resolution

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};

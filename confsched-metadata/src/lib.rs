//! Metadata resolution across three independently-keyed identifier spaces
//!
//! Scheduled items are identified three different ways: order-file IDs
//! (event-scoped, free-form, possibly suffixed), anthology IDs (globally
//! unique, from the bibliographic XML), and manually-curated fallback rows
//! for items that never reach the anthology. This crate parses each source
//! into its own immutable map and composes them behind one lookup facade
//! with deterministic precedence: the anthology is authoritative, the
//! overlay is only a fallback, and a miss is a recoverable `NotFound`.

pub mod anthology;
pub mod bridge;
pub mod facade;
pub mod overlay;
pub mod record;

pub use anthology::AnthologyIndex;
pub use bridge::IdBridge;
pub use facade::ScheduleMetadata;
pub use overlay::ExtraMetadataOverlay;
pub use record::MetadataRecord;

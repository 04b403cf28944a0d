//! Schedule model: the immutable tree built from one order file
//!
//! Ownership is strictly parent-to-child (Agenda owns Days, Days own
//! Sessions/SessionGroups, Sessions own Items) with no back-references.
//! The tree is constructed once by the builder and never mutated, so it is
//! safe to share read-only across any number of readers.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Default track tag for items without a hyphenated suffix
pub const MAIN_TRACK: &str = "main";

/// Root of the schedule model: the ordered days of one conference.
///
/// Days are in strictly increasing date order, matching input order;
/// the builder never re-sorts anything.
#[derive(Debug, Clone, Serialize)]
pub struct Agenda {
    pub days: Vec<Day>,
}

impl Agenda {
    /// All sessions across every day, in schedule order, with group
    /// children flattened in track order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.days.iter().flat_map(|day| {
            day.contents.iter().flat_map(|entry| match entry {
                DayEntry::Session(session) => std::slice::from_ref(session).iter(),
                DayEntry::Group(group) => group.sessions.iter(),
            })
        })
    }

    /// All presentation items across every session, in schedule order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.sessions().flat_map(|session| session.items.iter())
    }
}

/// One calendar date of the conference
#[derive(Debug, Clone, Serialize)]
pub struct Day {
    pub date: NaiveDate,
    /// Human-readable header text, e.g. "Monday, June 3, 2019"
    pub label: String,
    pub contents: Vec<DayEntry>,
}

/// One scheduled block on a day: either a standalone session or a group
/// of parallel tracks. Closed variant so consumers handle both cases.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum DayEntry {
    Session(Session),
    Group(SessionGroup),
}

/// A set of parallel sessions sharing one time slot.
/// Child order is input order (track order: 1A, 1B, 1C, ...).
#[derive(Debug, Clone, Serialize)]
pub struct SessionGroup {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub label: String,
    pub sessions: Vec<Session>,
}

/// Session type, closed over the three kinds the order file distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Plenary,
    Break,
    Presentation,
}

/// One scheduled time block; only presentation sessions own items
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub kind: SessionKind,
    pub title: String,
    pub room: Option<String>,
    /// Only ever set on plenary headers
    pub chair: Option<String>,
    pub items: Vec<Item>,
}

impl Session {
    pub fn is_presentation(&self) -> bool {
        self.kind == SessionKind::Presentation
    }
}

/// One presentation (paper/poster/tutorial/demo) reference
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Opaque order-file ID, including any hyphenated suffix ("23-tacl")
    pub id: String,
    /// Hyphenated suffix when present ("tacl"), otherwise "main"
    pub track: String,
    /// Inherited from the nearest preceding poster-topic marker
    /// within the same session
    pub topic: Option<String>,
}

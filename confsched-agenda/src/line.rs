//! Line classifier for the order-file grammar
//!
//! Each non-blank line is dispatched on its leading sentinel character:
//! `=` presentation session header, `!` plenary/break session header,
//! `+` session-group header, `@` poster-topic marker, a leading digit for
//! item references, and a bare date line for day headers. Anything else is
//! `Unrecognized` so the builder can fail with position context instead of
//! silently dropping content.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use confsched_common::time::parse_time_range;
use confsched_common::{Error, Result};

use crate::model::{SessionKind, MAIN_TRACK};

/// Date format of day-header lines, e.g. "Monday, June 3, 2019"
const DAY_HEADER_FORMAT: &str = "%A, %B %d, %Y";

/// Title words marking a `!` header as a break rather than a plenary
const BREAK_WORDS: &[&str] = &["break", "lunch", "coffee"];

/// One classified order-file line
#[derive(Debug, Clone, PartialEq)]
pub enum OrderLine {
    /// Date line opening a new day
    Day { date: NaiveDate, label: String },
    /// `+` header opening a group of parallel sessions
    Group {
        start: NaiveTime,
        end: NaiveTime,
        label: String,
    },
    /// `=` or `!` header opening a session
    Session {
        start: NaiveTime,
        end: NaiveTime,
        kind: SessionKind,
        title: String,
        room: Option<String>,
        chair: Option<String>,
    },
    /// Leading-digit reference to a presentation item
    Item { id: String, track: String },
    /// `@` marker labelling the posters that follow it
    PosterTopic { label: String },
    /// Structural separator, ignored downstream
    Blank,
    /// `#` comment line, ignored downstream
    Comment,
    /// Syntactically meaningless line; the builder reports it as an error
    Unrecognized,
}

/// Classify a single order-file line.
///
/// `lineno` is the 1-based position used for error context. Returns an
/// error only when a recognized sentinel carries a malformed field (bad
/// time range, missing title); lines that match no sentinel at all come
/// back as `OrderLine::Unrecognized`.
pub fn classify(raw: &str, lineno: usize) -> Result<OrderLine> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(OrderLine::Blank);
    }
    if line.starts_with('#') {
        return Ok(OrderLine::Comment);
    }

    match line.chars().next() {
        Some('=') => parse_session_header(&line[1..], lineno, true),
        Some('!') => parse_session_header(&line[1..], lineno, false),
        Some('+') => parse_group_header(&line[1..], lineno),
        Some('@') => parse_poster_topic(&line[1..], lineno),
        Some(c) if c.is_ascii_digit() => Ok(parse_item(line)),
        _ => Ok(parse_day_header(line)),
    }
}

/// Parse a `=`/`!` session header: time range, title, optional trailer
fn parse_session_header(body: &str, lineno: usize, is_presentation: bool) -> Result<OrderLine> {
    let (head, trailer) = split_trailer(body);
    let (range_token, title) = split_leading_token(head);

    let (start, end) = parse_time_range(range_token).ok_or_else(|| Error::Format {
        line: lineno,
        message: format!("malformed time range '{}'", range_token),
    })?;

    if title.is_empty() {
        return Err(Error::Format {
            line: lineno,
            message: "session header is missing a title".to_string(),
        });
    }

    let metadata = trailer.map(parse_inline_metadata).unwrap_or_default();
    let room = metadata.get("room").cloned();

    let (kind, chair) = if is_presentation {
        (SessionKind::Presentation, None)
    } else if is_break_title(title) {
        (SessionKind::Break, None)
    } else {
        let chair = metadata
            .get("chair1")
            .or_else(|| metadata.get("chair"))
            .cloned();
        (SessionKind::Plenary, chair)
    };

    Ok(OrderLine::Session {
        start,
        end,
        kind,
        title: title.to_string(),
        room,
        chair,
    })
}

/// Parse a `+` session-group header: time range plus label
fn parse_group_header(body: &str, lineno: usize) -> Result<OrderLine> {
    let (range_token, label) = split_leading_token(body.trim());

    let (start, end) = parse_time_range(range_token).ok_or_else(|| Error::Format {
        line: lineno,
        message: format!("malformed time range '{}'", range_token),
    })?;

    if label.is_empty() {
        return Err(Error::Format {
            line: lineno,
            message: "session group header is missing a label".to_string(),
        });
    }

    Ok(OrderLine::Group {
        start,
        end,
        label: label.to_string(),
    })
}

fn parse_poster_topic(body: &str, lineno: usize) -> Result<OrderLine> {
    let label = body.trim();
    if label.is_empty() {
        return Err(Error::Format {
            line: lineno,
            message: "poster topic marker is missing a label".to_string(),
        });
    }
    Ok(OrderLine::PosterTopic {
        label: label.to_string(),
    })
}

/// Parse an item reference: digits with an optional hyphenated alphabetic
/// suffix. Trailing per-item time ranges and `#` trailers are authoring
/// leftovers the schedule model does not carry; they are tolerated and
/// ignored. A malformed first token is `Unrecognized`.
fn parse_item(line: &str) -> OrderLine {
    let token = match line.split_whitespace().next() {
        Some(token) => token,
        None => return OrderLine::Unrecognized,
    };

    let (digits, suffix) = match token.split_once('-') {
        Some((digits, suffix)) => (digits, Some(suffix)),
        None => (token, None),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return OrderLine::Unrecognized;
    }
    if let Some(suffix) = suffix {
        if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            return OrderLine::Unrecognized;
        }
    }

    OrderLine::Item {
        id: token.to_string(),
        track: suffix.unwrap_or(MAIN_TRACK).to_string(),
    }
}

/// Parse a day header. Day lines carry no sentinel; a leading `* ` from
/// the hand-authored files is tolerated.
fn parse_day_header(line: &str) -> OrderLine {
    let text = line.strip_prefix("* ").unwrap_or(line).trim();
    match NaiveDate::parse_from_str(text, DAY_HEADER_FORMAT) {
        Ok(date) => OrderLine::Day {
            date,
            label: text.to_string(),
        },
        Err(_) => OrderLine::Unrecognized,
    }
}

/// Split a header body at its `#` metadata trailer, if any
fn split_trailer(body: &str) -> (&str, Option<&str>) {
    match body.split_once('#') {
        Some((head, trailer)) => (head.trim(), Some(trailer)),
        None => (body.trim(), None),
    }
}

/// Split off the first whitespace-delimited token (the time range)
fn split_leading_token(text: &str) -> (&str, &str) {
    match text.trim().split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (text.trim(), ""),
    }
}

/// Parse a `%key value %key value` metadata trailer into a map,
/// irrespective of the keys used. "%room FOO %chair1 BAR BAZ" yields
/// {"room": "FOO", "chair1": "BAR BAZ"}.
fn parse_inline_metadata(trailer: &str) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    for segment in trailer.split('%').skip(1) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match segment.split_once(char::is_whitespace) {
            Some((key, value)) => metadata.insert(key.to_string(), value.trim().to_string()),
            None => metadata.insert(segment.to_string(), String::new()),
        };
    }
    metadata
}

fn is_break_title(title: &str) -> bool {
    let lowered = title.to_lowercase();
    BREAK_WORDS.iter().any(|word| lowered.contains(word))
}

//! Agenda builder: one forward pass over the classified line stream
//!
//! The order file is guaranteed pre-sorted chronologically, so the builder
//! performs no sorting or time-based reconciliation; correctness relies on
//! preserving input order at every level (days, a group's child sessions,
//! a session's items). The only ordering check is a monotonicity sanity
//! check on day dates.

use std::path::Path;

use tracing::debug;

use confsched_common::{Error, Result};

use crate::line::{classify, OrderLine};
use crate::model::{Agenda, Day, DayEntry, Item, Session, SessionGroup, SessionKind};

/// Parse one order file from disk into an `Agenda`.
pub fn parse_order_file(path: &Path) -> Result<Agenda> {
    let text = std::fs::read_to_string(path)?;
    debug!("parsing order file {}", path.display());
    parse_order_text(&text)
}

/// Parse order-file text into an `Agenda`.
///
/// Fails with `Format`/`Structural` errors naming the offending 1-based
/// line; no partial agenda is ever returned.
pub fn parse_order_text(text: &str) -> Result<Agenda> {
    let mut builder = AgendaBuilder::default();
    for (index, raw) in text.lines().enumerate() {
        let lineno = index + 1;
        let line = classify(raw, lineno)?;
        builder.advance(line, raw, lineno)?;
    }
    builder.finish()
}

/// Parse state carried across lines: the day under construction lives at
/// the tail of `days`; `group` and `session` are the currently open
/// containers awaiting further lines.
#[derive(Default)]
struct AgendaBuilder {
    days: Vec<Day>,
    /// Open session group, if any
    group: Option<SessionGroup>,
    /// Open session, if any
    session: Option<Session>,
    /// Whether the open session was opened inside the open group
    session_in_group: bool,
    /// Poster topic applied to subsequently appended items; reset at each
    /// new session header
    topic: Option<String>,
}

impl AgendaBuilder {
    fn advance(&mut self, line: OrderLine, raw: &str, lineno: usize) -> Result<()> {
        match line {
            OrderLine::Blank | OrderLine::Comment => {}

            OrderLine::Day { date, label } => {
                self.close_group(lineno)?;
                if let Some(previous) = self.days.last() {
                    if date <= previous.date {
                        return Err(Error::Structural {
                            line: lineno,
                            message: format!(
                                "day '{}' is not after the preceding day '{}'",
                                label, previous.label
                            ),
                        });
                    }
                }
                self.days.push(Day {
                    date,
                    label,
                    contents: Vec::new(),
                });
            }

            OrderLine::Group { start, end, label } => {
                self.close_group(lineno)?;
                self.require_day(lineno, "session group header")?;
                self.group = Some(SessionGroup {
                    start,
                    end,
                    label,
                    sessions: Vec::new(),
                });
            }

            OrderLine::Session {
                start,
                end,
                kind,
                title,
                room,
                chair,
            } => {
                self.close_session(lineno)?;
                self.require_day(lineno, "session header")?;
                self.session_in_group = self.group.is_some();
                self.topic = None;
                self.session = Some(Session {
                    start,
                    end,
                    kind,
                    title,
                    room,
                    chair,
                    items: Vec::new(),
                });
            }

            OrderLine::Item { id, track } => {
                let topic = self.topic.clone();
                let session = self.session.as_mut().ok_or_else(|| Error::Structural {
                    line: lineno,
                    message: format!("item '{}' appears outside any session", id),
                })?;
                session.items.push(Item { id, track, topic });
            }

            OrderLine::PosterTopic { label } => {
                match &self.session {
                    Some(session) if session.kind == SessionKind::Presentation => {
                        self.topic = Some(label);
                    }
                    _ => {
                        return Err(Error::Structural {
                            line: lineno,
                            message: format!(
                                "poster topic '{}' appears outside a presentation session",
                                label
                            ),
                        });
                    }
                }
            }

            OrderLine::Unrecognized => {
                return Err(Error::Format {
                    line: lineno,
                    message: format!("unrecognized line: '{}'", raw.trim()),
                });
            }
        }
        Ok(())
    }

    /// Close the open session, attaching it to the open group when it was
    /// opened inside one, otherwise directly to the current day.
    fn close_session(&mut self, lineno: usize) -> Result<()> {
        if let Some(session) = self.session.take() {
            if self.session_in_group {
                if let Some(group) = self.group.as_mut() {
                    group.sessions.push(session);
                    return Ok(());
                }
            }
            self.current_day(lineno)?
                .contents
                .push(DayEntry::Session(session));
        }
        Ok(())
    }

    /// Close the open group (and any session inside it). Groups close only
    /// at the next group header, day header, or end of file.
    fn close_group(&mut self, lineno: usize) -> Result<()> {
        self.close_session(lineno)?;
        if let Some(group) = self.group.take() {
            self.current_day(lineno)?
                .contents
                .push(DayEntry::Group(group));
        }
        Ok(())
    }

    fn current_day(&mut self, lineno: usize) -> Result<&mut Day> {
        self.days.last_mut().ok_or_else(|| Error::Structural {
            line: lineno,
            message: "content before the first day header".to_string(),
        })
    }

    fn require_day(&self, lineno: usize, what: &str) -> Result<()> {
        if self.days.is_empty() {
            return Err(Error::Structural {
                line: lineno,
                message: format!("{} before the first day header", what),
            });
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Agenda> {
        // EOF closes whatever is still open; lineno 0 cannot surface since
        // an open container implies at least one day exists.
        let last_line = 0;
        self.close_group(last_line)?;
        debug!("built agenda with {} days", self.days.len());
        Ok(Agenda { days: self.days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use std::io::Write;

    const SAMPLE: &str = "\
* Monday, June 3, 2019

!9:00--9:30 Opening Remarks # %room Grand Ballroom %chair1 Jill Burstein

+11:00--12:30 Oral and Poster Sessions

=11:00--12:30 Session 1A: Machine Translation # %room Nicollet A %chair1 Marine Carpuat
737
25
614

=11:00--12:30 Session 1F: Posters (Question Answering, Resources) # %room Exhibit Hall
@ Question Answering
102
45-srw
@ Resources and Evaluation
211

!12:30--14:00 Lunch Break

Tuesday, June 4, 2019

=9:00--12:30 Tutorial T1: Transfer Learning # %room Greenway DE
7-tutorial
";

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_full_sample_structure() {
        let agenda = parse_order_text(SAMPLE).unwrap();
        assert_eq!(agenda.days.len(), 2);

        let monday = &agenda.days[0];
        assert_eq!(monday.date, NaiveDate::from_ymd_opt(2019, 6, 3).unwrap());
        assert_eq!(monday.label, "Monday, June 3, 2019");
        // Opening remarks, then the parallel group. The lunch break header
        // arrives while the group is still open, so it attaches to the
        // group: groups close only at the next group/day header or EOF.
        assert_eq!(monday.contents.len(), 2);

        match &monday.contents[0] {
            DayEntry::Session(session) => {
                assert_eq!(session.kind, SessionKind::Plenary);
                assert_eq!(session.title, "Opening Remarks");
                assert_eq!(session.start, time(9, 0));
                assert_eq!(session.end, time(9, 30));
                assert_eq!(session.room.as_deref(), Some("Grand Ballroom"));
                assert_eq!(session.chair.as_deref(), Some("Jill Burstein"));
                assert!(session.items.is_empty());
            }
            other => panic!("expected plenary session, got {:?}", other),
        }

        match &monday.contents[1] {
            DayEntry::Group(group) => {
                assert_eq!(group.label, "Oral and Poster Sessions");
                assert_eq!(group.start, time(11, 0));
                assert_eq!(group.end, time(12, 30));
                // Parallel tracks in input order: 1A before 1F, then the
                // trailing lunch break that arrived before the group closed
                let titles: Vec<&str> =
                    group.sessions.iter().map(|s| s.title.as_str()).collect();
                assert_eq!(titles.len(), 3);
                assert!(titles[0].starts_with("Session 1A"));
                assert!(titles[1].starts_with("Session 1F"));
                assert_eq!(group.sessions[2].kind, SessionKind::Break);
            }
            other => panic!("expected session group, got {:?}", other),
        }
    }

    #[test]
    fn test_item_count_and_order_preserved() {
        let agenda = parse_order_text(SAMPLE).unwrap();
        let item_lines = SAMPLE
            .lines()
            .filter(|l| l.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .count();
        assert_eq!(agenda.items().count(), item_lines);

        // Round-trip: re-serializing item IDs session by session reproduces
        // the input sequence verbatim.
        let ids: Vec<&str> = agenda.items().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["737", "25", "614", "102", "45-srw", "211", "7-tutorial"]
        );
    }

    #[test]
    fn test_poster_topic_scoping() {
        let agenda = parse_order_text(SAMPLE).unwrap();
        let poster_session = agenda
            .sessions()
            .find(|s| s.title.starts_with("Session 1F"))
            .unwrap();

        let topics: Vec<Option<&str>> = poster_session
            .items
            .iter()
            .map(|i| i.topic.as_deref())
            .collect();
        assert_eq!(
            topics,
            vec![
                Some("Question Answering"),
                Some("Question Answering"),
                Some("Resources and Evaluation"),
            ]
        );

        // Items in other sessions carry no topic
        let oral_session = agenda
            .sessions()
            .find(|s| s.title.starts_with("Session 1A"))
            .unwrap();
        assert!(oral_session.items.iter().all(|i| i.topic.is_none()));
    }

    #[test]
    fn test_items_before_first_topic_carry_no_topic() {
        let text = "\
Monday, June 3, 2019
=11:00--12:30 Posters
55
@ Dialogue
56
";
        let agenda = parse_order_text(text).unwrap();
        let topics: Vec<Option<&str>> = agenda.items().map(|i| i.topic.as_deref()).collect();
        assert_eq!(topics, vec![None, Some("Dialogue")]);
    }

    #[test]
    fn test_item_track_tags() {
        let agenda = parse_order_text(SAMPLE).unwrap();
        let tracks: Vec<&str> = agenda.items().map(|i| i.track.as_str()).collect();
        assert_eq!(
            tracks,
            vec!["main", "main", "main", "main", "srw", "main", "tutorial"]
        );
    }

    #[test]
    fn test_days_strictly_increasing() {
        let agenda = parse_order_text(SAMPLE).unwrap();
        let dates: Vec<NaiveDate> = agenda.days.iter().map(|d| d.date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_non_increasing_day_dates_rejected() {
        let text = "\
Tuesday, June 4, 2019
Monday, June 3, 2019
";
        match parse_order_text(text).unwrap_err() {
            Error::Structural { line, .. } => assert_eq!(line, 2),
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_item_outside_session_is_structural_error() {
        let text = "\
Monday, June 3, 2019
737
";
        match parse_order_text(text).unwrap_err() {
            Error::Structural { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("737"));
            }
            other => panic!("expected structural error, got {:?}", other),
        }
    }

    #[test]
    fn test_poster_topic_outside_presentation_session_rejected() {
        let text = "\
Monday, June 3, 2019
!12:30--14:00 Lunch Break
@ Dialogue
";
        assert!(matches!(
            parse_order_text(text).unwrap_err(),
            Error::Structural { line: 3, .. }
        ));
    }

    #[test]
    fn test_unrecognized_line_is_format_error() {
        let text = "\
Monday, June 3, 2019
this line means nothing
";
        match parse_order_text(text).unwrap_err() {
            Error::Format { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("this line means nothing"));
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_session_before_first_day_rejected() {
        let text = "=9:00--10:30 Session 1A: Parsing\n";
        assert!(matches!(
            parse_order_text(text).unwrap_err(),
            Error::Structural { line: 1, .. }
        ));
    }

    #[test]
    fn test_group_closes_only_at_day_group_or_eof() {
        // A plenary header between the group tracks stays inside the group;
        // the group closes at the next day header.
        let text = "\
Monday, June 3, 2019
+11:00--12:30 Parallel Block
=11:00--12:30 Session 1A: Parsing
10
!12:00--12:30 Best Paper Announcements
Tuesday, June 4, 2019
!9:00--10:00 Keynote
";
        let agenda = parse_order_text(text).unwrap();
        let monday = &agenda.days[0];
        assert_eq!(monday.contents.len(), 1);
        match &monday.contents[0] {
            DayEntry::Group(group) => {
                assert_eq!(group.sessions.len(), 2);
                assert_eq!(group.sessions[1].title, "Best Paper Announcements");
            }
            other => panic!("expected group, got {:?}", other),
        }
        // Tuesday's keynote is a direct day entry (no group open)
        assert_eq!(agenda.days[1].contents.len(), 1);
        assert!(matches!(agenda.days[1].contents[0], DayEntry::Session(_)));
    }

    #[test]
    fn test_group_open_at_eof_is_closed() {
        let text = "\
Monday, June 3, 2019
+11:00--12:30 Parallel Block
=11:00--12:30 Session 1A: Parsing
10
";
        let agenda = parse_order_text(text).unwrap();
        match &agenda.days[0].contents[0] {
            DayEntry::Group(group) => {
                assert_eq!(group.sessions.len(), 1);
                assert_eq!(group.sessions[0].items.len(), 1);
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_order_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let agenda = parse_order_file(file.path()).unwrap();
        assert_eq!(agenda.days.len(), 2);
    }

    #[test]
    fn test_malformed_file_yields_no_partial_agenda() {
        let text = "\
Monday, June 3, 2019
=11:00--12:30 Session 1A: Parsing
10
garbage here
";
        assert!(parse_order_text(text).is_err());
    }
}

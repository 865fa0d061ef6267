//! Line-oriented VEVENT parser.
//!
//! Deliberately forgiving: unknown properties are skipped, property order
//! inside a block does not matter, and blocks missing their key fields are
//! dropped with a warning instead of failing the whole document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

use crate::event::CalendarEvent;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";

/// Parse a whole ICS document into events keyed by UID.
///
/// Duplicate UIDs keep the first occurrence; later ones are reported and
/// dropped, preserving the oldest history.
pub fn parse_document(text: &str) -> BTreeMap<String, CalendarEvent> {
    let mut events = BTreeMap::new();
    let mut block: Option<Vec<(String, String)>> = None;

    for line in text.lines() {
        let line = line.trim_end();
        match line {
            BEGIN_EVENT => {
                if block.is_some() {
                    tracing::warn!("Unterminated VEVENT block, dropping it");
                }
                block = Some(Vec::new());
            }
            END_EVENT => match block.take() {
                Some(props) => {
                    if let Some(event) = build_event(&props) {
                        if events.contains_key(&event.uid) {
                            tracing::warn!(uid = %event.uid, "Duplicate UID, keeping first");
                        } else {
                            events.insert(event.uid.clone(), event);
                        }
                    }
                }
                None => tracing::warn!("END:VEVENT without matching BEGIN, ignoring"),
            },
            _ => {
                if let Some(props) = block.as_mut() {
                    if let Some((name, value)) = split_property(line) {
                        props.push((name, value));
                    }
                }
            }
        }
    }

    if block.is_some() {
        tracing::warn!("Document ended inside a VEVENT block, dropping it");
    }

    events
}

/// Split `NAME;PARAMS:VALUE` into the bare property name and its value.
fn split_property(line: &str) -> Option<(String, String)> {
    let (name_part, value) = line.split_once(':')?;
    let name = name_part.split(';').next().unwrap_or(name_part);
    Some((name.to_ascii_uppercase(), value.to_string()))
}

fn build_event(props: &[(String, String)]) -> Option<CalendarEvent> {
    let find = |name: &str| {
        props
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };

    let Some(uid) = find("UID") else {
        tracing::warn!("VEVENT without UID, dropping it");
        return None;
    };

    let Some(date) = find("DTSTART").and_then(parse_ics_date) else {
        tracing::warn!(uid, "VEVENT without parseable DTSTART, dropping it");
        return None;
    };

    // Missing DTSTAMP degrades to midnight of the event day.
    let created = find("DTSTAMP")
        .and_then(parse_ics_stamp)
        .unwrap_or_else(|| date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());

    Some(CalendarEvent {
        uid: uid.to_string(),
        created,
        date,
        summary: find("SUMMARY").unwrap_or_default().to_string(),
    })
}

fn parse_ics_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}

fn parse_ics_stamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ")
        .ok()
        .map(|dt| dt.and_utc())
}

//! Keyed calendar store with additive merge and atomic writes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CalendarError;
use crate::event::CalendarEvent;
use crate::parser::parse_document;

const HEADER: [&str; 3] = [
    "BEGIN:VCALENDAR",
    "VERSION:2.0",
    "PRODID:-//Rain Dots//IL//HE",
];
const FOOTER: &str = "END:VCALENDAR";

/// Owns the on-disk document and the in-memory UID-keyed view of it.
///
/// UIDs start with the ISO date, so the `BTreeMap` key order is
/// chronological and serialization just walks it in reverse.
#[derive(Debug, Clone)]
pub struct CalendarStore {
    path: PathBuf,
}

impl CalendarStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document into a UID-keyed map.
    ///
    /// A missing file or one malformed beyond recovery yields an empty map;
    /// history availability wins over strict continuity.
    pub fn load(&self) -> BTreeMap<String, CalendarEvent> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No calendar document yet, starting empty");
                return BTreeMap::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "Unreadable calendar document, starting empty: {e}");
                return BTreeMap::new();
            }
        };

        let events = parse_document(&text);
        tracing::info!(count = events.len(), "Loaded calendar events");
        events
    }

    /// Add events whose UID is not yet present. Existing entries are
    /// immutable history and are never touched. Returns how many were added.
    pub fn merge(
        existing: &mut BTreeMap<String, CalendarEvent>,
        new_events: Vec<CalendarEvent>,
    ) -> usize {
        let mut added = 0;
        for event in new_events {
            if existing.contains_key(&event.uid) {
                tracing::debug!(uid = %event.uid, "Event already recorded, keeping existing");
                continue;
            }
            existing.insert(event.uid.clone(), event);
            added += 1;
        }
        added
    }

    /// Serialize header, events newest-first, footer; write to a sibling
    /// temp file and rename it into place so a crash never leaves a torn
    /// document behind.
    pub fn save(&self, events: &BTreeMap<String, CalendarEvent>) -> Result<(), CalendarError> {
        let mut lines: Vec<String> = HEADER.iter().map(|s| s.to_string()).collect();
        for event in events.values().rev() {
            lines.push(event.to_ics_block());
        }
        lines.push(FOOTER.to_string());

        let mut contents = lines.join("\n");
        contents.push('\n');

        let tmp_path = self.path.with_extension("ics.tmp");
        std::fs::write(&tmp_path, &contents)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!(count = events.len(), path = %self.path.display(), "Saved calendar");
        Ok(())
    }
}

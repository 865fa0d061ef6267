use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const UID_SUFFIX: &str = "@weather";
const DATE_FORMAT: &str = "%Y%m%d";
const STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// One all-day rain summary event.
///
/// The UID is derived from the date, so a document can never hold two
/// events for the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    /// When the event was first written (DTSTAMP).
    pub created: DateTime<Utc>,
    /// The day this event describes; start and end date are both this day.
    pub date: NaiveDate,
    /// Rendered region summary, e.g. `🟡HF 🔵TA ⚪JM 🟡BS`.
    pub summary: String,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, summary: impl Into<String>) -> Self {
        Self {
            uid: Self::uid_for(date),
            created: Utc::now(),
            date,
            summary: summary.into(),
        }
    }

    /// Natural key of the event for `date`: `{ISO-date}@weather`.
    pub fn uid_for(date: NaiveDate) -> String {
        format!("{date}{UID_SUFFIX}")
    }

    /// Serialize as a VEVENT block, one property per line, no trailing
    /// newline.
    pub fn to_ics_block(&self) -> String {
        [
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", self.uid),
            format!("DTSTAMP:{}", self.created.format(STAMP_FORMAT)),
            format!("DTSTART;VALUE=DATE:{}", self.date.format(DATE_FORMAT)),
            format!("DTEND;VALUE=DATE:{}", self.date.format(DATE_FORMAT)),
            format!("SUMMARY:{}", self.summary),
            "END:VEVENT".to_string(),
        ]
        .join("\n")
    }
}

//! ICS calendar document handling for Rain Dots
//!
//! Parses, merges and serializes the `weather.ics` document. Events are
//! keyed by UID; merging is purely additive, so already-recorded days are
//! immutable history.

pub mod error;
pub mod event;
pub mod parser;
pub mod store;

pub use error::CalendarError;
pub use event::CalendarEvent;
pub use store::CalendarStore;

//! Run-level error types.

use chrono::NaiveDate;
use thiserror::Error;

use raindots_calendar::CalendarError;
use raindots_weather::WeatherError;

#[derive(Error, Debug)]
pub enum UpdateError {
    /// Classification gave up after retries. Fatal in incremental runs;
    /// bootstrap runs degrade before this can surface per region.
    #[error("Classification failed for {region} on {date}: {source}")]
    Classification {
        date: NaiveDate,
        region: &'static str,
        source: WeatherError,
    },

    #[error("Calendar store error: {0}")]
    Store(#[from] CalendarError),

    #[error("Publish error: {0}")]
    Publish(#[from] git2::Error),
}

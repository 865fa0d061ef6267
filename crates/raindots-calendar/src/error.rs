//! Calendar-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Calendar file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calendar parse error: {0}")]
    Parse(String),
}

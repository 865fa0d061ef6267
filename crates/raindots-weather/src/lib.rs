//! Rain classification for Rain Dots
//!
//! Queries the Open-Meteo archive API for hourly precipitation and reduces
//! one region/day to a tri-state rain verdict.

pub mod classifier;
pub mod retry;
pub mod types;

pub use classifier::WeatherClassifier;
pub use retry::RetryPolicy;
pub use types::{DaySummary, RainVerdict, WeatherError};

use raindots_core::RegionCode;
use serde::{Deserialize, Serialize};

/// Tri-state rain classification for one region on one date.
///
/// `Unknown` means the source had no data for the requested window or every
/// retry was exhausted. It is kept distinct from `DidNotRain` so a data gap
/// never masquerades as a dry day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainVerdict {
    Rained,
    DidNotRain,
    Unknown,
}

impl RainVerdict {
    /// Glyph rendered into the calendar summary.
    pub fn glyph(&self) -> &'static str {
        match self {
            RainVerdict::Rained => "🔵",
            RainVerdict::DidNotRain => "🟡",
            RainVerdict::Unknown => "⚪",
        }
    }
}

/// Per-region verdicts for exactly one calendar date.
///
/// Entries are kept in region rendering order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    verdicts: Vec<(RegionCode, RainVerdict)>,
}

impl DaySummary {
    pub fn new() -> Self {
        Self {
            verdicts: Vec::new(),
        }
    }

    pub fn push(&mut self, code: RegionCode, verdict: RainVerdict) {
        self.verdicts.push((code, verdict));
    }

    pub fn verdicts(&self) -> &[(RegionCode, RainVerdict)] {
        &self.verdicts
    }

    /// Render as space-separated `{glyph}{label}` pairs in region order.
    pub fn render(&self) -> String {
        self.verdicts
            .iter()
            .map(|(code, verdict)| format!("{}{}", verdict.glyph(), code.label()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for DaySummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Weather source errors.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Weather source returned status {0}")]
    Status(u16),

    #[error("Malformed weather response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// Whether retrying could plausibly produce a different outcome.
    ///
    /// Malformed responses are structural, so retrying them is pointless.
    pub fn is_transient(&self) -> bool {
        match self {
            WeatherError::Transport(e) => crate::retry::retryable_error(e),
            WeatherError::Status(status) => *status >= 500 || *status == 408 || *status == 429,
            WeatherError::Malformed(_) => false,
        }
    }
}

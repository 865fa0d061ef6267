use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The fixed set of tracked regions, in rendering order.
///
/// The order of the variants is the order region symbols appear in an
/// event summary, so it must stay stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionCode {
    Haifa,
    TelAviv,
    Jerusalem,
    BeerSheva,
}

impl RegionCode {
    /// All region codes, in rendering order.
    pub const ALL: [RegionCode; 4] = [
        RegionCode::Haifa,
        RegionCode::TelAviv,
        RegionCode::Jerusalem,
        RegionCode::BeerSheva,
    ];

    /// Two-letter label used in rendered summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RegionCode::Haifa => "HF",
            RegionCode::TelAviv => "TA",
            RegionCode::Jerusalem => "JM",
            RegionCode::BeerSheva => "BS",
        }
    }
}

/// A tracked region bound to its lookup coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub code: RegionCode,
    pub latitude: f64,
    pub longitude: f64,
}

/// The real coordinate table. Tests substitute their own.
pub fn default_regions() -> Vec<Region> {
    vec![
        Region {
            code: RegionCode::Haifa,
            latitude: 32.7940,
            longitude: 34.9896,
        },
        Region {
            code: RegionCode::TelAviv,
            latitude: 32.0853,
            longitude: 34.7818,
        },
        Region {
            code: RegionCode::Jerusalem,
            latitude: 31.7683,
            longitude: 35.2137,
        },
        Region {
            code: RegionCode::BeerSheva,
            latitude: 31.2518,
            longitude: 34.7913,
        },
    ]
}

/// Hour-of-day window counted as daytime, inclusive at both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DaytimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl DaytimeWindow {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

impl Default for DaytimeWindow {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 19,
        }
    }
}

/// Retry knobs for the weather source, kept here so one `Config` carries
/// everything a run needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

/// How much of the calendar a run recomputes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Yesterday only. A failed day fails the run.
    #[default]
    Incremental,
    /// A trailing range of days ending yesterday. Failed days are skipped.
    Bootstrap,
}

impl RunMode {
    /// Interpret an environment-style boolean flag.
    ///
    /// `1`, `true`, `yes` and `on` (case-insensitive) select Bootstrap;
    /// anything else, including an absent variable, selects Incremental.
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => RunMode::Bootstrap,
                _ => RunMode::Incremental,
            },
            None => RunMode::Incremental,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the calendar document.
    pub calendar_path: PathBuf,

    /// Incremental vs. bootstrap.
    pub run_mode: RunMode,

    /// Trailing days covered by a bootstrap run.
    pub bootstrap_days: u32,

    /// Git repository to commit the calendar into. Publishing is skipped
    /// when unset.
    pub git_dir: Option<PathBuf>,

    /// Region coordinate table.
    pub regions: Vec<Region>,

    /// Daytime hours considered for the rain verdict.
    pub window: DaytimeWindow,

    /// Time zone the hourly series is requested in.
    pub timezone: String,

    /// Weather source retry policy knobs.
    pub retry: RetrySettings,

    /// Pause between per-region lookups, to stay polite toward the source.
    pub region_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar_path: PathBuf::from("weather.ics"),
            run_mode: RunMode::Incremental,
            bootstrap_days: 30,
            git_dir: None,
            regions: default_regions(),
            window: DaytimeWindow::default(),
            timezone: "Asia/Jerusalem".to_string(),
            retry: RetrySettings::default(),
            region_pause: Duration::from_millis(300),
        }
    }
}

impl Config {
    /// Build a config from the process environment.
    ///
    /// Recognized variables: `RAINDOTS_ICS_PATH`, `RAINDOTS_BOOTSTRAP`,
    /// `RAINDOTS_BOOTSTRAP_DAYS`, `RAINDOTS_GIT_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("RAINDOTS_ICS_PATH") {
            config.calendar_path = PathBuf::from(path);
        }

        config.run_mode = RunMode::from_flag(std::env::var("RAINDOTS_BOOTSTRAP").ok().as_deref());

        if let Ok(days) = std::env::var("RAINDOTS_BOOTSTRAP_DAYS") {
            config.bootstrap_days = days
                .parse()
                .with_context(|| format!("Invalid RAINDOTS_BOOTSTRAP_DAYS: {days}"))?;
        }

        if let Ok(dir) = std::env::var("RAINDOTS_GIT_DIR") {
            config.git_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

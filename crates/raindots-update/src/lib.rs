//! Run orchestration for Rain Dots
//!
//! Wires the classifier, summary builder, calendar store and git publisher
//! into one sequential update run.

pub mod error;
pub mod orchestrator;
pub mod publish;
pub mod summary;

pub use error::UpdateError;
pub use orchestrator::{RunReport, UpdateOrchestrator};
pub use publish::Publisher;
pub use summary::DaySummaryBuilder;

use anyhow::Result;
use chrono::{FixedOffset, NaiveDate, Utc};

use raindots_calendar::CalendarStore;
use raindots_core::Config;
use raindots_weather::{RetryPolicy, WeatherClassifier};

/// Reference offset for deciding when a day has ended (Israel standard
/// time; close enough for a date boundary).
const REFERENCE_UTC_OFFSET_SECS: i32 = 2 * 3600;

/// Today in the reference time zone. The run itself only ever looks at
/// days strictly before this.
pub fn reference_today() -> NaiveDate {
    match FixedOffset::east_opt(REFERENCE_UTC_OFFSET_SECS) {
        Some(tz) => Utc::now().with_timezone(&tz).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// Execute one full run from a config: classify, merge, save, publish.
pub async fn run(config: &Config) -> Result<RunReport> {
    let policy = RetryPolicy::new(
        config.retry.max_retries,
        config.retry.initial_delay_ms,
        config.retry.max_delay_ms,
    );
    let classifier = WeatherClassifier::new(policy, config.window, config.timezone.clone())?;
    let builder = DaySummaryBuilder::new(classifier, config.regions.clone(), config.region_pause);
    let store = CalendarStore::new(config.calendar_path.clone());
    let orchestrator =
        UpdateOrchestrator::new(builder, store, config.run_mode, config.bootstrap_days);

    let report = orchestrator.run(reference_today()).await?;
    tracing::info!(added = report.added, "{}", report.describe());

    if let Some(git_dir) = &config.git_dir {
        let publisher = Publisher::new(git_dir);
        if publisher.commit(&config.calendar_path, &report.describe())? {
            publisher.push()?;
        }
    }

    Ok(report)
}

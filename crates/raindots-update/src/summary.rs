//! Builds the per-day region summary.

use chrono::NaiveDate;
use std::time::Duration;
use tracing::instrument;

use raindots_core::{Region, RunMode};
use raindots_weather::{DaySummary, RainVerdict, WeatherClassifier};

use crate::error::UpdateError;

/// Folds classifier verdicts over the region table, in table order.
///
/// No retries happen here; the classifier owns those. The only policy at
/// this layer is what a failed classification means: bootstrap runs record
/// `Unknown` and move on, incremental runs propagate.
pub struct DaySummaryBuilder {
    classifier: WeatherClassifier,
    regions: Vec<Region>,
    /// Pause between region lookups, purely to be polite to the source.
    pause: Duration,
}

impl DaySummaryBuilder {
    pub fn new(classifier: WeatherClassifier, regions: Vec<Region>, pause: Duration) -> Self {
        Self {
            classifier,
            regions,
            pause,
        }
    }

    #[instrument(skip(self), level = "info")]
    pub async fn build(&self, date: NaiveDate, mode: RunMode) -> Result<DaySummary, UpdateError> {
        let mut summary = DaySummary::new();

        for (i, region) in self.regions.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            let verdict = match self.classifier.classify(region, date).await {
                Ok(verdict) => verdict,
                Err(e) if mode == RunMode::Bootstrap => {
                    tracing::warn!(
                        region = region.code.label(),
                        %date,
                        "Classification failed, recording unknown: {e}"
                    );
                    RainVerdict::Unknown
                }
                Err(e) => {
                    return Err(UpdateError::Classification {
                        date,
                        region: region.code.label(),
                        source: e,
                    });
                }
            };

            summary.push(region.code, verdict);
        }

        Ok(summary)
    }
}

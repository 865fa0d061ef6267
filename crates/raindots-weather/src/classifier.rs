//! Open-Meteo archive client reducing hourly precipitation to a verdict.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use raindots_core::{DaytimeWindow, Region};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::retry::{retryable_error, retryable_status, RetryPolicy};
use crate::types::{RainVerdict, WeatherError};

const ARCHIVE_API_BASE: &str = "https://archive-api.open-meteo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Hourly archive response. Only the precipitation series is requested.
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    time: Vec<String>,
    /// Null entries mean "no measurement" and count as zero.
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct WeatherClassifier {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    window: DaytimeWindow,
    timezone: String,
}

impl WeatherClassifier {
    pub fn new(
        policy: RetryPolicy,
        window: DaytimeWindow,
        timezone: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        Self::with_base_url(ARCHIVE_API_BASE, policy, window, timezone)
    }

    /// Point the classifier at a different API host (used by tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        policy: RetryPolicy,
        window: DaytimeWindow,
        timezone: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            policy,
            window,
            timezone: timezone.into(),
        })
    }

    /// Classify rainfall for one region on one date.
    ///
    /// Returns `Unknown` when the source answers but has no usable data for
    /// the date. Returns an error only when transport keeps failing after
    /// the retry budget; the caller decides whether that is fatal.
    #[instrument(skip(self, region), fields(region = region.code.label(), %date), level = "info")]
    pub async fn classify(
        &self,
        region: &Region,
        date: NaiveDate,
    ) -> Result<RainVerdict, WeatherError> {
        let url = format!(
            "{}/v1/archive?latitude={}&longitude={}&start_date={date}&end_date={date}&hourly=precipitation&timezone={}",
            self.base_url, region.latitude, region.longitude, self.timezone,
        );

        let response = self.send_with_retry(&url).await?;

        let body: ArchiveResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Unparseable weather response, treating as unknown: {e}");
                return Ok(RainVerdict::Unknown);
            }
        };

        match self.reduce(&body) {
            Ok(verdict) => Ok(verdict),
            Err(WeatherError::Malformed(msg)) => {
                tracing::warn!("Malformed weather response, treating as unknown: {msg}");
                Ok(RainVerdict::Unknown)
            }
            Err(e) => Err(e),
        }
    }

    /// Issue the request, retrying transient failures per the policy.
    async fn send_with_retry(&self, url: &str) -> Result<reqwest::Response, WeatherError> {
        let mut last_error: Option<WeatherError> = None;

        for attempt in 0..=self.policy.max_retries {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt - 1);
                tracing::warn!(
                    "Retry {attempt} of {} after {delay:?}",
                    self.policy.max_retries
                );
                tokio::time::sleep(delay).await;
            }

            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if !retryable_status(status) {
                        return Err(WeatherError::Status(status.as_u16()));
                    }
                    tracing::warn!("Weather source returned {status}, will retry");
                    last_error = Some(WeatherError::Status(status.as_u16()));
                }
                Err(e) => {
                    if !retryable_error(&e) {
                        return Err(WeatherError::Transport(e));
                    }
                    tracing::warn!("Transient weather source error, will retry: {e}");
                    last_error = Some(WeatherError::Transport(e));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| WeatherError::Malformed("retry loop produced no attempt".into())))
    }

    /// Reduce the hourly series to a verdict over the daytime window.
    fn reduce(&self, body: &ArchiveResponse) -> Result<RainVerdict, WeatherError> {
        let Some(hourly) = &body.hourly else {
            return Ok(RainVerdict::Unknown);
        };

        if hourly.time.is_empty() {
            return Ok(RainVerdict::Unknown);
        }

        if hourly.time.len() != hourly.precipitation.len() {
            return Err(WeatherError::Malformed(format!(
                "hourly series length mismatch: {} times vs {} readings",
                hourly.time.len(),
                hourly.precipitation.len()
            )));
        }

        let mut in_window = 0usize;
        let mut rained = false;

        for (stamp, reading) in hourly.time.iter().zip(&hourly.precipitation) {
            let parsed = NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M")
                .map_err(|e| WeatherError::Malformed(format!("bad hourly timestamp {stamp}: {e}")))?;

            if !self.window.contains(parsed.hour()) {
                continue;
            }

            in_window += 1;
            if reading.unwrap_or(0.0) > 0.0 {
                rained = true;
            }
        }

        if in_window == 0 {
            return Ok(RainVerdict::Unknown);
        }

        Ok(if rained {
            RainVerdict::Rained
        } else {
            RainVerdict::DidNotRain
        })
    }
}

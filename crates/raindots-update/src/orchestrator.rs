//! Drives one full update run.

use chrono::{Days, NaiveDate};
use tracing::instrument;

use raindots_calendar::{CalendarEvent, CalendarStore};
use raindots_core::RunMode;

use crate::error::UpdateError;
use crate::summary::DaySummaryBuilder;

/// What one run did, for logs and the commit message.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: RunMode,
    pub dates: Vec<NaiveDate>,
    pub added: usize,
}

impl RunReport {
    /// One-line description, also used as the git commit message.
    pub fn describe(&self) -> String {
        match (self.mode, self.dates.last()) {
            (RunMode::Incremental, Some(date)) => {
                format!("Update rain calendar for {date}")
            }
            (RunMode::Bootstrap, Some(date)) => format!(
                "Backfill rain calendar: {} days ending {date}, {} new",
                self.dates.len(),
                self.added
            ),
            (_, None) => "Rain calendar run covered no dates".to_string(),
        }
    }
}

pub struct UpdateOrchestrator {
    builder: DaySummaryBuilder,
    store: CalendarStore,
    mode: RunMode,
    bootstrap_days: u32,
}

impl UpdateOrchestrator {
    pub fn new(
        builder: DaySummaryBuilder,
        store: CalendarStore,
        mode: RunMode,
        bootstrap_days: u32,
    ) -> Self {
        Self {
            builder,
            store,
            mode,
            bootstrap_days,
        }
    }

    /// Dates a run covers, oldest first. "Today" is never included; its
    /// data is still incomplete.
    pub fn date_range(mode: RunMode, bootstrap_days: u32, today: NaiveDate) -> Vec<NaiveDate> {
        let days_back = match mode {
            RunMode::Incremental => 1,
            RunMode::Bootstrap => bootstrap_days.max(1),
        };
        (1..=u64::from(days_back))
            .rev()
            .filter_map(|d| today.checked_sub_days(Days::new(d)))
            .collect()
    }

    /// Process every date in range, merge the new events and write the
    /// document back. Dates already recorded are re-requested anyway; the
    /// additive merge makes them no-ops.
    #[instrument(skip(self), fields(mode = ?self.mode), level = "info")]
    pub async fn run(&self, today: NaiveDate) -> Result<RunReport, UpdateError> {
        let dates = Self::date_range(self.mode, self.bootstrap_days, today);
        let mut events = self.store.load();
        let mut added = 0;

        for date in &dates {
            let summary = match self.builder.build(*date, self.mode).await {
                Ok(summary) => summary,
                Err(e) if self.mode == RunMode::Bootstrap => {
                    tracing::error!(%date, "Skipping day after failure: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };

            let event = CalendarEvent::new(*date, summary.render());
            added += CalendarStore::merge(&mut events, vec![event]);
            tracing::info!(%date, "Processed day");
        }

        self.store.save(&events)?;

        Ok(RunReport {
            mode: self.mode,
            dates,
            added,
        })
    }
}

//! Periodic snapshot jobs.
//!
//! Two background jobs keep the checkpoint store continuous: the
//! end-of-business-day snapshot, and an hourly safety check that
//! re-runs a missed snapshot. Both are idempotent and re-entrant, so
//! nothing here relies on exactly-once scheduling; a missed or doubled
//! tick produces the same checkpoints.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::RwLock;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use folio_shared::config::ScheduleConfig;

use crate::Books;
use crate::balance::BalanceService;

/// How often the snapshot loop checks the local clock.
const SNAPSHOT_TICK: Duration = Duration::from_secs(60);

/// Runs the periodic snapshot and safety-check jobs.
pub struct Scheduler {
    books: Arc<RwLock<Books>>,
    timezone: Tz,
    snapshot_hour: u32,
    safety_interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler over a shared store.
    #[must_use]
    pub fn new(books: Arc<RwLock<Books>>, schedule: &ScheduleConfig, timezone: Tz) -> Self {
        Self {
            books,
            timezone,
            snapshot_hour: schedule.snapshot_hour.min(23),
            safety_interval: Duration::from_secs(schedule.safety_check_secs.max(1)),
        }
    }

    /// Runs both jobs until the task is dropped.
    pub async fn run(self) {
        info!(
            timezone = %self.timezone,
            snapshot_hour = self.snapshot_hour,
            "scheduler started"
        );
        tokio::join!(self.snapshot_loop(), self.safety_loop());
    }

    /// End-of-business-day job: once the hotel-local clock passes the
    /// configured hour, snapshot today's closing as tomorrow's opening.
    async fn snapshot_loop(&self) {
        let mut tick = interval(SNAPSHOT_TICK);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Re-derived after restarts; re-running the snapshot is safe.
        let mut last_run: Option<NaiveDate> = None;
        loop {
            tick.tick().await;
            let now = Utc::now().with_timezone(&self.timezone);
            let today = now.date_naive();
            if now.hour() < self.snapshot_hour || last_run == Some(today) {
                continue;
            }
            let mut books = self.books.write().await;
            if BalanceService::snapshot_closing(&mut books, today).is_some() {
                last_run = Some(today);
            }
        }
    }

    /// Hourly safety check: if the snapshot that should have run at the
    /// end of yesterday never fired, run it now.
    async fn safety_loop(&self) {
        let mut tick = interval(self.safety_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let today = Utc::now().with_timezone(&self.timezone).date_naive();
            let mut books = self.books.write().await;
            if let Some(checkpoint) = BalanceService::ensure_snapshot(&mut books, today) {
                warn!(
                    date = %checkpoint.date,
                    cash = %checkpoint.cash,
                    bank = %checkpoint.bank,
                    "safety check backfilled a missed snapshot"
                );
            }
        }
    }
}

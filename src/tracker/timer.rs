//! The single active timer and duration formatting.
//!
//! The host owns the `Option<ActiveTimer>`; the tracker only reads and
//! replaces it while moving elapsed time into `time_spent`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ProgressTracker;
use crate::error::{TrackerError, TrackerResult};

/// The single running timer. Owned by the host, lent to the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    /// Task being timed.
    pub task_id: String,
    /// When timing began, or the last reset of the task's time.
    pub started_at: DateTime<Utc>,
}

impl ActiveTimer {
    /// Whole seconds between start and `now`; never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.started_at).num_seconds().max(0) as u64
    }
}

/// Time moved into `time_spent` when a timer stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerFlush {
    /// Task the time was added to.
    pub task_id: String,
    /// Seconds added by this stop.
    pub elapsed_secs: u64,
    /// Task total after the flush.
    pub total_secs: u64,
}

impl ProgressTracker {
    /// Start timing `task_id`. A running timer is stopped and flushed first.
    ///
    /// # Errors
    /// `NotFound` for an unknown task; `timer` is left as it was.
    pub fn start_timer(
        &mut self,
        timer: &mut Option<ActiveTimer>,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<Option<TimerFlush>> {
        if self.blueprint.task(task_id).is_none() {
            return Err(TrackerError::not_found("task", task_id));
        }

        let flushed = self.stop_timer(timer, now);
        *timer = Some(ActiveTimer {
            task_id: task_id.to_string(),
            started_at: now,
        });
        debug!(task_id = %task_id, "Timer started");

        Ok(flushed)
    }

    /// Stop the running timer, adding the wall-clock delta to the task total
    /// and to the current session. Returns `None` when no timer was running.
    pub fn stop_timer(
        &mut self,
        timer: &mut Option<ActiveTimer>,
        now: DateTime<Utc>,
    ) -> Option<TimerFlush> {
        let active = timer.take()?;
        let elapsed_secs = active.elapsed_secs(now);

        let total = self
            .blueprint
            .time_spent
            .entry(active.task_id.clone())
            .or_insert(0);
        *total = total.saturating_add(elapsed_secs);
        let total_secs = *total;

        if let Some(session) = self.current_session_mut() {
            session.time_tracked = session.time_tracked.saturating_add(elapsed_secs);
        }

        debug!(
            task_id = %active.task_id,
            elapsed_secs,
            total_secs,
            "Timer stopped"
        );

        Some(TimerFlush {
            task_id: active.task_id,
            elapsed_secs,
            total_secs,
        })
    }
}

/// Render seconds as `"1h 2m 3s"`, `"2m 3s"` or `"3s"`.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

//! Completion and time aggregates over the blueprint tree.
//!
//! Everything here is recomputed from tasks on each call; nothing is cached.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ProgressTracker;
use crate::blueprint::{Phase, TaskStatus};

/// Aggregate completion and time figures for a blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of tasks across all phases.
    pub total_tasks: usize,
    /// Number of completed tasks.
    pub completed_tasks: usize,
    /// Rounded percentage, always within 0..=100.
    pub completion_rate: u32,
    /// Seconds across all tasks.
    pub total_time_spent: u64,
    /// Rounded seconds per completed task, 0 when none are completed.
    pub average_task_time: u64,
}

/// Derived state of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseStatus {
    /// No task touched yet.
    NotStarted,
    /// Some work recorded on at least one task.
    InProgress,
    /// Every task finished.
    Completed,
}

/// Completion of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    /// Phase identifier.
    pub phase_id: String,
    /// Phase display name.
    pub name: String,
    /// Tasks in the phase.
    pub total_tasks: usize,
    /// Tasks marked completed.
    pub completed_tasks: usize,
    /// Rounded completion, 0 to 100.
    pub percentage: u32,
    /// Derived from task completion and activity.
    pub status: PhaseStatus,
}

impl PhaseProgress {
    pub(crate) fn of(phase: &Phase) -> Self {
        let total_tasks = phase.tasks.len();
        let completed_tasks = phase.tasks.iter().filter(|t| t.is_completed()).count();
        let started = phase
            .tasks
            .iter()
            .any(|t| t.is_completed() || t.checked_count() > 0 || t.status != TaskStatus::NotStarted);

        let status = if total_tasks > 0 && completed_tasks == total_tasks {
            PhaseStatus::Completed
        } else if started {
            PhaseStatus::InProgress
        } else {
            PhaseStatus::NotStarted
        };

        Self {
            phase_id: phase.id.clone(),
            name: phase.name.clone(),
            total_tasks,
            completed_tasks,
            percentage: percentage(completed_tasks, total_tasks),
            status,
        }
    }
}

/// `round(100 * part / whole)`, 0 for an empty whole.
fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

impl ProgressTracker {
    /// Aggregate completion and time across the blueprint.
    pub fn compute_stats(&self) -> Stats {
        let blueprint = self.blueprint();
        let total_tasks = blueprint.tasks().count();
        let completed_tasks = blueprint.tasks().filter(|t| t.is_completed()).count();
        let total_time_spent: u64 = blueprint.time_spent.values().sum();
        let average_task_time = if completed_tasks > 0 {
            (total_time_spent as f64 / completed_tasks as f64).round() as u64
        } else {
            0
        };

        Stats {
            total_tasks,
            completed_tasks,
            completion_rate: percentage(completed_tasks, total_tasks),
            total_time_spent,
            average_task_time,
        }
    }

    /// Completion of each phase, in phase order.
    pub fn phase_progress(&self) -> Vec<PhaseProgress> {
        self.blueprint().phases.iter().map(PhaseProgress::of).collect()
    }

    /// Number of sessions started on `date` (UTC).
    pub fn sessions_on(&self, date: NaiveDate) -> usize {
        self.blueprint()
            .sessions
            .iter()
            .filter(|s| s.start_time.date_naive() == date)
            .count()
    }
}

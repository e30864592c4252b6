//! Progress tracking over a single blueprint.
//!
//! `ProgressTracker` owns the phase/task/checklist tree of one project and
//! applies every mutation the dashboard offers: checklist toggles, timers,
//! decisions, phase completion and credentials. All operations are pure
//! in-memory transforms; wall-clock time is always passed in by the caller
//! so the tracker never reads a clock itself.
//!
//! Queries live in submodules:
//! - `stats`: aggregate completion and per-phase progress
//! - `next`: priority-ordered next task selection
//! - `timer`: the single active timer and duration formatting
//! - `context`: plain-text project briefings

mod context;
mod next;
mod stats;
mod timer;

pub use context::ContextKind;
pub use next::{NextReason, NextTask};
pub use stats::{PhaseProgress, PhaseStatus, Stats};
pub use timer::{format_duration, ActiveTimer, TimerFlush};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::blueprint::{Blueprint, Decision, Session, TaskState, TaskStatus};
use crate::error::{TrackerError, TrackerResult};

/// Related-task label used when no task is in focus.
pub const GENERAL_TOPIC: &str = "General";

/// Mutable view over one project's blueprint.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    blueprint: Blueprint,
    current_session: Option<String>,
}

impl ProgressTracker {
    /// Wrap a prepared blueprint.
    pub fn new(blueprint: Blueprint) -> Self {
        Self {
            blueprint,
            current_session: None,
        }
    }

    /// The underlying document.
    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    /// Consume the tracker, returning the document.
    pub fn into_blueprint(self) -> Blueprint {
        self.blueprint
    }

    /// Start a new session and make it current.
    pub fn begin_session(&mut self, now: DateTime<Utc>) -> &Session {
        let session = Session::new(now);
        self.current_session = Some(session.id.clone());
        self.blueprint.sessions.push(session);
        let index = self.blueprint.sessions.len() - 1;
        &self.blueprint.sessions[index]
    }

    /// The session started by the last `begin_session`, if any.
    pub fn current_session(&self) -> Option<&Session> {
        let id = self.current_session.as_deref()?;
        self.blueprint.sessions.iter().find(|s| s.id == id)
    }

    fn current_session_mut(&mut self) -> Option<&mut Session> {
        let id = self.current_session.as_deref()?;
        self.blueprint.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Flip one checklist item and re-derive the task's completion.
    ///
    /// # Errors
    /// `NotFound` for an unknown task or an index past the checklist end.
    pub fn toggle_checklist_item(&mut self, task_id: &str, index: usize) -> TrackerResult<TaskState> {
        let task = self
            .blueprint
            .task_mut(task_id)
            .ok_or_else(|| TrackerError::not_found("task", task_id))?;

        let item = task.checklist.get_mut(index).ok_or_else(|| {
            TrackerError::not_found("checklist item", format!("{}[{}]", task_id, index))
        })?;
        item.checked = !item.checked;

        let was_completed = task.completed;
        task.recompute_completion();

        let became_completed = !was_completed && task.completed;
        if became_completed {
            task.status = TaskStatus::Completed;
        } else if was_completed && !task.completed && task.status == TaskStatus::Completed {
            task.status = TaskStatus::InProgress;
        }

        let state = task.state();
        debug!(
            task_id = %task_id,
            index,
            completed = state.completed,
            "Toggled checklist item"
        );

        if became_completed {
            let id = task_id.to_string();
            if let Some(session) = self.current_session_mut() {
                session.tasks_completed.push(id);
            }
        }

        Ok(state)
    }

    /// Zero the recorded time of a task, returning the previous total.
    ///
    /// A timer running on the same task restarts at `now`, so time from
    /// before the reset is not added back when it stops.
    ///
    /// # Errors
    /// `NotFound` for an unknown task.
    pub fn reset_time(
        &mut self,
        timer: &mut Option<ActiveTimer>,
        task_id: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<u64> {
        if self.blueprint.task(task_id).is_none() {
            return Err(TrackerError::not_found("task", task_id));
        }
        if let Some(active) = timer.as_mut().filter(|t| t.task_id == task_id) {
            active.started_at = now;
        }
        Ok(self.blueprint.time_spent.remove(task_id).unwrap_or(0))
    }

    /// Append a decision to the log.
    ///
    /// The related task is the current recommendation, or `"General"`.
    ///
    /// # Errors
    /// `Validation` when `decision` or `reason` is blank.
    pub fn add_decision(
        &mut self,
        decision: &str,
        reason: &str,
        impact: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<Decision> {
        if decision.trim().is_empty() {
            return Err(TrackerError::validation("decision", "cannot be empty"));
        }
        if reason.trim().is_empty() {
            return Err(TrackerError::validation("reason", "cannot be empty"));
        }

        let related_task = self
            .select_next_task()
            .map(|next| next.task.title)
            .unwrap_or_else(|| GENERAL_TOPIC.to_string());

        let entry = Decision::new(
            now.date_naive(),
            decision.trim(),
            reason.trim(),
            impact.trim(),
            related_task,
        );

        if let Some(session) = self.current_session_mut() {
            session.decisions_added.push(entry.id.clone());
        }
        self.blueprint.decisions.push(entry.clone());

        Ok(entry)
    }

    /// Remove a decision by id.
    ///
    /// # Errors
    /// `NotFound` for an unknown id.
    pub fn delete_decision(&mut self, decision_id: &str) -> TrackerResult<Decision> {
        let position = self
            .blueprint
            .decisions
            .iter()
            .position(|d| d.id == decision_id)
            .ok_or_else(|| TrackerError::not_found("decision", decision_id))?;
        Ok(self.blueprint.decisions.remove(position))
    }

    /// Force every task and checklist item of a phase to completed.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    /// `NotFound` for an unknown phase.
    pub fn mark_phase_complete(&mut self, phase_id: &str) -> TrackerResult<PhaseProgress> {
        let phase = self
            .blueprint
            .phase_mut(phase_id)
            .ok_or_else(|| TrackerError::not_found("phase", phase_id))?;

        let mut newly_completed = Vec::new();
        for task in &mut phase.tasks {
            if !task.completed {
                newly_completed.push(task.id.clone());
            }
            task.checklist.iter_mut().for_each(|item| item.checked = true);
            task.completed = true;
            task.status = TaskStatus::Completed;
        }

        let progress = PhaseProgress::of(phase);

        if let Some(session) = self.current_session_mut() {
            session.tasks_completed.extend(newly_completed);
        }

        Ok(progress)
    }

    /// Store an opaque credential value.
    ///
    /// # Errors
    /// `Validation` for a blank key.
    pub fn set_credential(&mut self, key: &str, value: &str) -> TrackerResult<()> {
        if key.trim().is_empty() {
            return Err(TrackerError::validation("key", "cannot be empty"));
        }
        self.blueprint
            .credentials
            .insert(key.trim().to_string(), value.to_string());
        Ok(())
    }

    /// Remove a credential, returning its value.
    ///
    /// # Errors
    /// `NotFound` for an unknown key.
    pub fn remove_credential(&mut self, key: &str) -> TrackerResult<String> {
        self.blueprint
            .credentials
            .remove(key)
            .ok_or_else(|| TrackerError::not_found("credential", key))
    }

    /// Copy of the document ready to persist: last `session_limit`
    /// sessions, current focus, progress and task states filled in.
    pub fn snapshot_for_save(&self, session_limit: usize, now: DateTime<Utc>) -> Blueprint {
        let mut snapshot = self.blueprint.clone();

        let excess = snapshot.sessions.len().saturating_sub(session_limit);
        snapshot.sessions.drain(..excess);

        snapshot.current_focus = self.select_next_task().map(|next| next.task.id);
        snapshot.progress = self.compute_stats().completion_rate;
        snapshot.task_states = snapshot.compute_task_states();
        snapshot.last_updated = Some(now);

        snapshot
    }
}

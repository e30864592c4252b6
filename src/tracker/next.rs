//! Next-task recommendation.

use serde::{Deserialize, Serialize};

use super::ProgressTracker;
use crate::blueprint::{Priority, Task, TaskStatus};

/// Why a task was recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextReason {
    /// An incomplete critical task blocks everything else.
    Blocker,
    /// A task is already in progress.
    Continue,
    /// Highest-priority remaining task.
    Next,
}

impl NextReason {
    /// Human-readable explanation.
    pub fn describe(self) -> &'static str {
        match self {
            NextReason::Blocker => "Critical blocker - must fix first",
            NextReason::Continue => "Continue current work",
            NextReason::Next => "Next in priority order",
        }
    }
}

impl std::fmt::Display for NextReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NextReason::Blocker => write!(f, "blocker"),
            NextReason::Continue => write!(f, "continue"),
            NextReason::Next => write!(f, "next"),
        }
    }
}

/// The recommended task and the rule that picked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTask {
    /// Copy of the recommended task.
    pub task: Task,
    /// Phase containing the task.
    pub phase_id: String,
    /// Rule that selected it.
    pub reason: NextReason,
}

impl ProgressTracker {
    /// Pick the task to work on next.
    ///
    /// Rules, first match wins:
    /// 1. first incomplete critical task (`blocker`)
    /// 2. first incomplete in-progress task (`continue`)
    /// 3. incomplete tasks stably sorted by priority rank (`next`)
    ///
    /// Returns `None` once every task is complete.
    pub fn select_next_task(&self) -> Option<NextTask> {
        let open: Vec<(&str, &Task)> = self
            .blueprint()
            .phases
            .iter()
            .flat_map(|phase| phase.tasks.iter().map(move |task| (phase.id.as_str(), task)))
            .filter(|(_, task)| !task.is_completed())
            .collect();

        let pick = |(phase_id, task): (&str, &Task), reason| NextTask {
            task: task.clone(),
            phase_id: phase_id.to_string(),
            reason,
        };

        if let Some(&found) = open.iter().find(|(_, t)| t.priority == Priority::Critical) {
            return Some(pick(found, NextReason::Blocker));
        }

        if let Some(&found) = open.iter().find(|(_, t)| t.status == TaskStatus::InProgress) {
            return Some(pick(found, NextReason::Continue));
        }

        // min_by_key keeps the first of equal keys, i.e. a stable sort's head
        open.into_iter()
            .min_by_key(|(_, t)| t.priority.rank())
            .map(|found| pick(found, NextReason::Next))
    }
}

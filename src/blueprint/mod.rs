//! Blueprint document model.
//!
//! A blueprint is the progress-tracking document attached to one project:
//! ordered phases of tasks with checklists, accumulated time per task,
//! a decision log, opaque credentials and the history of work sessions.
//! The phase/task tree is the source of truth for completion; the
//! `task_states` map is a derived view written out with the document.


use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};

/// Task priority, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Blocks other work.
    Critical,
    /// Important, schedule soon.
    High,
    /// Normal priority.
    #[default]
    Medium,
    /// Nice to have.
    Low,
}

impl Priority {
    /// Sort rank: lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Work has not begun.
    #[default]
    NotStarted,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Completed,
    /// Waiting on something external.
    Blocked,
}

/// Smallest trackable unit of completion, addressed by its index in the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Display label.
    pub label: String,
    /// Whether the item is done.
    #[serde(default)]
    pub checked: bool,
}

impl ChecklistItem {
    /// Create an unchecked item.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }
}

/// A unit of work within a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier, unique across the blueprint.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Priority used by next-task selection.
    #[serde(default)]
    pub priority: Priority,
    /// Workflow status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Estimated effort in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    /// Checklist items; empty when the task has no checklist.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Completion flag. Mirrors the checklist when one is present.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create a not-started, medium priority task.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            status: TaskStatus::default(),
            estimated_minutes: None,
            checklist: Vec::new(),
            completed: false,
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the estimate in minutes.
    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    /// Replace the checklist with unchecked items.
    pub fn with_checklist<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.checklist = labels.into_iter().map(ChecklistItem::new).collect();
        self.recompute_completion();
        self
    }

    /// Whether the task carries a checklist.
    pub fn has_checklist(&self) -> bool {
        !self.checklist.is_empty()
    }

    /// Number of checked items.
    pub fn checked_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.checked).count()
    }

    /// Derived completion state.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Re-derive `completed` from the checklist. Tasks without a checklist
    /// keep their explicit flag.
    pub fn recompute_completion(&mut self) {
        if self.has_checklist() {
            self.completed = self.checked_count() == self.checklist.len();
        }
    }

    /// Per-task progress view.
    pub fn state(&self) -> TaskState {
        TaskState {
            completed: self.completed,
            checklist: self
                .checklist
                .iter()
                .enumerate()
                .map(|(index, item)| (index, item.checked))
                .collect(),
        }
    }
}

/// Completion view of one task: the flag plus each checklist index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    /// Whether the task is complete.
    pub completed: bool,
    /// Checklist index to checked flag.
    #[serde(default)]
    pub checklist: BTreeMap<usize, bool>,
}

/// An ordered top-level grouping of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    /// Identifier, unique across the blueprint.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the phase covers.
    #[serde(default)]
    pub description: String,
    /// Position in the blueprint; unique.
    pub order: u32,
    /// Tasks in declaration order.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    /// Create an empty phase.
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            order,
            tasks: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }
}

/// A rationale entry in the decision log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Generated identifier.
    pub id: String,
    /// Day the decision was logged.
    pub date: NaiveDate,
    /// What was decided.
    pub decision: String,
    /// Why.
    pub reason: String,
    /// Expected consequences.
    #[serde(default)]
    pub impact: String,
    /// Title of the task in focus when the decision was made.
    #[serde(default)]
    pub related_task: String,
}

impl Decision {
    /// Create a decision dated `date` with a fresh id.
    pub fn new(
        date: NaiveDate,
        decision: impl Into<String>,
        reason: impl Into<String>,
        impact: impl Into<String>,
        related_task: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            decision: decision.into(),
            reason: reason.into(),
            impact: impact.into(),
            related_task: related_task.into(),
        }
    }
}

/// One usage period of a blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Generated identifier.
    pub id: String,
    /// When the blueprint was opened.
    pub start_time: DateTime<Utc>,
    /// Tasks completed during the session.
    #[serde(default)]
    pub tasks_completed: Vec<String>,
    /// Decisions logged during the session.
    #[serde(default)]
    pub decisions_added: Vec<String>,
    /// Seconds recorded by timers stopped during the session.
    #[serde(default)]
    pub time_tracked: u64,
}

impl Session {
    /// Start a session at `start_time`.
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            tasks_completed: Vec::new(),
            decisions_added: Vec::new(),
            time_tracked: 0,
        }
    }
}

/// The full progress-tracking document for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blueprint {
    /// Display name.
    pub name: String,
    /// Template the blueprint was seeded from.
    #[serde(default)]
    pub template_id: String,
    /// Phases sorted by `order`.
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// Decision log.
    #[serde(default)]
    pub decisions: Vec<Decision>,
    /// Opaque key/value pairs.
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    /// Task id to accumulated seconds.
    #[serde(default)]
    pub time_spent: BTreeMap<String, u64>,
    /// Task id to completion view, written on save.
    #[serde(default)]
    pub task_states: BTreeMap<String, TaskState>,
    /// Session history, oldest first.
    #[serde(default)]
    pub sessions: Vec<Session>,
    /// Recommended task at the time of the last save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_focus: Option<String>,
    /// Completion percentage at the time of the last save.
    #[serde(default)]
    pub progress: u32,
    /// When the document was last saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Blueprint {
    /// Build a blueprint from phases, checking id and order uniqueness.
    pub fn new(
        name: impl Into<String>,
        template_id: impl Into<String>,
        phases: Vec<Phase>,
    ) -> TrackerResult<Self> {
        let blueprint = Self {
            name: name.into(),
            template_id: template_id.into(),
            phases,
            decisions: Vec::new(),
            credentials: BTreeMap::new(),
            time_spent: BTreeMap::new(),
            task_states: BTreeMap::new(),
            sessions: Vec::new(),
            current_focus: None,
            progress: 0,
            last_updated: None,
        };
        blueprint.prepare()
    }

    /// Validate a blueprint (e.g. one just loaded) and restore its
    /// invariants: phases sorted by order, completion derived from checklists.
    pub fn prepare(mut self) -> TrackerResult<Self> {
        self.validate()?;
        self.phases.sort_by_key(|phase| phase.order);
        for task in self.phases.iter_mut().flat_map(|phase| phase.tasks.iter_mut()) {
            task.recompute_completion();
        }
        self.task_states = self.compute_task_states();
        Ok(self)
    }

    /// Check id and order uniqueness.
    pub fn validate(&self) -> TrackerResult<()> {
        let mut phase_ids = HashSet::new();
        let mut orders = HashSet::new();
        let mut task_ids = HashSet::new();

        for phase in &self.phases {
            if phase.id.trim().is_empty() {
                return Err(TrackerError::validation("phase.id", "cannot be empty"));
            }
            if !phase_ids.insert(phase.id.as_str()) {
                return Err(TrackerError::validation(
                    "phase.id",
                    format!("duplicate phase id '{}'", phase.id),
                ));
            }
            if !orders.insert(phase.order) {
                return Err(TrackerError::validation(
                    "phase.order",
                    format!("order {} used by more than one phase", phase.order),
                ));
            }
            for task in &phase.tasks {
                if task.id.trim().is_empty() {
                    return Err(TrackerError::validation("task.id", "cannot be empty"));
                }
                if !task_ids.insert(task.id.as_str()) {
                    return Err(TrackerError::validation(
                        "task.id",
                        format!("duplicate task id '{}'", task.id),
                    ));
                }
            }
        }

        Ok(())
    }

    /// All tasks in phase order, then declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.phases.iter().flat_map(|phase| phase.tasks.iter())
    }

    /// Look up a task.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks().find(|task| task.id == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.phases
            .iter_mut()
            .flat_map(|phase| phase.tasks.iter_mut())
            .find(|task| task.id == task_id)
    }

    /// Look up a phase.
    pub fn phase(&self, phase_id: &str) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id == phase_id)
    }

    pub(crate) fn phase_mut(&mut self, phase_id: &str) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|phase| phase.id == phase_id)
    }

    /// Per-task completion view derived from the tree.
    pub fn compute_task_states(&self) -> BTreeMap<String, TaskState> {
        self.tasks()
            .map(|task| (task.id.clone(), task.state()))
            .collect()
    }

    /// Seconds recorded against a task.
    pub fn time_spent_on(&self, task_id: &str) -> u64 {
        self.time_spent.get(task_id).copied().unwrap_or(0)
    }
}

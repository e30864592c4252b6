//! Plain-text project briefings for pasting into an assistant chat.
//!
//! Each kind starts from the same progress summary and adds a
//! placeholder line for the user's own request. Credentials are never
//! rendered.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{format_duration, PhaseStatus, ProgressTracker};

/// Flavour of briefing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Resume work on the current focus.
    #[default]
    Continue,
    /// Report an error hit while working.
    Debug,
    /// Request a new feature.
    Feature,
    /// Ask a general question.
    Question,
}

impl std::str::FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(ContextKind::Continue),
            "debug" => Ok(ContextKind::Debug),
            "feature" => Ok(ContextKind::Feature),
            "question" => Ok(ContextKind::Question),
            _ => Err(format!("Unknown context kind: {}", s)),
        }
    }
}

impl ProgressTracker {
    /// Render a briefing about `project` for the given kind.
    pub fn render_context(&self, project: &str, kind: ContextKind) -> String {
        let blueprint = self.blueprint();
        let stats = self.compute_stats();
        let next = self.select_next_task();

        let last_completed = blueprint
            .tasks()
            .filter(|t| t.is_completed())
            .last()
            .map(|t| t.title.as_str())
            .unwrap_or("Initial setup");
        let focus = next
            .as_ref()
            .map(|n| n.task.title.as_str())
            .unwrap_or("All tasks complete");
        let focus_time = next
            .as_ref()
            .map(|n| format_duration(blueprint.time_spent_on(&n.task.id)))
            .unwrap_or_else(|| format_duration(0));
        let step = next
            .as_ref()
            .and_then(|n| n.task.checklist.iter().find(|item| !item.checked))
            .map(|item| item.label.as_str())
            .unwrap_or("Review current state");
        let why = next.as_ref().map(|n| n.reason.describe()).unwrap_or("Wrap up");

        let mut out = String::new();
        let header = match kind {
            ContextKind::Continue => "CONTINUING PROJECT WORK",
            ContextKind::Debug => "DEBUG REQUEST",
            ContextKind::Feature => "NEW FEATURE REQUEST",
            ContextKind::Question => "PROJECT QUESTION",
        };
        let _ = writeln!(out, "{} - {}", header, project.to_uppercase());
        let _ = writeln!(out);

        match kind {
            ContextKind::Debug => {
                let _ = writeln!(out, "ERROR MESSAGE: [PASTE ERROR HERE]");
                let _ = writeln!(out);
            }
            ContextKind::Feature => {
                let _ = writeln!(out, "FEATURE: [DESCRIBE FEATURE HERE]");
                let _ = writeln!(out);
                let _ = writeln!(out, "PHASES:");
                for phase in self.phase_progress() {
                    let mark = match phase.status {
                        PhaseStatus::Completed => "[x]",
                        PhaseStatus::InProgress => "[~]",
                        PhaseStatus::NotStarted => "[ ]",
                    };
                    let _ = writeln!(out, "- {} {} ({}%)", mark, phase.name, phase.percentage);
                }
                let _ = writeln!(out);
            }
            ContextKind::Question => {
                let _ = writeln!(out, "QUESTION: [ADD YOUR QUESTION HERE]");
                let _ = writeln!(out);
            }
            ContextKind::Continue => {}
        }

        let _ = writeln!(out, "LAST COMPLETED: {}", last_completed);
        let _ = writeln!(out, "CURRENT FOCUS: {}", focus);
        let _ = writeln!(out, "TIME SPENT: {}", focus_time);
        let _ = writeln!(
            out,
            "PROGRESS: {}% complete ({}/{} tasks)",
            stats.completion_rate, stats.completed_tasks, stats.total_tasks
        );
        let _ = writeln!(out, "NEXT STEP: {}", step);
        let _ = writeln!(out, "CONTEXT: {}", why);

        if kind == ContextKind::Continue {
            let _ = writeln!(out);
            let _ = writeln!(out, "Please help me: [ADD YOUR REQUEST HERE]");
        }

        out
    }
}

//! Open blueprints held by the server between tool calls.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::{AppState, SharedState};
use crate::autosave::{self, AutosaveState, FlushOutcome};
use crate::error::{AppError, AppResult, StorageError, TrackerError, TrackerResult};
use crate::storage::{BlueprintStore, Storage};
use crate::tracker::{ActiveTimer, ProgressTracker, Stats};

/// One project's blueprint with its timer and save bookkeeping.
#[derive(Debug)]
pub struct OpenBlueprint {
    /// Project the blueprint belongs to.
    pub project_id: String,
    /// The in-memory document.
    pub tracker: ProgressTracker,
    /// Running timer, if any.
    pub timer: Option<ActiveTimer>,
    /// Dirty flag and mutation generation.
    pub autosave: AutosaveState,
    /// Error from the most recent failed save, cleared by the next success.
    pub last_save_error: Option<String>,
}

/// Result of opening a blueprint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSummary {
    /// Project id.
    pub project_id: String,
    /// Blueprint name.
    pub name: String,
    /// Template the blueprint was seeded from.
    pub template_id: String,
    /// Whether a new blueprint was seeded from a template.
    pub seeded: bool,
    /// Whether the blueprint was already open.
    pub already_open: bool,
    /// Session started by this open, if any.
    pub session_id: Option<String>,
    /// Progress at open time.
    pub stats: Stats,
}

/// Map of open blueprints keyed by project id.
///
/// Each tool call holds the lock for one operation.
#[derive(Debug, Default)]
pub struct Workspace {
    open: Mutex<HashMap<String, OpenBlueprint>>,
}

impl Workspace {
    /// Empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the open-blueprint map.
    pub async fn lock(&self) -> MutexGuard<'_, HashMap<String, OpenBlueprint>> {
        self.open.lock().await
    }

    /// Project ids currently open.
    pub async fn open_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.open.lock().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl AppState {
    /// Open the blueprint of a project, seeding it from a template when the
    /// project has none. Each fresh open starts a new session.
    pub async fn open_blueprint(
        &self,
        project_id: &str,
        template: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<(OpenSummary, Option<u64>)> {
        let mut open = self.workspace.lock().await;

        if let Some(entry) = open.get(project_id) {
            let summary = OpenSummary {
                project_id: project_id.to_string(),
                name: entry.tracker.blueprint().name.clone(),
                template_id: entry.tracker.blueprint().template_id.clone(),
                seeded: false,
                already_open: true,
                session_id: entry.tracker.current_session().map(|s| s.id.clone()),
                stats: entry.tracker.compute_stats(),
            };
            return Ok((summary, None));
        }

        let (mut entry, seeded) = self.load_or_seed(project_id, template, now).await?;
        let session_id = entry.tracker.begin_session(now).id.clone();
        let generation = entry.autosave.mark_dirty();

        let summary = OpenSummary {
            project_id: project_id.to_string(),
            name: entry.tracker.blueprint().name.clone(),
            template_id: entry.tracker.blueprint().template_id.clone(),
            seeded,
            already_open: false,
            session_id: Some(session_id),
            stats: entry.tracker.compute_stats(),
        };

        info!(
            project_id = %project_id,
            seeded,
            template = %summary.template_id,
            "Blueprint opened"
        );
        open.insert(project_id.to_string(), entry);

        Ok((summary, Some(generation)))
    }

    async fn load_or_seed(
        &self,
        project_id: &str,
        template: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<(OpenBlueprint, bool)> {
        let project = self
            .storage
            .get_project(project_id)
            .await?
            .ok_or_else(|| StorageError::ProjectNotFound {
                project_id: project_id.to_string(),
            })?;

        let (blueprint, seeded) = match self.storage.load_blueprint(project_id).await? {
            Some(stored) => (stored.prepare()?, false),
            None => {
                let key = template.unwrap_or(self.config.blueprint.default_template.as_str());
                let template = self
                    .templates
                    .get(key)
                    .ok_or_else(|| TrackerError::not_found("template", key))?;
                (template.instantiate(project.name.clone(), now)?, true)
            }
        };

        let entry = OpenBlueprint {
            project_id: project_id.to_string(),
            tracker: ProgressTracker::new(blueprint),
            timer: None,
            autosave: AutosaveState::new(),
            last_save_error: None,
        };
        Ok((entry, seeded))
    }

    /// Run a read-only query against an open blueprint.
    pub async fn inspect<R>(
        &self,
        project_id: &str,
        query: impl FnOnce(&OpenBlueprint) -> R,
    ) -> AppResult<R> {
        let open = self.workspace.lock().await;
        let entry = open
            .get(project_id)
            .ok_or_else(|| not_open(project_id))?;
        Ok(query(entry))
    }

    /// Apply a mutation to an open blueprint. On success the blueprint is
    /// marked dirty and the new generation returned for scheduling.
    pub async fn mutate<R>(
        &self,
        project_id: &str,
        mutation: impl FnOnce(&mut OpenBlueprint) -> TrackerResult<R>,
    ) -> AppResult<(R, u64)> {
        let mut open = self.workspace.lock().await;
        let entry = open
            .get_mut(project_id)
            .ok_or_else(|| not_open(project_id))?;

        let result = mutation(entry)?;
        let generation = entry.autosave.mark_dirty();
        Ok((result, generation))
    }

    /// Like [`AppState::mutate`], but the blueprint is only marked dirty
    /// when `changed` accepts the result. No generation is returned otherwise.
    pub async fn mutate_if<R>(
        &self,
        project_id: &str,
        mutation: impl FnOnce(&mut OpenBlueprint) -> TrackerResult<R>,
        changed: impl FnOnce(&R) -> bool,
    ) -> AppResult<(R, Option<u64>)> {
        let mut open = self.workspace.lock().await;
        let entry = open
            .get_mut(project_id)
            .ok_or_else(|| not_open(project_id))?;

        let result = mutation(entry)?;
        let generation = changed(&result).then(|| entry.autosave.mark_dirty());
        Ok((result, generation))
    }

    /// Save an open blueprint now if it has unsaved changes.
    pub async fn save_now(&self, project_id: &str, now: DateTime<Utc>) -> AppResult<FlushOutcome> {
        let mut open = self.workspace.lock().await;
        let entry = open
            .get_mut(project_id)
            .ok_or_else(|| not_open(project_id))?;

        let outcome = self.flush_entry(entry, None, now).await?;
        Ok(outcome)
    }

    /// Forget an open blueprint without saving it.
    pub async fn close_blueprint(&self, project_id: &str) -> bool {
        self.workspace.lock().await.remove(project_id).is_some()
    }

    /// Stop running timers and save every dirty blueprint.
    ///
    /// Failures are logged and the remaining blueprints are still saved.
    /// Returns the number of blueprints that could not be saved.
    pub async fn flush_all(&self, now: DateTime<Utc>) -> usize {
        let mut open = self.workspace.lock().await;
        let mut failed = 0;

        for entry in open.values_mut() {
            if entry.tracker.stop_timer(&mut entry.timer, now).is_some() {
                entry.autosave.mark_dirty();
            }
            if self.flush_entry(entry, None, now).await.is_err() {
                failed += 1;
            }
        }

        if failed > 0 {
            warn!(failed, "Some blueprints could not be saved on shutdown");
        } else {
            info!(open = open.len(), "All blueprints flushed");
        }
        failed
    }

    async fn flush_entry(
        &self,
        entry: &mut OpenBlueprint,
        scheduled: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<FlushOutcome, StorageError> {
        let result = autosave::flush(
            &self.storage,
            &entry.project_id,
            &entry.tracker,
            &mut entry.autosave,
            scheduled,
            self.config.blueprint.session_history_limit,
            now,
        )
        .await;

        match &result {
            Ok(FlushOutcome::Superseded) => {}
            Ok(_) => entry.last_save_error = None,
            Err(e) => entry.last_save_error = Some(e.to_string()),
        }
        result
    }
}

fn not_open(project_id: &str) -> AppError {
    AppError::Tracker(TrackerError::NotFound {
        kind: "open blueprint",
        id: format!("{} (call blueprint_open first)", project_id),
    })
}

/// Save `project_id` after the configured quiet period, unless a newer
/// mutation supersedes `generation` in the meantime.
pub fn schedule_autosave(state: &SharedState, project_id: &str, generation: u64) {
    let state = Arc::clone(state);
    let project_id = project_id.to_string();
    let delay = state.config.blueprint.autosave_delay();

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut open = state.workspace.lock().await;
        let Some(entry) = open.get_mut(&project_id) else {
            debug!(project_id = %project_id, "Blueprint closed before autosave");
            return;
        };

        // Failures are logged and kept on the entry; it stays dirty for the next attempt
        let _ = state.flush_entry(entry, Some(generation), Utc::now()).await;
    });
}

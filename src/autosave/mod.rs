//! Debounced persistence of open blueprints.
//!
//! Every mutation marks the blueprint dirty and bumps a generation
//! counter. The host schedules a flush after a quiet period, tagged with
//! the generation it saw; when the flush runs it only writes if no newer
//! mutation arrived in between. Explicit saves and shutdown flush
//! untagged, so they always write a dirty blueprint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::storage::BlueprintStore;
use crate::tracker::ProgressTracker;

/// Dirty flag plus mutation generation for one open blueprint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutosaveState {
    dirty: bool,
    generation: u64,
}

/// What a flush attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushOutcome {
    /// The blueprint was written.
    Saved,
    /// Nothing to write.
    Clean,
    /// A newer mutation is pending; its own flush will write.
    Superseded,
}

impl AutosaveState {
    /// Clean state at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation and return the new generation.
    pub fn mark_dirty(&mut self) -> u64 {
        self.dirty = true;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Whether unsaved mutations exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Generation of the latest mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `generation` is still the latest mutation.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Clear the dirty flag if nothing changed since `generation` was
    /// snapshotted. Returns whether the flag was cleared.
    pub fn mark_saved(&mut self, generation: u64) -> bool {
        if self.is_current(generation) {
            self.dirty = false;
            true
        } else {
            false
        }
    }
}

/// Write the tracker's blueprint if it is dirty.
///
/// With `scheduled = Some(generation)` the write is skipped when a newer
/// mutation exists. A failed write leaves `state` dirty and the tracker
/// untouched.
pub async fn flush(
    store: &dyn BlueprintStore,
    project_id: &str,
    tracker: &ProgressTracker,
    state: &mut AutosaveState,
    scheduled: Option<u64>,
    session_limit: usize,
    now: DateTime<Utc>,
) -> StorageResult<FlushOutcome> {
    if !state.is_dirty() {
        return Ok(FlushOutcome::Clean);
    }
    if let Some(generation) = scheduled {
        if !state.is_current(generation) {
            debug!(project_id = %project_id, generation, "Autosave superseded");
            return Ok(FlushOutcome::Superseded);
        }
    }

    let generation = state.generation();
    let snapshot = tracker.snapshot_for_save(session_limit, now);

    if let Err(e) = store.save_blueprint(project_id, &snapshot).await {
        warn!(project_id = %project_id, error = %e, "Blueprint save failed, keeping changes");
        return Err(e);
    }

    state.mark_saved(generation);
    debug!(project_id = %project_id, generation, "Blueprint saved");
    Ok(FlushOutcome::Saved)
}

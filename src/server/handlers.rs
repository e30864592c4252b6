use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{schedule_autosave, OpenBlueprint, SharedState};
use crate::autosave::FlushOutcome;
use crate::blueprint::{Blueprint, Decision, TaskState};
use crate::error::{McpError, McpResult, StorageError, TrackerResult};
use crate::storage::{Project, Storage};
use crate::templates::TemplateSummary;
use crate::tracker::{
    format_duration, ActiveTimer, ContextKind, NextTask, PhaseProgress, Stats, TimerFlush,
};

/// Shown instead of stored credential values.
pub const REDACTED: &str = "[redacted]";

/// Route tool calls to appropriate handlers
pub async fn handle_tool_call(
    state: &SharedState,
    tool_name: &str,
    arguments: Option<Value>,
) -> McpResult<Value> {
    info!(tool = %tool_name, "Routing tool call");

    match tool_name {
        // Projects
        "project_create" => handle_project_create(state, arguments).await,
        "project_get" => handle_project_get(state, arguments).await,
        "project_list" => handle_project_list(state, arguments).await,
        "project_update" => handle_project_update(state, arguments).await,
        "project_delete" => handle_project_delete(state, arguments).await,
        // Templates
        "template_list" => handle_template_list(state, arguments).await,
        // Blueprint lifecycle
        "blueprint_open" => handle_blueprint_open(state, arguments).await,
        "blueprint_get" => handle_blueprint_get(state, arguments).await,
        "blueprint_save" => handle_blueprint_save(state, arguments).await,
        // Progress
        "blueprint_toggle_checklist" => handle_toggle_checklist(state, arguments).await,
        "blueprint_stats" => handle_stats(state, arguments).await,
        "blueprint_next_task" => handle_next_task(state, arguments).await,
        "blueprint_complete_phase" => handle_complete_phase(state, arguments).await,
        // Time tracking
        "blueprint_timer_start" => handle_timer_start(state, arguments).await,
        "blueprint_timer_stop" => handle_timer_stop(state, arguments).await,
        "blueprint_reset_time" => handle_reset_time(state, arguments).await,
        // Decisions, credentials, context
        "blueprint_add_decision" => handle_add_decision(state, arguments).await,
        "blueprint_delete_decision" => handle_delete_decision(state, arguments).await,
        "blueprint_set_credential" => handle_set_credential(state, arguments).await,
        "blueprint_context" => handle_context(state, arguments).await,
        _ => Err(McpError::UnknownTool {
            tool_name: tool_name.to_string(),
        }),
    }
}

// ============================================================================
// Project handlers
// ============================================================================

/// Parameters for project_create
#[derive(Debug, Deserialize)]
pub struct ProjectCreateParams {
    /// Project name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional status label
    #[serde(default)]
    pub status: Option<String>,
    /// Optional tech stack
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
}

/// Parameters for project_update; omitted fields are kept
#[derive(Debug, Deserialize)]
pub struct ProjectUpdateParams {
    /// Project to update
    pub project_id: String,
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New status label
    #[serde(default)]
    pub status: Option<String>,
    /// New tech stack
    #[serde(default)]
    pub tech_stack: Option<Vec<String>>,
}

/// Parameters naming a single project
#[derive(Debug, Deserialize)]
pub struct ProjectIdParams {
    /// Project ID
    pub project_id: String,
}

/// Response for project_list
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    /// Projects, most recently updated first
    pub projects: Vec<Project>,
    /// Number of projects
    pub count: usize,
}

async fn handle_project_create(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectCreateParams = parse_arguments("project_create", arguments)?;

    if params.name.trim().is_empty() {
        return Err(McpError::InvalidParameters {
            tool_name: "project_create".to_string(),
            message: "name cannot be empty".to_string(),
        });
    }

    let mut project = Project::new(params.name.trim());
    if let Some(description) = params.description {
        project = project.with_description(description);
    }
    if let Some(status) = params.status {
        project = project.with_status(status);
    }
    if let Some(tech_stack) = params.tech_stack {
        project = project.with_tech_stack(tech_stack);
    }

    state.storage.create_project(&project).await?;
    info!(project_id = %project.id, name = %project.name, "Project created");

    serde_json::to_value(project).map_err(McpError::Json)
}

async fn handle_project_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler("project_get", arguments, |params: ProjectIdParams| async move {
        state
            .storage
            .get_project(&params.project_id)
            .await?
            .map(redact_project)
            .ok_or(StorageError::ProjectNotFound {
                project_id: params.project_id,
            })
    })
    .await
}

async fn handle_project_list(state: &SharedState, _arguments: Option<Value>) -> McpResult<Value> {
    let projects = state.storage.list_projects().await?;
    let count = projects.len();

    serde_json::to_value(ProjectListResponse { projects, count }).map_err(McpError::Json)
}

async fn handle_project_update(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    execute_handler(
        "project_update",
        arguments,
        |params: ProjectUpdateParams| async move {
            let mut project = state
                .storage
                .get_project(&params.project_id)
                .await?
                .ok_or_else(|| StorageError::ProjectNotFound {
                    project_id: params.project_id.clone(),
                })?;

            if let Some(name) = params.name.filter(|n| !n.trim().is_empty()) {
                project.name = name;
            }
            if let Some(description) = params.description {
                project.description = description;
            }
            if let Some(status) = params.status {
                project.status = status;
            }
            if let Some(tech_stack) = params.tech_stack {
                project.tech_stack = tech_stack;
            }

            state.storage.update_project(&project).await.map(redact_project)
        },
    )
    .await
}

async fn handle_project_delete(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("project_delete", arguments)?;

    state.storage.delete_project(&params.project_id).await?;
    let closed = state.close_blueprint(&params.project_id).await;
    info!(project_id = %params.project_id, closed, "Project deleted");

    Ok(serde_json::json!({
        "projectId": params.project_id,
        "deleted": true,
        "closedBlueprint": closed,
    }))
}

// ============================================================================
// Template handlers
// ============================================================================

/// Response for template_list
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListResponse {
    /// Available templates
    pub templates: Vec<TemplateSummary>,
    /// Number of templates
    pub count: usize,
    /// Template used when blueprint_open names none
    pub default_template: String,
}

async fn handle_template_list(state: &SharedState, _arguments: Option<Value>) -> McpResult<Value> {
    let templates = state.templates.list();
    let response = TemplateListResponse {
        count: templates.len(),
        templates,
        default_template: state.config.blueprint.default_template.clone(),
    };

    serde_json::to_value(response).map_err(McpError::Json)
}

// ============================================================================
// Blueprint lifecycle handlers
// ============================================================================

/// Parameters for blueprint_open
#[derive(Debug, Deserialize)]
pub struct BlueprintOpenParams {
    /// Project whose blueprint to open
    pub project_id: String,
    /// Template key used when the project has no blueprint yet
    #[serde(default)]
    pub template: Option<String>,
}

async fn handle_blueprint_open(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: BlueprintOpenParams = parse_arguments("blueprint_open", arguments)?;

    let (summary, generation) = state
        .open_blueprint(&params.project_id, params.template.as_deref(), Utc::now())
        .await?;
    if let Some(generation) = generation {
        schedule_autosave(state, &params.project_id, generation);
    }

    serde_json::to_value(summary).map_err(McpError::Json)
}

/// Response for blueprint_get
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintView {
    /// Document with derived fields filled in and credentials redacted
    pub blueprint: Value,
    /// Running timer, if any
    pub active_timer: Option<ActiveTimer>,
    /// Whether unsaved changes exist
    pub dirty: bool,
    /// Why the last save failed, while it has not been retried successfully
    pub last_save_error: Option<String>,
}

fn redact_credentials(blueprint: &mut Blueprint) {
    blueprint
        .credentials
        .values_mut()
        .for_each(|value| *value = REDACTED.to_string());
}

fn redact_project(mut project: Project) -> Project {
    if let Some(blueprint) = project.blueprint.as_mut() {
        redact_credentials(blueprint);
    }
    project
}

async fn handle_blueprint_get(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("blueprint_get", arguments)?;
    let limit = state.config.blueprint.session_history_limit;
    let now = Utc::now();

    let (mut snapshot, active_timer, dirty, last_save_error) = state
        .inspect(&params.project_id, |entry| {
            (
                entry.tracker.snapshot_for_save(limit, now),
                entry.timer.clone(),
                entry.autosave.is_dirty(),
                entry.last_save_error.clone(),
            )
        })
        .await?;

    redact_credentials(&mut snapshot);

    let view = BlueprintView {
        blueprint: serde_json::to_value(snapshot)?,
        active_timer,
        dirty,
        last_save_error,
    };
    serde_json::to_value(view).map_err(McpError::Json)
}

async fn handle_blueprint_save(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("blueprint_save", arguments)?;

    let outcome = state.save_now(&params.project_id, Utc::now()).await?;
    info!(project_id = %params.project_id, outcome = ?outcome, "Explicit save");

    Ok(serde_json::json!({
        "projectId": params.project_id,
        "outcome": outcome,
        "saved": outcome == FlushOutcome::Saved,
    }))
}

// ============================================================================
// Progress handlers
// ============================================================================

/// Parameters for blueprint_toggle_checklist
#[derive(Debug, Deserialize)]
pub struct ToggleChecklistParams {
    /// Project ID
    pub project_id: String,
    /// Task owning the checklist
    pub task_id: String,
    /// Zero-based item index
    pub index: usize,
}

/// Response for blueprint_toggle_checklist
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleChecklistResponse {
    /// Task ID
    pub task_id: String,
    /// Toggled index
    pub index: usize,
    /// Task state after the toggle
    pub state: TaskState,
    /// Blueprint progress after the toggle
    pub stats: Stats,
}

async fn handle_toggle_checklist(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ToggleChecklistParams = parse_arguments("blueprint_toggle_checklist", arguments)?;

    let (task_state, stats) = mutate_blueprint(state, &params.project_id, |entry| {
        let task_state = entry
            .tracker
            .toggle_checklist_item(&params.task_id, params.index)?;
        Ok((task_state, entry.tracker.compute_stats()))
    })
    .await?;

    let response = ToggleChecklistResponse {
        task_id: params.task_id,
        index: params.index,
        state: task_state,
        stats,
    };
    serde_json::to_value(response).map_err(McpError::Json)
}

/// Response for blueprint_stats
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Aggregate progress
    pub stats: Stats,
    /// Per-phase progress
    pub phases: Vec<PhaseProgress>,
    /// Sessions started today (UTC)
    pub sessions_today: usize,
    /// Total time spent, formatted
    pub total_time: String,
    /// Running timer, if any
    pub active_timer: Option<ActiveTimer>,
}

async fn handle_stats(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("blueprint_stats", arguments)?;
    let today = Utc::now().date_naive();

    let response = state
        .inspect(&params.project_id, |entry| {
            let stats = entry.tracker.compute_stats();
            StatsResponse {
                stats,
                phases: entry.tracker.phase_progress(),
                sessions_today: entry.tracker.sessions_on(today),
                total_time: format_duration(stats.total_time_spent),
                active_timer: entry.timer.clone(),
            }
        })
        .await?;

    serde_json::to_value(response).map_err(McpError::Json)
}

/// Response for blueprint_next_task
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTaskResponse {
    /// Recommended task, `null` once everything is complete
    pub next: Option<NextTask>,
    /// Why it was picked
    pub explanation: String,
}

async fn handle_next_task(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("blueprint_next_task", arguments)?;

    let next = state
        .inspect(&params.project_id, |entry| entry.tracker.select_next_task())
        .await?;

    let explanation = next
        .as_ref()
        .map(|n| n.reason.describe().to_string())
        .unwrap_or_else(|| "All tasks complete".to_string());

    serde_json::to_value(NextTaskResponse { next, explanation }).map_err(McpError::Json)
}

/// Parameters for blueprint_complete_phase
#[derive(Debug, Deserialize)]
pub struct CompletePhaseParams {
    /// Project ID
    pub project_id: String,
    /// Phase to force-complete
    pub phase_id: String,
}

async fn handle_complete_phase(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: CompletePhaseParams = parse_arguments("blueprint_complete_phase", arguments)?;

    let progress = mutate_blueprint(state, &params.project_id, |entry| {
        entry.tracker.mark_phase_complete(&params.phase_id)
    })
    .await?;

    serde_json::to_value(progress).map_err(McpError::Json)
}

// ============================================================================
// Time tracking handlers
// ============================================================================

/// Parameters naming a task
#[derive(Debug, Deserialize)]
pub struct TaskParams {
    /// Project ID
    pub project_id: String,
    /// Task ID
    pub task_id: String,
}

/// Response for blueprint_timer_start
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStartResponse {
    /// Timer now running
    pub timer: ActiveTimer,
    /// Previous timer stopped by this start
    pub flushed: Option<TimerFlush>,
}

/// Response for blueprint_timer_stop
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStopResponse {
    /// Time recorded by the stop, `null` when no timer was running
    pub stopped: Option<TimerFlush>,
    /// Task total after the stop, formatted
    pub total_time: Option<String>,
}

async fn handle_timer_start(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: TaskParams = parse_arguments("blueprint_timer_start", arguments)?;
    let now = Utc::now();

    let response = mutate_blueprint(state, &params.project_id, |entry| {
        let flushed = entry
            .tracker
            .start_timer(&mut entry.timer, &params.task_id, now)?;
        Ok(TimerStartResponse {
            timer: ActiveTimer {
                task_id: params.task_id.clone(),
                started_at: now,
            },
            flushed,
        })
    })
    .await?;

    serde_json::to_value(response).map_err(McpError::Json)
}

async fn handle_timer_stop(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ProjectIdParams = parse_arguments("blueprint_timer_stop", arguments)?;
    let now = Utc::now();

    let (stopped, generation) = state
        .mutate_if(
            &params.project_id,
            |entry| Ok(entry.tracker.stop_timer(&mut entry.timer, now)),
            Option::is_some,
        )
        .await?;
    if let Some(generation) = generation {
        schedule_autosave(state, &params.project_id, generation);
    }

    let response = TimerStopResponse {
        total_time: stopped.as_ref().map(|f| format_duration(f.total_secs)),
        stopped,
    };
    serde_json::to_value(response).map_err(McpError::Json)
}

async fn handle_reset_time(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: TaskParams = parse_arguments("blueprint_reset_time", arguments)?;
    let now = Utc::now();

    let previous = mutate_blueprint(state, &params.project_id, |entry| {
        entry
            .tracker
            .reset_time(&mut entry.timer, &params.task_id, now)
    })
    .await?;

    Ok(serde_json::json!({
        "taskId": params.task_id,
        "previousSeconds": previous,
        "previousTime": format_duration(previous),
    }))
}

// ============================================================================
// Decision, credential and context handlers
// ============================================================================

/// Parameters for blueprint_add_decision
#[derive(Debug, Deserialize)]
pub struct AddDecisionParams {
    /// Project ID
    pub project_id: String,
    /// What was decided
    pub decision: String,
    /// Why
    pub reason: String,
    /// Expected impact
    #[serde(default)]
    pub impact: String,
}

/// Parameters for blueprint_delete_decision
#[derive(Debug, Deserialize)]
pub struct DeleteDecisionParams {
    /// Project ID
    pub project_id: String,
    /// Decision to remove
    pub decision_id: String,
}

/// Parameters for blueprint_set_credential
#[derive(Debug, Deserialize)]
pub struct SetCredentialParams {
    /// Project ID
    pub project_id: String,
    /// Credential key
    pub key: String,
    /// New value; omit to remove the key
    #[serde(default)]
    pub value: Option<String>,
}

/// Parameters for blueprint_context
#[derive(Debug, Deserialize)]
pub struct ContextParams {
    /// Project ID
    pub project_id: String,
    /// continue, debug, feature or question
    #[serde(default)]
    pub kind: Option<String>,
}

async fn handle_add_decision(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: AddDecisionParams = parse_arguments("blueprint_add_decision", arguments)?;
    let now = Utc::now();

    let decision: Decision = mutate_blueprint(state, &params.project_id, |entry| {
        entry
            .tracker
            .add_decision(&params.decision, &params.reason, &params.impact, now)
    })
    .await?;

    serde_json::to_value(decision).map_err(McpError::Json)
}

async fn handle_delete_decision(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: DeleteDecisionParams = parse_arguments("blueprint_delete_decision", arguments)?;

    let removed = mutate_blueprint(state, &params.project_id, |entry| {
        entry.tracker.delete_decision(&params.decision_id)
    })
    .await?;

    serde_json::to_value(removed).map_err(McpError::Json)
}

async fn handle_set_credential(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: SetCredentialParams = parse_arguments("blueprint_set_credential", arguments)?;

    let stored = mutate_blueprint(state, &params.project_id, |entry| match &params.value {
        Some(value) => entry
            .tracker
            .set_credential(&params.key, value)
            .map(|_| true),
        None => entry.tracker.remove_credential(&params.key).map(|_| false),
    })
    .await?;

    Ok(serde_json::json!({
        "key": params.key.trim(),
        "stored": stored,
    }))
}

async fn handle_context(state: &SharedState, arguments: Option<Value>) -> McpResult<Value> {
    let params: ContextParams = parse_arguments("blueprint_context", arguments)?;

    let kind: ContextKind = match params.kind.as_deref() {
        Some(raw) => raw.parse().map_err(|e: String| McpError::InvalidParameters {
            tool_name: "blueprint_context".to_string(),
            message: e,
        })?,
        None => ContextKind::default(),
    };

    let text = state
        .inspect(&params.project_id, |entry| {
            let name = entry.tracker.blueprint().name.clone();
            entry.tracker.render_context(&name, kind)
        })
        .await?;

    Ok(serde_json::json!({
        "kind": kind,
        "text": text,
    }))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Helper to parse arguments with consistent error handling
fn parse_arguments<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    arguments: Option<Value>,
) -> McpResult<T> {
    match arguments {
        Some(args) => serde_json::from_value(args).map_err(|e| McpError::InvalidParameters {
            tool_name: tool_name.to_string(),
            message: e.to_string(),
        }),
        None => Err(McpError::InvalidParameters {
            tool_name: tool_name.to_string(),
            message: "Missing arguments".to_string(),
        }),
    }
}

/// Generic handler that runs a storage operation with consistent error handling.
///
/// # Type Parameters
/// - `P`: Parameter type (must implement DeserializeOwned)
/// - `R`: Result type (must implement Serialize)
/// - `E`: Error type (must implement Display)
/// - `F`: Async operation that takes P and returns Result<R, E>
async fn execute_handler<P, R, E, F, Fut>(
    tool_name: &str,
    arguments: Option<Value>,
    operation: F,
) -> McpResult<Value>
where
    P: serde::de::DeserializeOwned,
    R: Serialize,
    E: std::fmt::Display,
    F: FnOnce(P) -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
{
    let params: P = parse_arguments(tool_name, arguments)?;

    let result = operation(params)
        .await
        .map_err(|e| McpError::ExecutionFailed {
            message: e.to_string(),
        })?;

    serde_json::to_value(result).map_err(McpError::Json)
}

/// Apply a tracker mutation to an open blueprint and schedule its autosave.
async fn mutate_blueprint<R>(
    state: &SharedState,
    project_id: &str,
    mutation: impl FnOnce(&mut OpenBlueprint) -> TrackerResult<R>,
) -> McpResult<R> {
    let (result, generation) = state.mutate(project_id, mutation).await?;
    schedule_autosave(state, project_id, generation);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestParams {
        content: String,
        value: i32,
    }

    #[test]
    fn test_parse_arguments_success() {
        let args = Some(json!({
            "content": "test content",
            "value": 42
        }));

        let params: TestParams = parse_arguments("test.tool", args).unwrap();
        assert_eq!(params.content, "test content");
        assert_eq!(params.value, 42);
    }

    #[test]
    fn test_parse_arguments_missing_arguments() {
        let result: McpResult<TestParams> = parse_arguments("test.tool", None);

        let err = result.unwrap_err();
        assert!(matches!(err, McpError::InvalidParameters { .. }));
        assert!(err.to_string().contains("Missing arguments"));
        assert!(err.to_string().contains("test.tool"));
    }

    #[test]
    fn test_parse_arguments_wrong_type() {
        let args = Some(json!({
            "content": "test",
            "value": "not a number"
        }));

        let result: McpResult<TestParams> = parse_arguments("test.tool", args);
        assert!(matches!(result, Err(McpError::InvalidParameters { .. })));
    }

    #[test]
    fn test_parse_toggle_params() {
        let args = Some(json!({
            "project_id": "p1",
            "task_id": "database-setup",
            "index": 3
        }));

        let params: ToggleChecklistParams =
            parse_arguments("blueprint_toggle_checklist", args).unwrap();
        assert_eq!(params.task_id, "database-setup");
        assert_eq!(params.index, 3);
    }

    #[test]
    fn test_parse_toggle_params_negative_index_rejected() {
        let args = Some(json!({
            "project_id": "p1",
            "task_id": "t",
            "index": -1
        }));

        let result: McpResult<ToggleChecklistParams> =
            parse_arguments("blueprint_toggle_checklist", args);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_decision_impact_defaults_empty() {
        let args = Some(json!({
            "project_id": "p1",
            "decision": "Use SQLite",
            "reason": "Single user"
        }));

        let params: AddDecisionParams = parse_arguments("blueprint_add_decision", args).unwrap();
        assert!(params.impact.is_empty());
    }

    #[test]
    fn test_parse_set_credential_without_value() {
        let args = Some(json!({"project_id": "p1", "key": "awsRegion"}));
        let params: SetCredentialParams =
            parse_arguments("blueprint_set_credential", args).unwrap();
        assert!(params.value.is_none());
    }

    #[test]
    fn test_parse_project_create_minimal() {
        let args = Some(json!({"name": "Hub"}));
        let params: ProjectCreateParams = parse_arguments("project_create", args).unwrap();
        assert_eq!(params.name, "Hub");
        assert!(params.tech_stack.is_none());
    }
}

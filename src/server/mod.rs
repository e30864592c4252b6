//! Server module for MCP protocol handling.
//!
//! This module provides:
//! - MCP server implementation over stdio
//! - Tool call handlers and routing
//! - Shared application state and the workspace of open blueprints

mod handlers;
mod mcp;
mod workspace;

pub use handlers::*;
pub use mcp::*;
pub use workspace::{schedule_autosave, OpenBlueprint, OpenSummary, Workspace};

use std::sync::Arc;

use crate::config::Config;
use crate::storage::SqliteStorage;
use crate::templates::TemplateRegistry;

/// Application state shared across handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// SQLite storage backend.
    pub storage: SqliteStorage,
    /// Blueprint template registry.
    pub templates: Arc<TemplateRegistry>,
    /// Blueprints opened by tool calls.
    pub workspace: Workspace,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, storage: SqliteStorage) -> Self {
        tracing::info!(
            default_template = %config.blueprint.default_template,
            autosave_delay_ms = config.blueprint.autosave_delay_ms,
            session_history_limit = config.blueprint.session_history_limit,
            "AppState initializing"
        );

        Self {
            config,
            storage,
            templates: Arc::new(TemplateRegistry::new()),
            workspace: Workspace::new(),
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_new() {
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        let state = AppState::new(Config::default(), storage);

        assert_eq!(state.templates.count(), 5);
        assert!(state.workspace.open_ids().await.is_empty());
        assert_eq!(state.config.blueprint.default_template, "jdx-tech-hub");
    }

    #[tokio::test]
    async fn test_shared_state_is_cloneable_handle() {
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        let state: SharedState = Arc::new(AppState::new(Config::default(), storage));
        let other = Arc::clone(&state);
        assert_eq!(Arc::strong_count(&other), 2);
    }
}

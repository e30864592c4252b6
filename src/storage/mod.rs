//! Storage layer for projects and their blueprints.
//!
//! This module provides SQLite-based storage for the project list and the
//! per-project blueprint document, which is saved and loaded whole.

mod sqlite;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blueprint::Blueprint;
use crate::error::StorageResult;

/// Status given to projects created without one.
pub const DEFAULT_PROJECT_STATUS: &str = "active";

/// A tracked development project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Free-form status label (e.g., "active", "development").
    pub status: String,
    /// Technologies used by the project.
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project record or its blueprint last changed.
    pub updated_at: DateTime<Utc>,
    /// Attached blueprint document, loaded only for single-project reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<Blueprint>,
}

impl Project {
    /// Create a new active project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            status: DEFAULT_PROJECT_STATUS.to_string(),
            tech_stack: Vec::new(),
            created_at: now,
            updated_at: now,
            blueprint: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status label
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the tech stack
    pub fn with_tech_stack<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech_stack = items.into_iter().map(Into::into).collect();
        self
    }
}

/// Project record persistence.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a new project.
    async fn create_project(&self, project: &Project) -> StorageResult<()>;

    /// Get a project by ID.
    async fn get_project(&self, id: &str) -> StorageResult<Option<Project>>;

    /// All projects, most recently updated first.
    async fn list_projects(&self) -> StorageResult<Vec<Project>>;

    /// Replace a project's fields and refresh `updated_at`.
    ///
    /// Returns the stored record. Fails with `ProjectNotFound` for an
    /// unknown id.
    async fn update_project(&self, project: &Project) -> StorageResult<Project>;

    /// Delete a project and its blueprint.
    async fn delete_project(&self, id: &str) -> StorageResult<()>;
}

/// Whole-document blueprint persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlueprintStore: Send + Sync {
    /// Load the blueprint of a project.
    ///
    /// `Ok(None)` when the project exists but has no blueprint yet.
    /// The returned document is deserialized only; callers run
    /// [`Blueprint::prepare`] to validate it.
    async fn load_blueprint(&self, project_id: &str) -> StorageResult<Option<Blueprint>>;

    /// Replace the blueprint of a project.
    async fn save_blueprint(&self, project_id: &str, blueprint: &Blueprint) -> StorageResult<()>;
}

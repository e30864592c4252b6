//! Integration tests for SQLite storage layer
//!
//! Tests project records and blueprint documents against an in-memory
//! database, plus a file-backed database that is reopened.

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use jdx_tech_hub::blueprint::{Blueprint, Phase, Task};
use jdx_tech_hub::config::DatabaseConfig;
use jdx_tech_hub::error::StorageError;
use jdx_tech_hub::storage::{BlueprintStore, Project, SqliteStorage, Storage};
use jdx_tech_hub::tracker::ProgressTracker;

/// Create an in-memory storage instance for testing
async fn create_test_storage() -> SqliteStorage {
    SqliteStorage::new_in_memory()
        .await
        .expect("Failed to create in-memory storage")
}

fn sample_blueprint() -> Blueprint {
    let phase = Phase::new("build", "Build", 1)
        .with_task(Task::new("api", "API").with_checklist(["routes", "handlers"]))
        .with_task(Task::new("ui", "UI"));
    Blueprint::new("Sample", "custom", vec![phase]).unwrap()
}

#[cfg(test)]
mod project_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_create_and_get_project() {
        let storage = create_test_storage().await;

        let project = Project::new("Portfolio")
            .with_description("Personal site")
            .with_tech_stack(["Next.js", "Tailwind"]);
        storage.create_project(&project).await.unwrap();

        let retrieved = storage.get_project(&project.id).await.unwrap();
        assert!(retrieved.is_some(), "Project should exist");

        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.name, "Portfolio");
        assert_eq!(retrieved.description, "Personal site");
        assert_eq!(retrieved.status, "active");
        assert_eq!(retrieved.tech_stack, vec!["Next.js", "Tailwind"]);
    }

    #[tokio::test]
    async fn test_get_nonexistent_project() {
        let storage = create_test_storage().await;
        assert!(storage.get_project("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_projects_most_recent_first() {
        let storage = create_test_storage().await;

        let mut older = Project::new("Older");
        older.updated_at = Utc::now() - Duration::hours(1);
        let newer = Project::new("Newer");
        storage.create_project(&older).await.unwrap();
        storage.create_project(&newer).await.unwrap();

        let names: Vec<_> = storage
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_update_project() {
        let storage = create_test_storage().await;

        let mut project = Project::new("Draft");
        storage.create_project(&project).await.unwrap();

        project.status = "completed".to_string();
        let updated = storage.update_project(&project).await.unwrap();
        assert_eq!(updated.status, "completed");
        assert!(updated.updated_at >= project.created_at);
    }

    #[tokio::test]
    async fn test_update_unknown_project_fails() {
        let storage = create_test_storage().await;
        let result = storage.update_project(&Project::new("Ghost")).await;
        assert!(matches!(result, Err(StorageError::ProjectNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let storage = create_test_storage().await;

        let project = Project::new("Temporary");
        storage.create_project(&project).await.unwrap();
        storage.delete_project(&project.id).await.unwrap();

        assert!(storage.get_project(&project.id).await.unwrap().is_none());
        let again = storage.delete_project(&project.id).await;
        assert!(matches!(again, Err(StorageError::ProjectNotFound { .. })));
    }
}

#[cfg(test)]
mod blueprint_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_save_and_load_blueprint() {
        let storage = create_test_storage().await;
        let project = Project::new("Tracked");
        storage.create_project(&project).await.unwrap();

        let blueprint = sample_blueprint();
        storage.save_blueprint(&project.id, &blueprint).await.unwrap();

        let loaded = storage.load_blueprint(&project.id).await.unwrap().unwrap();
        assert_eq!(loaded, blueprint);
    }

    #[tokio::test]
    async fn test_get_project_includes_blueprint() {
        let storage = create_test_storage().await;
        let project = Project::new("Attached");
        storage.create_project(&project).await.unwrap();

        let bare = storage.get_project(&project.id).await.unwrap().unwrap();
        assert!(bare.blueprint.is_none());

        let blueprint = sample_blueprint();
        storage.save_blueprint(&project.id, &blueprint).await.unwrap();

        let fetched = storage.get_project(&project.id).await.unwrap().unwrap();
        assert_eq!(fetched.blueprint, Some(blueprint));

        // Listings stay light
        let listed = storage.list_projects().await.unwrap();
        assert!(listed[0].blueprint.is_none());
    }

    #[tokio::test]
    async fn test_load_blueprint_for_unknown_project() {
        let storage = create_test_storage().await;
        let result = storage.load_blueprint("nobody").await;
        assert!(matches!(result, Err(StorageError::ProjectNotFound { .. })));
    }

    #[tokio::test]
    async fn test_save_blueprint_for_unknown_project() {
        let storage = create_test_storage().await;
        let result = storage.save_blueprint("nobody", &sample_blueprint()).await;
        assert!(matches!(result, Err(StorageError::ProjectNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_project_removes_blueprint() {
        let storage = create_test_storage().await;
        let project = Project::new("Gone");
        storage.create_project(&project).await.unwrap();
        storage
            .save_blueprint(&project.id, &sample_blueprint())
            .await
            .unwrap();

        storage.delete_project(&project.id).await.unwrap();
        assert!(storage.load_blueprint(&project.id).await.is_err());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_in(dir: &TempDir) -> DatabaseConfig {
        DatabaseConfig {
            path: dir.path().join("nested").join("hub.db"),
            max_connections: 2,
        }
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let start = Utc::now();

        let project = Project::new("Persistent");
        {
            let storage = SqliteStorage::new(&config).await.unwrap();
            storage.create_project(&project).await.unwrap();

            let mut tracker = ProgressTracker::new(sample_blueprint());
            for i in 0..5 {
                tracker.begin_session(start + Duration::minutes(i));
            }
            tracker.toggle_checklist_item("api", 0).unwrap();

            let snapshot = tracker.snapshot_for_save(3, start);
            storage.save_blueprint(&project.id, &snapshot).await.unwrap();
            storage.pool().close().await;
        }

        assert!(config.path.exists());

        let storage = SqliteStorage::new(&config).await.unwrap();
        let loaded = storage.load_blueprint(&project.id).await.unwrap().unwrap();

        assert_eq!(loaded.sessions.len(), 3);
        assert_eq!(loaded.sessions[0].start_time, start + Duration::minutes(2));
        assert!(loaded.task("api").unwrap().checklist[0].checked);
        assert_eq!(loaded.current_focus.as_deref(), Some("api"));
        assert_eq!(loaded.last_updated, Some(start));
        assert!(!loaded.task_states["api"].completed);
        assert_eq!(loaded.task_states["api"].checklist[&0], true);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let first = SqliteStorage::new(&config).await.unwrap();
        first.pool().close().await;

        let second = SqliteStorage::new(&config).await;
        assert!(second.is_ok());
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use super::{BlueprintStore, Project, Storage};
use crate::blueprint::Blueprint;
use crate::config::DatabaseConfig;
use crate::error::{StorageError, StorageResult};

/// Static migrator that embeds migrations at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite-backed storage implementation
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    pub async fn new(config: &DatabaseConfig) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = config.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Connection {
                message: format!("Failed to create database directory: {}", e),
            })?;
        }

        let database_url = format!("sqlite://{}?mode=rwc", config.path.display());

        let options = SqliteConnectOptions::from_str(&database_url)
            .map_err(|e| StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// A single connection keeps every query on the same memory database.
    pub async fn new_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            StorageError::Connection {
                message: format!("Invalid database URL: {}", e),
            }
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection {
                message: format!("Failed to connect to database: {}", e),
            })?;

        let storage = Self { pool };
        storage.run_migrations().await?;

        Ok(storage)
    }

    /// Run database migrations using embedded sqlx migrations
    async fn run_migrations(&self) -> StorageResult<()> {
        info!("Running database migrations...");

        MIGRATOR.run(&self.pool).await.map_err(|e| StorageError::Migration {
            message: format!("Failed to run migrations: {}", e),
        })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the underlying pool for advanced queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn encode_tech_stack(items: &[String]) -> StorageResult<String> {
    serde_json::to_string(items).map_err(|e| StorageError::Serialization {
        message: format!("Failed to encode tech stack: {}", e),
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn create_project(&self, project: &Project) -> StorageResult<()> {
        let tech_stack = encode_tech_stack(&project.tech_stack)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, status, tech_stack, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(&tech_stack)
        .bind(project.created_at.to_rfc3339())
        .bind(project.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(project_id = %project.id, "Project created");
        Ok(())
    }

    async fn get_project(&self, id: &str) -> StorageResult<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, status, tech_stack, created_at, updated_at, blueprint
            FROM projects
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, status, tech_stack, created_at, updated_at
            FROM projects
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn update_project(&self, project: &Project) -> StorageResult<Project> {
        let tech_stack = encode_tech_stack(&project.tech_stack)?;
        let updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, description = ?, status = ?, tech_stack = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.status)
        .bind(&tech_stack)
        .bind(updated_at.to_rfc3339())
        .bind(&project.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ProjectNotFound {
                project_id: project.id.clone(),
            });
        }

        self.get_project(&project.id)
            .await?
            .ok_or_else(|| StorageError::ProjectNotFound {
                project_id: project.id.clone(),
            })
    }

    async fn delete_project(&self, id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ProjectNotFound {
                project_id: id.to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl BlueprintStore for SqliteStorage {
    async fn load_blueprint(&self, project_id: &str) -> StorageResult<Option<Blueprint>> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT blueprint FROM projects WHERE id = ?")
                .bind(project_id)
                .fetch_optional(&self.pool)
                .await?;

        let (document,) = row.ok_or_else(|| StorageError::ProjectNotFound {
            project_id: project_id.to_string(),
        })?;

        document
            .map(|json| decode_blueprint(project_id, &json))
            .transpose()
    }

    async fn save_blueprint(&self, project_id: &str, blueprint: &Blueprint) -> StorageResult<()> {
        let document =
            serde_json::to_string(blueprint).map_err(|e| StorageError::Serialization {
                message: format!("Failed to encode blueprint for {}: {}", project_id, e),
            })?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET blueprint = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&document)
        .bind(Utc::now().to_rfc3339())
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ProjectNotFound {
                project_id: project_id.to_string(),
            });
        }

        debug!(project_id = %project_id, bytes = document.len(), "Blueprint saved");
        Ok(())
    }
}

// Internal row types for SQLx mapping
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    name: String,
    description: String,
    status: String,
    tech_stack: String,
    created_at: String,
    updated_at: String,
    // Only selected by single-project reads
    #[sqlx(default)]
    blueprint: Option<String>,
}

fn decode_blueprint(project_id: &str, json: &str) -> StorageResult<Blueprint> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization {
        message: format!("Failed to decode blueprint for {}: {}", project_id, e),
    })
}

fn parse_timestamp(project_id: &str, column: &str, value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization {
            message: format!("Invalid {} for {}: {}", column, project_id, e),
        })
}

impl TryFrom<ProjectRow> for Project {
    type Error = StorageError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let tech_stack =
            serde_json::from_str(&row.tech_stack).map_err(|e| StorageError::Serialization {
                message: format!("Failed to decode tech stack for {}: {}", row.id, e),
            })?;
        let created_at = parse_timestamp(&row.id, "created_at", &row.created_at)?;
        let updated_at = parse_timestamp(&row.id, "updated_at", &row.updated_at)?;
        let blueprint = row
            .blueprint
            .as_deref()
            .map(|json| decode_blueprint(&row.id, json))
            .transpose()?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            status: row.status,
            tech_stack,
            created_at,
            updated_at,
            blueprint,
        })
    }
}

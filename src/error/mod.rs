use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Project not found: {project_id}")]
    ProjectNotFound { project_id: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Errors raised by in-memory blueprint operations.
///
/// These never leave the blueprint in a partially modified state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {field} - {reason}")]
    Validation { field: String, reason: String },
}

impl TrackerError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        TrackerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TrackerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// MCP protocol errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid parameters for {tool_name}: {message}")]
    InvalidParameters { tool_name: String, message: String },

    #[error("Tool execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AppError> for McpError {
    fn from(err: AppError) -> Self {
        McpError::ExecutionFailed {
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for McpError {
    fn from(err: TrackerError) -> Self {
        McpError::ExecutionFailed {
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for McpError {
    fn from(err: StorageError) -> Self {
        McpError::ExecutionFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Result type alias for MCP operations
pub type McpResult<T> = Result<T, McpError>;

//! # JDX Tech Hub
//!
//! A Model Context Protocol (MCP) server that tracks development progress
//! of projects against phase/task/checklist blueprints.
//!
//! ## Features
//!
//! - **Projects**: create, list, update and delete project records
//! - **Templates**: seed new blueprints from built-in development plans
//! - **Checklists**: toggle items; tasks complete when every item is checked
//! - **Statistics**: completion rate, time spent and per-phase progress
//! - **Next task**: blockers first, then work in progress, then priority order
//! - **Timers**: one running timer per blueprint, flushed into task time
//! - **Decisions and credentials**: a dated decision log and opaque key/values
//! - **Context export**: plain-text briefings for assistant chats
//! - **Autosave**: debounced persistence after each mutation
//!
//! ## Architecture
//!
//! ```text
//! MCP Client → MCP Server (stdio) → Workspace of open blueprints
//!                                         ↓
//!                                   SQLite (projects + blueprint JSON)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use jdx_tech_hub::{Config, AppState, McpServer};
//! use jdx_tech_hub::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let state = Arc::new(AppState::new(config, storage));
//!     let server = McpServer::new(state);
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Debounced saving of open blueprints.
pub mod autosave;
/// Blueprint document model.
pub mod blueprint;
/// Command-line flag overrides.
pub mod cli;
/// Configuration management for the MCP server.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// MCP server implementation and request handling.
pub mod server;
/// SQLite storage layer for persistence.
pub mod storage;
/// Built-in blueprint templates.
pub mod templates;
/// Progress tracking operations over a blueprint.
pub mod tracker;

pub use blueprint::Blueprint;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, McpServer, SharedState};
pub use tracker::ProgressTracker;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

/// Template used when a project has no stored blueprint yet.
pub const DEFAULT_TEMPLATE_KEY: &str = "jdx-tech-hub";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub blueprint: BlueprintConfig,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Blueprint tracking behaviour
#[derive(Debug, Clone)]
pub struct BlueprintConfig {
    /// Quiet period after the last mutation before an automatic save.
    pub autosave_delay_ms: u64,
    /// Number of sessions kept in the saved document.
    pub session_history_limit: usize,
    /// Template key used to seed new blueprints.
    pub default_template: String,
}

impl BlueprintConfig {
    /// Autosave delay as a `Duration`.
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for BlueprintConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 2000,
            session_history_limit: 10,
            default_template: DEFAULT_TEMPLATE_KEY.to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/jdx-hub.db"),
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            blueprint: BlueprintConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(db_defaults.path),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(db_defaults.max_connections),
        };

        if database.max_connections == 0 {
            return Err(AppError::Config {
                message: "DATABASE_MAX_CONNECTIONS must be at least 1".to_string(),
            });
        }

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let defaults = BlueprintConfig::default();
        let blueprint = BlueprintConfig {
            autosave_delay_ms: env::var("AUTOSAVE_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.autosave_delay_ms),
            session_history_limit: env::var("SESSION_HISTORY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.session_history_limit),
            default_template: env::var("DEFAULT_TEMPLATE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.default_template),
        };

        if blueprint.session_history_limit == 0 {
            return Err(AppError::Config {
                message: "SESSION_HISTORY_LIMIT must be at least 1".to_string(),
            });
        }

        Ok(Config {
            database,
            logging,
            blueprint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_config_defaults() {
        let config = BlueprintConfig::default();
        assert_eq!(config.autosave_delay_ms, 2000);
        assert_eq!(config.session_history_limit, 10);
        assert_eq!(config.default_template, "jdx-tech-hub");
        assert_eq!(config.autosave_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.database.path, PathBuf::from("./data/jdx-hub.db"));
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }
}

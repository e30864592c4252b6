//! Command-line flags for the server binary.
//!
//! Flags override the environment-derived [`Config`]; anything left unset
//! keeps its environment or default value.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, LogFormat};

/// JDX Tech Hub blueprint tracker, served over MCP stdio.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "jdx-tech-hub", version, about)]
pub struct Cli {
    /// SQLite database file
    #[arg(long)]
    pub database_path: Option<PathBuf>,

    /// Tracing filter directive, e.g. `debug` or `jdx_tech_hub=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// Template key used to seed new blueprints
    #[arg(long)]
    pub default_template: Option<String>,

    /// Quiet period in milliseconds before an automatic save
    #[arg(long)]
    pub autosave_delay_ms: Option<u64>,
}

/// Log format as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(path) = self.database_path {
            config.database.path = path;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format.into();
        }
        if let Some(template) = self.default_template.filter(|t| !t.trim().is_empty()) {
            config.blueprint.default_template = template;
        }
        if let Some(delay) = self.autosave_delay_ms {
            config.blueprint.autosave_delay_ms = delay;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::try_parse_from(["jdx-tech-hub"]).unwrap();
        let config = cli.apply(Config::default());

        assert_eq!(config.database.path, PathBuf::from("./data/jdx-hub.db"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.blueprint.default_template, "jdx-tech-hub");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "jdx-tech-hub",
            "--database-path",
            "/tmp/hub.db",
            "--log-format",
            "json",
            "--default-template",
            "saas",
            "--autosave-delay-ms",
            "250",
        ])
        .unwrap();
        let config = cli.apply(Config::default());

        assert_eq!(config.database.path, PathBuf::from("/tmp/hub.db"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.blueprint.default_template, "saas");
        assert_eq!(config.blueprint.autosave_delay_ms, 250);
    }

    #[test]
    fn test_blank_template_flag_ignored() {
        let cli = Cli::try_parse_from(["jdx-tech-hub", "--default-template", " "]).unwrap();
        let config = cli.apply(Config::default());
        assert_eq!(config.blueprint.default_template, "jdx-tech-hub");
    }

    #[test]
    fn test_subcommands_rejected() {
        assert!(Cli::try_parse_from(["jdx-tech-hub", "serve"]).is_err());
    }
}

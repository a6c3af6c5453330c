//! Configuration handling for Horizon
//!
//! Configuration is stored in `.horizon/config.toml` (project) and
//! `~/.config/horizon/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::project::ProjectError;
use crate::domain::TaskId;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Snapshot file, relative to the project root
    pub graph: String,

    /// Task to focus when a command is run without one
    pub focus: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            graph: ".horizon/tasks.jsonl".to_string(),
            focus: None,
        }
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Default log level when neither flags nor HORIZON_LOG set one
    pub log_level: Option<LogLevel>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads global configuration and, when inside a project, its configuration
    pub fn load() -> Result<Self> {
        let project_root = Self::find_project_root();
        let project = match &project_root {
            Some(root) => read_toml(&Self::project_config_path(root), "project")?,
            None => ProjectConfig::default(),
        };

        Ok(Self {
            project,
            global: Self::load_global()?,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        Ok(Self {
            project: read_toml(&Self::project_config_path(project_root), "project")?,
            global: Self::load_global()?,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Directory holding the global `config.toml`
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "horizon", "horizon").map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn load_global() -> Result<GlobalConfig> {
        match Self::global_config_dir() {
            Some(dir) => read_toml(&dir.join("config.toml"), "global"),
            None => Ok(GlobalConfig::default()),
        }
    }

    fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(".horizon").join("config.toml")
    }

    /// Finds the project root by looking for `.horizon/` from the current directory up
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Finds the project root by looking for `.horizon/` from `start` up
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(".horizon").is_dir())
            .map(Path::to_path_buf)
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path, ProjectError> {
        self.project_root
            .as_deref()
            .ok_or(ProjectError::NotInProject)
    }

    /// The configured default focus, validated
    pub fn focus(&self) -> Result<Option<TaskId>, ConfigError> {
        self.project
            .focus
            .as_deref()
            .map(|raw| {
                raw.parse()
                    .map_err(|e| ConfigError::Invalid(format!("focus: {}", e)))
            })
            .transpose()
    }

    /// Writes the project section back to `.horizon/config.toml`
    pub fn save_project(&self) -> Result<()> {
        let config_path = Self::project_config_path(self.require_project_root()?);
        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "saved project config");
        Ok(())
    }
}

/// Reads a TOML file, falling back to defaults when it does not exist
fn read_toml<T: DeserializeOwned + Default>(path: &Path, scope: &str) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} config: {}", scope, path.display()))?;

    toml::from_str(&content)
        .map_err(|e| ConfigError::Parse(e.to_string()))
        .with_context(|| format!("Failed to parse {} config: {}", scope, path.display()))
}

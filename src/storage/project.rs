//! Project management
//!
//! Handles project initialization and provides access to the snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::snapshot::load_snapshot;
use super::{Config, TaskStore};
use crate::domain::GraphSnapshot;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a horizon project. Run 'horizon init' first.")]
    NotInProject,
}

/// A Horizon project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let horizon_dir = root.join(".horizon");

        if !horizon_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Safe to run on an existing project: files already present are kept.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let horizon_dir = root.join(".horizon");
        fs::create_dir_all(&horizon_dir)
            .with_context(|| format!("Failed to create {}", horizon_dir.display()))?;

        let created_config = write_if_missing(&horizon_dir.join("config.toml"), DEFAULT_CONFIG)?;

        let store = TaskStore::for_project(&root);
        let created_store = !store.path().exists();
        if created_store {
            store.write_all(&[])?;
        }

        tracing::debug!(
            root = %root.display(),
            created_config,
            created_store,
            "initialized project"
        );
        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .horizon directory path
    pub fn horizon_dir(&self) -> PathBuf {
        self.root.join(".horizon")
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }

    /// Returns the configured snapshot path
    pub fn graph_path(&self) -> PathBuf {
        self.root.join(&self.config.project.graph)
    }

    /// Loads the configured snapshot
    pub fn load_snapshot(&self) -> Result<GraphSnapshot> {
        load_snapshot(&self.graph_path())
    }
}

const DEFAULT_CONFIG: &str = r#"# Horizon configuration

# Snapshot file with tasks and dependencies, relative to the project root.
# Supported: .jsonl (task per line), .json or .yaml ({nodes, edges}).
graph = ".horizon/tasks.jsonl"

# Task to analyse when a command is run without one
# focus = "launch"
"#;

/// Writes `content` unless the file exists; returns whether it wrote
fn write_if_missing(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

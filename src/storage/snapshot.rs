//! Snapshot files
//!
//! A graph snapshot can come from a project's JSONL task store or from a
//! standalone `{nodes, edges}` document exported by another tool, in JSON or
//! YAML. The format is picked from the file extension.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::jsonl::TaskStore;
use crate::domain::GraphSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unsupported snapshot format '{0}' (expected .json, .yaml, .yml or .jsonl)")]
    UnsupportedFormat(String),

    #[error("Snapshot file not found: {0}")]
    NotFound(PathBuf),
}

/// On-disk shape of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// `{nodes, edges}` as JSON
    Json,
    /// `{nodes, edges}` as YAML
    Yaml,
    /// One task record per line with inline `depends_on`
    Jsonl,
}

impl SnapshotFormat {
    /// Detects the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match ext.as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            "jsonl" => Ok(SnapshotFormat::Jsonl),
            _ => Err(SnapshotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads a snapshot from any supported file
pub fn load_snapshot(path: &Path) -> Result<GraphSnapshot> {
    let format = SnapshotFormat::from_path(path)?;
    if !path.is_file() {
        return Err(SnapshotError::NotFound(path.to_path_buf()).into());
    }

    let snapshot = match format {
        SnapshotFormat::Jsonl => TaskStore::new(path).read_snapshot()?,
        SnapshotFormat::Json => {
            let content = read(path)?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?
        }
        SnapshotFormat::Yaml => {
            let content = read(path)?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?
        }
    };

    tracing::debug!(
        path = %path.display(),
        ?format,
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))
}

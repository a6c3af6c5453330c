//! JSONL storage for tasks
//!
//! Tasks are stored in `.horizon/tasks.jsonl` with one JSON object per line.
//! Each record carries its prerequisites inline as `depends_on`, which is
//! expanded into dependency edges when a snapshot is built.
//! Uses file locking for concurrent access safety.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::domain::{DependencyEdge, GraphSnapshot, TaskId, TaskNode};

/// One line of the task store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(flatten)]
    pub node: TaskNode,

    /// Tasks that must resolve before this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<TaskId>,
}

impl TaskRecord {
    pub fn new(node: TaskNode) -> Self {
        Self {
            node,
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, prerequisite: TaskId) -> Self {
        if !self.depends_on.contains(&prerequisite) {
            self.depends_on.push(prerequisite);
        }
        self
    }
}

/// Expands records into a node/edge snapshot
pub fn records_to_snapshot(records: Vec<TaskRecord>) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::default();

    for record in records {
        for prerequisite in record.depends_on {
            snapshot
                .edges
                .push(DependencyEdge::new(prerequisite, record.node.id.clone()));
        }
        snapshot.nodes.push(record.node);
    }

    snapshot
}

/// Store for task data in JSONL format
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Creates a new task store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".horizon").join("tasks.jsonl"))
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all task records from the store
    ///
    /// If an ID appears on several lines the last line wins, keeping the
    /// position of the first one.
    pub fn read_all(&self) -> Result<Vec<TaskRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open task store: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on task store")?;

        let reader = BufReader::new(&file);
        let mut records: Vec<TaskRecord> = Vec::new();
        let mut positions: HashMap<TaskId, usize> = HashMap::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            let record: TaskRecord = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse task at line {}", line_num + 1))?;

            match positions.get(&record.node.id) {
                Some(&pos) => records[pos] = record,
                None => {
                    positions.insert(record.node.id.clone(), records.len());
                    records.push(record);
                }
            }
        }

        tracing::debug!(path = %self.path.display(), tasks = records.len(), "read task store");

        // Lock is released when file is dropped
        Ok(records)
    }

    /// Reads the store as a graph snapshot
    pub fn read_snapshot(&self) -> Result<GraphSnapshot> {
        Ok(records_to_snapshot(self.read_all()?))
    }

    /// Writes all records to the store (full rewrite)
    pub fn write_all(&self, records: &[TaskRecord]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        // Write to temp file first
        let temp_path = self.path.with_extension("jsonl.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            // Acquire exclusive lock
            file.lock_exclusive()
                .context("Failed to acquire write lock on task store")?;

            let mut writer = BufWriter::new(&file);

            // Sort by ID for consistent output
            let mut sorted: Vec<_> = records.iter().collect();
            sorted.sort_by(|a, b| a.node.id.cmp(&b.node.id));

            for record in sorted {
                let line = serde_json::to_string(record).context("Failed to serialize task")?;
                writeln!(writer, "{}", line).context("Failed to write task")?;
            }

            writer.flush().context("Failed to flush task store")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

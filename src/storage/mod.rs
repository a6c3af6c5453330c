//! # Storage Layer
//!
//! Reading graph snapshots and configuration from disk.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one task per line, inline `depends_on`) | `.horizon/tasks.jsonl` |
//! | Exported graphs | JSON or YAML `{nodes, edges}` | anywhere, via `graph` or `--graph` |
//! | Config | TOML | `.horizon/config.toml`, `~/.config/horizon/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`TaskStore`] takes a shared `fs2` lock while reading, an exclusive one while writing
//! - Writes are atomic (temp file + rename)
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a Horizon project
//! - [`TaskStore`] - Read/write task records as JSONL
//! - [`load_snapshot`] - Load any supported snapshot file
//! - [`Config`] - Project and global configuration

mod jsonl;
mod snapshot;
mod config;
mod project;

pub use jsonl::{records_to_snapshot, TaskRecord, TaskStore};
pub use snapshot::{load_snapshot, SnapshotError, SnapshotFormat};
pub use config::{Config, ConfigError, GlobalConfig, LogLevel, OutputFormat, ProjectConfig};
pub use project::{Project, ProjectError};

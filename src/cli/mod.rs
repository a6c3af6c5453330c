//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.horizon/` with a config and an empty task store |
//! | `frontier [task]` | Tasks that can be started now towards the focal task |
//! | `times [task]` | Serial and critical-path time remaining |
//! | `ancestors <task>` | Everything upstream of a task |
//! | `focus [task]` | Frontier and times together; `--pin` saves the focus |
//! | `check` | Cycles, dangling dependencies, missing estimates |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Snapshot Source
//!
//! By default the project's configured snapshot is read. `--graph <path>`
//! (or `HORIZON_GRAPH`) analyses any snapshot file, inside a project or not.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod check;

pub use app::{Cli, Commands, run};
pub use output::Output;
pub use check::GraphReport;

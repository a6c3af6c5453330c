//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::Output;
use super::query::{self, Workspace};
use super::check;
use crate::logging;
use crate::storage::{Config, LogLevel, OutputFormat, Project};

#[derive(Parser)]
#[command(name = "horizon")]
#[command(author, version, about = "What to work on next, and how long until a goal is reachable")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Log level
    #[arg(long, global = true, env = "HORIZON_LOG")]
    pub log_level: Option<LogLevel>,

    /// Snapshot file to analyse instead of the project's (.json, .yaml or .jsonl)
    #[arg(long, short = 'g', global = true, env = "HORIZON_GRAPH")]
    pub graph: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new horizon project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Show tasks that can be started now towards a goal
    Frontier {
        /// Focal task (defaults to the configured focus)
        task: Option<String>,
    },

    /// Show remaining time for a goal and its open prerequisites
    Times {
        /// Focal task (defaults to the configured focus)
        task: Option<String>,
    },

    /// List everything upstream of a task
    Ancestors {
        /// Task to start from
        task: String,

        /// Do not look past Done or Deferred tasks
        #[arg(long)]
        stop_at_resolved: bool,
    },

    /// Show frontier and remaining time together
    Focus {
        /// Focal task (defaults to the configured focus)
        task: Option<String>,

        /// Save the task as the project's default focus
        #[arg(long)]
        pin: bool,
    },

    /// Report cycles, dangling dependencies and missing estimates
    Check,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    logging::init_logging(logging::resolve_level(
        cli.log_level,
        cli.verbose,
        config.global.log_level,
    ));
    let output = Output::new(cli.format.unwrap_or(config.global.default_format));

    tracing::debug!(project = ?config.project_root, "horizon starting");

    match cli.command {
        Commands::Init { path } => {
            tracing::debug!(path = %path, "initializing project");
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized horizon project at {}",
                project.root().display()
            ));
        }

        Commands::Frontier { task } => {
            let workspace = Workspace::load(config, cli.graph.as_deref())?;
            query::frontier(&output, &workspace, task.as_deref())?
        }
        Commands::Times { task } => {
            let workspace = Workspace::load(config, cli.graph.as_deref())?;
            query::times(&output, &workspace, task.as_deref())?
        }
        Commands::Ancestors {
            task,
            stop_at_resolved,
        } => {
            let workspace = Workspace::load(config, cli.graph.as_deref())?;
            query::ancestors(&output, &workspace, &task, stop_at_resolved)?
        }
        Commands::Focus { task, pin } => {
            let workspace = Workspace::load(config, cli.graph.as_deref())?;
            query::focus(&output, &workspace, task.as_deref(), pin)?
        }
        Commands::Check => {
            let workspace = Workspace::load(config, cli.graph.as_deref())?;
            check::run(&output, &workspace)?
        }
    }

    Ok(())
}

//! Horizon - dependency frontier and remaining-time analysis for task graphs
//!
//! Given a snapshot of tasks and dependency edges and a focal task, Horizon
//! answers two questions: what can be started right now in service of the
//! goal, and how long until the goal is reachable, serially and with
//! unlimited parallelism. See [`engine`] for the computations.

pub mod domain;
pub mod engine;
pub mod storage;
pub mod cli;
pub mod logging;

pub use domain::{DependencyEdge, DependencyGraph, GraphSnapshot, TaskId, TaskNode, TaskStatus};
pub use engine::{ancestors_of, cumulative_times, evaluate, frontier_of, Evaluation, TimeMetric};

//! Domain models for Horizon
//!
//! Task nodes, dependency edges and the graph index. No I/O here.

mod id;
mod task;
mod graph;

pub use id::{IdError, TaskId};
pub use task::{DurationUnit, Estimate, EstimateError, TaskNode, TaskStatus};
pub use graph::{DependencyEdge, DependencyGraph, GraphSnapshot};

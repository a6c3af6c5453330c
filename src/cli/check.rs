//! Graph diagnostics
//!
//! The engine tolerates cycles, dangling edges and missing estimates. This
//! command surfaces them so they can be fixed in whatever tool owns the
//! graph. It reports; it never fails on them.

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use super::query::Workspace;
use crate::domain::{DependencyEdge, DependencyGraph, TaskId};

/// Findings for one snapshot
#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub tasks: usize,
    pub dependencies: usize,
    pub dangling: Vec<DependencyEdge>,
    pub cycles: Vec<Vec<TaskId>>,
    pub needs_estimate: Vec<TaskId>,
}

impl GraphReport {
    pub fn from_graph(graph: &DependencyGraph<'_>) -> Self {
        let mut needs_estimate: Vec<TaskId> = graph
            .tasks()
            .filter(|task| task.needs_estimate())
            .map(|task| task.id.clone())
            .collect();
        needs_estimate.sort();

        Self {
            tasks: graph.len(),
            dependencies: graph.edge_count(),
            dangling: graph.dangling_edges().iter().map(|&e| e.clone()).collect(),
            cycles: graph.cycles(),
            needs_estimate,
        }
    }

    /// True when nothing needs attention
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty() && self.cycles.is_empty() && self.needs_estimate.is_empty()
    }
}

fn join(ids: &[TaskId]) -> String {
    ids.iter().map(TaskId::as_str).collect::<Vec<_>>().join(", ")
}

/// Report cycles, dangling edges and missing estimates
pub fn run(output: &Output, workspace: &Workspace) -> Result<()> {
    let graph = workspace.snapshot.index();
    let report = GraphReport::from_graph(&graph);

    tracing::debug!(
        tasks = report.tasks,
        cycles = report.cycles.len(),
        dangling = report.dangling.len(),
        "graph checked"
    );

    if output.is_json() {
        return output.data(&report);
    }

    output.heading("Graph Check");
    println!();
    println!("Tasks: {}  Dependencies: {}", report.tasks, report.dependencies);

    if report.is_clean() {
        println!();
        println!("No problems found.");
        return Ok(());
    }

    if !report.dangling.is_empty() {
        println!();
        println!("Dangling dependencies ({}):", report.dangling.len());
        for edge in &report.dangling {
            println!("  {} -> {}", edge.prerequisite, edge.dependent);
        }
    }

    if !report.cycles.is_empty() {
        println!();
        println!("Cycles ({}):", report.cycles.len());
        for cycle in &report.cycles {
            println!("  {}", join(cycle));
        }
    }

    if !report.needs_estimate.is_empty() {
        println!();
        println!("Needs estimate ({}):", report.needs_estimate.len());
        println!("  {}", join(&report.needs_estimate));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Estimate, TaskNode, TaskStatus};

    fn id(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    #[test]
    fn clean_graph() {
        let nodes = vec![
            TaskNode::new(id("a")).with_estimate(Estimate::days(1.0).unwrap()),
            TaskNode::new(id("b")).with_status(TaskStatus::Done),
        ];
        let edges = vec![DependencyEdge::new(id("b"), id("a"))];
        let graph = DependencyGraph::build(&nodes, &edges);
        let report = GraphReport::from_graph(&graph);

        assert!(report.is_clean());
        assert_eq!(report.tasks, 2);
        assert_eq!(report.dependencies, 1);
    }

    #[test]
    fn reports_every_problem() {
        let nodes = vec![TaskNode::new(id("a")), TaskNode::new(id("b"))];
        let edges = vec![
            DependencyEdge::new(id("a"), id("b")),
            DependencyEdge::new(id("b"), id("a")),
            DependencyEdge::new(id("ghost"), id("a")),
        ];
        let graph = DependencyGraph::build(&nodes, &edges);
        let report = GraphReport::from_graph(&graph);

        assert!(!report.is_clean());
        assert_eq!(report.dangling, vec![DependencyEdge::new(id("ghost"), id("a"))]);
        assert_eq!(report.cycles, vec![vec![id("a"), id("b")]]);
        assert_eq!(report.needs_estimate, vec![id("a"), id("b")]);
    }
}

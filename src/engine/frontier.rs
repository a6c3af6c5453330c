//! Frontier detection: what can be started now in service of a goal

use std::collections::HashSet;

use super::walk::ancestor_indices;
use crate::domain::{DependencyEdge, DependencyGraph, TaskId, TaskNode};

/// Returns the actionable ancestors of `focal`.
///
/// A frontier task is an unresolved ancestor whose direct prerequisites are
/// all resolved. The walk looks through resolved tasks so that work sitting
/// behind a Done task is still found. No focal task means an empty set.
pub fn frontier_of(
    focal: Option<&TaskId>,
    edges: &[DependencyEdge],
    nodes: &[TaskNode],
) -> HashSet<TaskId> {
    let Some(focal) = focal else {
        return HashSet::new();
    };

    let graph = DependencyGraph::build(nodes, edges);
    frontier_in(&graph, focal)
}

/// Same as [`frontier_of`], over an already built index
pub fn frontier_in(graph: &DependencyGraph<'_>, focal: &TaskId) -> HashSet<TaskId> {
    let Some(root) = graph.index_of(focal) else {
        tracing::debug!(focal = %focal, "focal task not in graph");
        return HashSet::new();
    };

    let frontier: HashSet<TaskId> = ancestor_indices(graph, root, false)
        .into_iter()
        .filter(|&idx| {
            graph.task(idx).status.is_active()
                && graph
                    .prerequisite_indices(idx)
                    .all(|p| graph.task(p).is_resolved())
        })
        .map(|idx| graph.task(idx).id.clone())
        .collect();

    tracing::debug!(focal = %focal, size = frontier.len(), "frontier computed");
    frontier
}

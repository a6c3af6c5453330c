//! Ancestor closure of a focal task

use std::collections::HashSet;

use super::walk::ancestor_indices;
use crate::domain::{DependencyEdge, DependencyGraph, TaskId, TaskNode};

/// Returns every task that transitively precedes `focal`, excluding `focal`.
///
/// With `stop_at_resolved` the walk still reports Done and Deferred tasks but
/// does not look past them. Unknown focal IDs and isolated tasks yield an
/// empty set.
pub fn ancestors_of(
    focal: &TaskId,
    edges: &[DependencyEdge],
    nodes: &[TaskNode],
    stop_at_resolved: bool,
) -> HashSet<TaskId> {
    let graph = DependencyGraph::build(nodes, edges);
    ancestors_in(&graph, focal, stop_at_resolved)
}

/// Same as [`ancestors_of`], over an already built index
pub fn ancestors_in(
    graph: &DependencyGraph<'_>,
    focal: &TaskId,
    stop_at_resolved: bool,
) -> HashSet<TaskId> {
    let Some(root) = graph.index_of(focal) else {
        return HashSet::new();
    };

    let cone = ancestor_indices(graph, root, stop_at_resolved);
    tracing::trace!(focal = %focal, stop_at_resolved, size = cone.len(), "ancestor cone");

    cone.into_iter()
        .map(|idx| graph.task(idx).id.clone())
        .collect()
}

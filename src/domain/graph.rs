//! Dependency graph for tasks
//!
//! A [`GraphSnapshot`] is the immutable input handed over by whatever store
//! owns the tasks. [`DependencyGraph`] indexes a snapshot with petgraph so
//! the engine can walk prerequisites without rescanning the edge list.
//!
//! Unlike an editing store, the index never rejects input: the graph may
//! contain cycles and edges that point at missing tasks. Dangling edges are
//! dropped (as if the missing task did not exist), cycles are kept as-is.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::id::TaskId;
use super::task::TaskNode;

/// Directed arc: `dependent` is blocked until `prerequisite` resolves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    #[serde(rename = "prerequisite_id", alias = "from")]
    pub prerequisite: TaskId,

    #[serde(rename = "dependent_id", alias = "to")]
    pub dependent: TaskId,
}

impl DependencyEdge {
    pub fn new(prerequisite: TaskId, dependent: TaskId) -> Self {
        Self {
            prerequisite,
            dependent,
        }
    }
}

/// Nodes and edges as read from a store, one per evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<TaskNode>,

    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<TaskNode>, edges: Vec<DependencyEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Finds a node by ID (linear scan; build a [`DependencyGraph`] for repeated lookups)
    pub fn node(&self, id: &TaskId) -> Option<&TaskNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Builds the petgraph index over this snapshot
    pub fn index(&self) -> DependencyGraph<'_> {
        DependencyGraph::build(&self.nodes, &self.edges)
    }
}

/// Read-only dependency index borrowed from a snapshot
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    /// Edge direction is prerequisite -> dependent
    graph: DiGraph<&'a TaskNode, ()>,

    /// Map from TaskId to node index
    node_map: HashMap<&'a TaskId, NodeIndex>,

    /// Edges skipped because an endpoint is missing
    dangling: Vec<&'a DependencyEdge>,
}

impl<'a> DependencyGraph<'a> {
    /// Indexes the given nodes and edges
    ///
    /// Duplicate node IDs keep their first occurrence. Repeated edges
    /// collapse into one so fan-in is never double counted.
    pub fn build(nodes: &'a [TaskNode], edges: &'a [DependencyEdge]) -> Self {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut node_map = HashMap::with_capacity(nodes.len());

        // First pass: add all nodes
        for node in nodes {
            if node_map.contains_key(&node.id) {
                tracing::debug!(task = %node.id, "duplicate task id in snapshot, keeping first");
                continue;
            }
            let idx = graph.add_node(node);
            node_map.insert(&node.id, idx);
        }

        // Second pass: add all edges
        let mut dangling = Vec::new();
        for edge in edges {
            let endpoints = (
                node_map.get(&edge.prerequisite),
                node_map.get(&edge.dependent),
            );
            match endpoints {
                (Some(&from), Some(&to)) => {
                    graph.update_edge(from, to, ());
                }
                _ => {
                    tracing::debug!(
                        prerequisite = %edge.prerequisite,
                        dependent = %edge.dependent,
                        "skipping edge with missing endpoint"
                    );
                    dangling.push(edge);
                }
            }
        }

        Self {
            graph,
            node_map,
            dangling,
        }
    }

    /// Returns the node index for a task ID
    pub fn index_of(&self, id: &TaskId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Returns the task stored at an index
    pub fn task(&self, idx: NodeIndex) -> &'a TaskNode {
        self.graph[idx]
    }

    /// Looks up a task by ID
    pub fn node(&self, id: &TaskId) -> Option<&'a TaskNode> {
        self.index_of(id).map(|idx| self.task(idx))
    }

    /// Indices of the direct prerequisites of a node
    pub fn prerequisite_indices(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Returns the direct prerequisites of a task
    pub fn prerequisites(&self, id: &TaskId) -> Vec<&'a TaskNode> {
        match self.index_of(id) {
            Some(idx) => self.prerequisite_indices(idx).map(|p| self.task(p)).collect(),
            None => vec![],
        }
    }

    /// Returns the direct dependents of a task (tasks it blocks)
    pub fn dependents(&self, id: &TaskId) -> Vec<&'a TaskNode> {
        match self.index_of(id) {
            Some(idx) => self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .map(|d| self.task(d))
                .collect(),
            None => vec![],
        }
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, id: &TaskId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of edges kept after dropping dangling and repeated ones
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all tasks in insertion order
    pub fn tasks(&self) -> impl Iterator<Item = &'a TaskNode> + '_ {
        self.graph.node_indices().map(|idx| self.task(idx))
    }

    /// Edges that reference a task not present in the snapshot
    pub fn dangling_edges(&self) -> &[&'a DependencyEdge] {
        &self.dangling
    }

    /// Returns true if any dependency cycle exists (self-loops included)
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Groups of tasks that depend on each other circularly
    ///
    /// Each group is a strongly connected component with more than one task,
    /// or a single task that depends on itself. IDs inside a group are sorted.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .map(|scc| {
                let mut ids: Vec<TaskId> = scc.iter().map(|&idx| self.task(idx).id.clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }
}

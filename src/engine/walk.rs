//! Backward traversals over the dependency index
//!
//! Both traversals use an explicit stack instead of recursion, so the depth
//! of a dependency chain never turns into call-stack depth.

use petgraph::graph::NodeIndex;
use std::collections::{HashMap, HashSet};

use crate::domain::DependencyGraph;

/// Collects every node reachable backward from `root`, excluding `root`.
///
/// Each node is expanded at most once. With `stop_at_resolved` a Done or
/// Deferred node is included but its own prerequisites are not explored.
pub(crate) fn ancestor_indices(
    graph: &DependencyGraph<'_>,
    root: NodeIndex,
    stop_at_resolved: bool,
) -> HashSet<NodeIndex> {
    let mut visited = HashSet::from([root]);
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        for prerequisite in graph.prerequisite_indices(current) {
            if !visited.insert(prerequisite) {
                continue;
            }
            if stop_at_resolved && graph.task(prerequisite).is_resolved() {
                continue;
            }
            stack.push(prerequisite);
        }
    }

    visited.remove(&root);
    visited
}

struct Frame {
    node: NodeIndex,
    prerequisites: Vec<NodeIndex>,
    next: usize,
}

impl Frame {
    fn new(graph: &DependencyGraph<'_>, node: NodeIndex) -> Self {
        Self {
            node,
            prerequisites: graph.prerequisite_indices(node).collect(),
            next: 0,
        }
    }
}

/// Evaluates a value per node in post-order (prerequisites first), memoized.
///
/// `leaf` may settle a node without looking at its prerequisites. Otherwise
/// `fold` receives the node and one entry per direct prerequisite: `Some`
/// with the memoized value, or `None` when that prerequisite is still being
/// evaluated further down the stack, i.e. it closes a cycle. Every node is
/// folded at most once per memo table, so the walk always terminates.
pub(crate) fn post_order<T, L, F>(
    graph: &DependencyGraph<'_>,
    root: NodeIndex,
    memo: &mut HashMap<NodeIndex, T>,
    mut leaf: L,
    mut fold: F,
) -> T
where
    T: Copy,
    L: FnMut(NodeIndex) -> Option<T>,
    F: FnMut(NodeIndex, &[Option<T>]) -> T,
{
    if let Some(&value) = memo.get(&root) {
        return value;
    }
    if let Some(value) = leaf(root) {
        memo.insert(root, value);
        return value;
    }

    let mut on_stack = HashSet::from([root]);
    let mut stack = vec![Frame::new(graph, root)];

    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.prerequisites.get(frame.next) {
            frame.next += 1;
            if memo.contains_key(&child) || on_stack.contains(&child) {
                continue;
            }
            if let Some(value) = leaf(child) {
                memo.insert(child, value);
                continue;
            }
            on_stack.insert(child);
            stack.push(Frame::new(graph, child));
            continue;
        }

        let node = frame.node;
        let inputs: Vec<Option<T>> = frame
            .prerequisites
            .iter()
            .map(|p| memo.get(p).copied())
            .collect();
        stack.pop();
        on_stack.remove(&node);

        let value = fold(node, &inputs);
        memo.insert(node, value);
    }

    // root is the first frame pushed and therefore the last one folded
    memo[&root]
}

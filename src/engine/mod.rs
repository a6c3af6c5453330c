//! # Frontier & Time Engine
//!
//! Pure functions that derive two views from a task graph snapshot and a
//! focal task:
//!
//! | Operation | Question answered |
//! |-----------|-------------------|
//! | [`ancestors_of`] | What transitively precedes the focal task? |
//! | [`frontier_of`] | What can be started right now towards it? |
//! | [`cumulative_times`] | How long until it is reachable, serially and at best? |
//!
//! Nothing is cached between calls. Each call builds its own index and memo
//! tables, so results are always consistent with the snapshot passed in and
//! concurrent callers share no state. Cycles, dangling edges and missing
//! estimates are data conditions, never errors.
//!
//! [`evaluate`] runs the full pipeline for one focal selection:
//!
//! ```text
//! focal ─▶ ancestors (unbounded) ─▶ frontier
//!       └▶ ancestors (stop at resolved) ─▶ times
//! ```

mod walk;
mod reachability;
mod frontier;
mod timing;
mod format;

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::{DependencyGraph, GraphSnapshot, TaskId};

pub use reachability::{ancestors_in, ancestors_of};
pub use frontier::{frontier_in, frontier_of};
pub use timing::{cumulative_times, cumulative_times_in, TimeMetric};
pub use format::format_days;

/// Both derived views for one focal task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub focal: Option<TaskId>,
    pub frontier: HashSet<TaskId>,
    pub times: HashMap<TaskId, TimeMetric>,
}

impl Evaluation {
    /// Frontier IDs in sorted order
    pub fn sorted_frontier(&self) -> Vec<&TaskId> {
        let mut ids: Vec<_> = self.frontier.iter().collect();
        ids.sort();
        ids
    }

    /// Time entries sorted by task ID
    pub fn sorted_times(&self) -> Vec<(&TaskId, &TimeMetric)> {
        let mut entries: Vec<_> = self.times.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Metric of the focal task itself, if any
    pub fn focal_time(&self) -> Option<&TimeMetric> {
        self.focal.as_ref().and_then(|id| self.times.get(id))
    }
}

/// Evaluates frontier and times for a focal selection
pub fn evaluate(focal: Option<&TaskId>, snapshot: &GraphSnapshot) -> Evaluation {
    let graph = snapshot.index();
    evaluate_in(&graph, focal)
}

/// Same as [`evaluate`], over an already built index
pub fn evaluate_in(graph: &DependencyGraph<'_>, focal: Option<&TaskId>) -> Evaluation {
    let Some(focal) = focal else {
        return Evaluation::default();
    };

    Evaluation {
        focal: Some(focal.clone()),
        frontier: frontier_in(graph, focal),
        times: cumulative_times_in(graph, focal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyEdge, Estimate, TaskNode, TaskStatus};

    fn id(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    fn scenario() -> GraphSnapshot {
        GraphSnapshot::new(
            vec![
                TaskNode::new(id("A")).with_status(TaskStatus::Done),
                TaskNode::new(id("B")).with_estimate(Estimate::days(2.0).unwrap()),
                TaskNode::new(id("C")).with_estimate(Estimate::days(3.0).unwrap()),
            ],
            vec![
                DependencyEdge::new(id("B"), id("C")),
                DependencyEdge::new(id("A"), id("C")),
            ],
        )
    }

    #[test]
    fn evaluate_without_focal_is_empty() {
        let evaluation = evaluate(None, &scenario());
        assert_eq!(evaluation, Evaluation::default());
        assert!(evaluation.focal_time().is_none());
    }

    #[test]
    fn evaluate_combines_both_views() {
        let evaluation = evaluate(Some(&id("C")), &scenario());

        assert_eq!(evaluation.sorted_frontier(), vec![&id("B")]);
        assert_eq!(
            evaluation.focal_time(),
            Some(&TimeMetric::Known {
                serial_sum: 5.0,
                critical_min: 5.0
            })
        );
        let ids: Vec<_> = evaluation.sorted_times().into_iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
    }

    #[test]
    fn evaluate_matches_standalone_operations() {
        let snapshot = scenario();
        let focal = id("C");
        let evaluation = evaluate(Some(&focal), &snapshot);

        assert_eq!(
            evaluation.frontier,
            frontier_of(Some(&focal), &snapshot.edges, &snapshot.nodes)
        );
        assert_eq!(
            evaluation.times,
            cumulative_times(Some(&focal), &snapshot.nodes, &snapshot.edges)
        );
    }
}

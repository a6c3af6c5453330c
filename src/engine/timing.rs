//! Cumulative time propagation
//!
//! For the focal task and every task in its terminating ancestor cone this
//! computes two durations, in days:
//!
//! - **serial sum**: own estimate plus the estimate of every distinct active
//!   ancestor, as if all of it were done one after another
//! - **critical minimum**: own estimate plus the longest prerequisite chain,
//!   as if independent branches ran in parallel
//!
//! An active task without an estimate poisons itself and everything
//! downstream of it: their metric is [`TimeMetric::Unknown`] even when
//! another, fully estimated path exists. Done and Deferred tasks count as
//! zero and hide whatever sits behind them.

use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::format::format_days;
use super::walk::{ancestor_indices, post_order};
use crate::domain::{DependencyEdge, DependencyGraph, TaskId, TaskNode};

/// Remaining-time metric of one task
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeMetric {
    Known { serial_sum: f64, critical_min: f64 },
    /// An upstream (or own) estimate is missing
    Unknown,
}

impl TimeMetric {
    pub fn is_known(&self) -> bool {
        matches!(self, TimeMetric::Known { .. })
    }

    pub fn serial_sum(&self) -> Option<f64> {
        match self {
            TimeMetric::Known { serial_sum, .. } => Some(*serial_sum),
            TimeMetric::Unknown => None,
        }
    }

    pub fn critical_min(&self) -> Option<f64> {
        match self {
            TimeMetric::Known { critical_min, .. } => Some(*critical_min),
            TimeMetric::Unknown => None,
        }
    }
}

impl fmt::Display for TimeMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeMetric::Known {
                serial_sum,
                critical_min,
            } => write!(
                f,
                "{} serial, {} critical path",
                format_days(*serial_sum),
                format_days(*critical_min)
            ),
            TimeMetric::Unknown => f.write_str("needs estimate"),
        }
    }
}

/// Computes remaining-time metrics for `focal` and its open ancestors.
///
/// Returns an empty map when there is no focal task, when it is not in the
/// graph, or when it is already Done or Deferred.
pub fn cumulative_times(
    focal: Option<&TaskId>,
    nodes: &[TaskNode],
    edges: &[DependencyEdge],
) -> HashMap<TaskId, TimeMetric> {
    let Some(focal) = focal else {
        return HashMap::new();
    };

    let graph = DependencyGraph::build(nodes, edges);
    cumulative_times_in(&graph, focal)
}

/// Same as [`cumulative_times`], over an already built index
pub fn cumulative_times_in(
    graph: &DependencyGraph<'_>,
    focal: &TaskId,
) -> HashMap<TaskId, TimeMetric> {
    let Some(root) = graph.index_of(focal) else {
        tracing::debug!(focal = %focal, "focal task not in graph");
        return HashMap::new();
    };
    if graph.task(root).is_resolved() {
        tracing::debug!(focal = %focal, "focal task resolved, no remaining time");
        return HashMap::new();
    }

    let cone = ancestor_indices(graph, root, true);
    let mut evaluator = TimeEvaluator::new(graph);
    let mut times = HashMap::new();

    for idx in std::iter::once(root).chain(cone) {
        if let Some(metric) = evaluator.metric(idx) {
            times.insert(graph.task(idx).id.clone(), metric);
        }
    }

    tracing::debug!(
        focal = %focal,
        entries = times.len(),
        memoized = evaluator.critical.len(),
        "cumulative times computed"
    );
    times
}

/// Memo tables for one evaluation; dropped when the evaluation ends
struct TimeEvaluator<'g, 'a> {
    graph: &'g DependencyGraph<'a>,
    blocked: HashMap<NodeIndex, bool>,
    critical: HashMap<NodeIndex, Option<f64>>,
}

impl<'g, 'a> TimeEvaluator<'g, 'a> {
    fn new(graph: &'g DependencyGraph<'a>) -> Self {
        Self {
            graph,
            blocked: HashMap::new(),
            critical: HashMap::new(),
        }
    }

    /// None for resolved tasks and for tasks with nothing to show
    fn metric(&mut self, idx: NodeIndex) -> Option<TimeMetric> {
        if self.graph.task(idx).is_resolved() {
            return None;
        }

        let critical = critical_min(self.graph, &mut self.blocked, &mut self.critical, idx);
        let serial = self.serial_sum(idx);

        match (serial, critical) {
            (Some(serial_sum), Some(critical_min)) if serial_sum > 0.0 || critical_min > 0.0 => {
                Some(TimeMetric::Known {
                    serial_sum,
                    critical_min,
                })
            }
            (Some(_), Some(_)) => None,
            _ => Some(TimeMetric::Unknown),
        }
    }

    fn serial_sum(&mut self, idx: NodeIndex) -> Option<f64> {
        if is_blocked(self.graph, &mut self.blocked, idx) {
            return None;
        }

        let graph = self.graph;
        let own = graph.task(idx).duration_days()?;
        let upstream: f64 = ancestor_indices(graph, idx, true)
            .into_iter()
            .map(|a| graph.task(a))
            .filter(|task| task.status.is_active())
            .filter_map(TaskNode::duration_days)
            .sum();

        Some(own + upstream)
    }
}

/// True if the task, or anything it transitively waits on, needs an estimate.
///
/// Resolved tasks are never blocked and hide their prerequisites. A
/// prerequisite met again while its own evaluation is still open counts as
/// not blocking.
fn is_blocked(
    graph: &DependencyGraph<'_>,
    memo: &mut HashMap<NodeIndex, bool>,
    idx: NodeIndex,
) -> bool {
    post_order(
        graph,
        idx,
        memo,
        |n| {
            let task = graph.task(n);
            if task.is_resolved() {
                Some(false)
            } else if task.duration_days().is_none() {
                Some(true)
            } else {
                None
            }
        },
        |_, prerequisites| prerequisites.iter().any(|p| *p == Some(true)),
    )
}

/// Longest remaining chain ending at the task, None when blocked
fn critical_min(
    graph: &DependencyGraph<'_>,
    blocked: &mut HashMap<NodeIndex, bool>,
    memo: &mut HashMap<NodeIndex, Option<f64>>,
    idx: NodeIndex,
) -> Option<f64> {
    post_order(
        graph,
        idx,
        memo,
        |n| {
            if graph.task(n).is_resolved() {
                Some(Some(0.0))
            } else if is_blocked(graph, blocked, n) {
                Some(None)
            } else {
                None
            }
        },
        |n, prerequisites| {
            let own = graph.task(n).duration_days()?;
            let mut longest = 0.0_f64;
            for prerequisite in prerequisites {
                match prerequisite {
                    Some(Some(days)) => longest = longest.max(*days),
                    Some(None) => return None,
                    // still open further down the stack: a cycle, contributes nothing
                    None => {}
                }
            }
            Some(own + longest)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Estimate, TaskStatus};

    fn id(s: &str) -> TaskId {
        s.parse().unwrap()
    }

    fn edge(from: &str, to: &str) -> DependencyEdge {
        DependencyEdge::new(id(from), id(to))
    }

    fn todo(s: &str, days: f64) -> TaskNode {
        TaskNode::new(id(s)).with_estimate(Estimate::days(days).unwrap())
    }

    fn known(serial_sum: f64, critical_min: f64) -> TimeMetric {
        TimeMetric::Known {
            serial_sum,
            critical_min,
        }
    }

    fn times_for(focal: &str, nodes: &[TaskNode], edges: &[DependencyEdge]) -> HashMap<TaskId, TimeMetric> {
        cumulative_times(Some(&id(focal)), nodes, edges)
    }

    #[test]
    fn no_focal_no_times() {
        let nodes = vec![todo("a", 1.0)];
        assert!(cumulative_times(None, &nodes, &[]).is_empty());
    }

    #[test]
    fn resolved_focal_has_no_times() {
        let nodes = vec![
            todo("a", 1.0),
            todo("b", 2.0).with_status(TaskStatus::Done),
            todo("c", 2.0).with_status(TaskStatus::Deferred),
        ];
        let edges = vec![edge("a", "b"), edge("a", "c")];

        assert!(times_for("b", &nodes, &edges).is_empty());
        assert!(times_for("c", &nodes, &edges).is_empty());
    }

    #[test]
    fn single_task() {
        let nodes = vec![todo("a", 3.0)];
        let times = times_for("a", &nodes, &[]);

        assert_eq!(times.len(), 1);
        assert_eq!(times[&id("a")], known(3.0, 3.0));
    }

    #[test]
    fn documented_scenario() {
        let nodes = vec![
            TaskNode::new(id("A")).with_status(TaskStatus::Done),
            todo("B", 2.0),
            todo("C", 3.0),
        ];
        let edges = vec![edge("B", "C"), edge("A", "C")];
        let times = times_for("C", &nodes, &edges);

        assert_eq!(times[&id("C")], known(5.0, 5.0));
        assert_eq!(times[&id("B")], known(2.0, 2.0));
        assert!(!times.contains_key(&id("A")));
    }

    #[test]
    fn parallel_chains_critical_path() {
        // x1(1) -> x2(2) and y1(3) -> y2(4) both feed z(2)
        let nodes = vec![
            todo("x1", 1.0),
            todo("x2", 2.0),
            todo("y1", 3.0),
            todo("y2", 4.0),
            todo("z", 2.0),
        ];
        let edges = vec![
            edge("x1", "x2"),
            edge("y1", "y2"),
            edge("x2", "z"),
            edge("y2", "z"),
        ];
        let times = times_for("z", &nodes, &edges);

        assert_eq!(times[&id("z")], known(12.0, 9.0));
        assert_eq!(times[&id("x2")], known(3.0, 3.0));
        assert_eq!(times[&id("y2")], known(7.0, 7.0));
        assert_eq!(times.len(), 5);
    }

    #[test]
    fn diamond_counts_shared_ancestor_once() {
        // a and b feed c, c feeds d, d feeds focal; plus a second path a -> d
        let nodes = vec![
            todo("a", 1.0),
            todo("b", 2.0),
            todo("c", 4.0),
            todo("d", 8.0),
            todo("focal", 16.0),
        ];
        let edges = vec![
            edge("a", "c"),
            edge("b", "c"),
            edge("c", "d"),
            edge("a", "d"),
            edge("d", "focal"),
        ];
        let times = times_for("focal", &nodes, &edges);

        assert_eq!(times[&id("focal")], known(31.0, 30.0));
        assert_eq!(times[&id("d")], known(15.0, 14.0));
    }

    #[test]
    fn missing_estimate_poisons_downstream() {
        let nodes = vec![
            TaskNode::new(id("unknown")),
            todo("estimated", 5.0),
            todo("goal", 1.0),
        ];
        let edges = vec![edge("unknown", "goal"), edge("estimated", "goal")];
        let times = times_for("goal", &nodes, &edges);

        assert_eq!(times[&id("goal")], TimeMetric::Unknown);
        assert_eq!(times[&id("unknown")], TimeMetric::Unknown);
        assert_eq!(times[&id("estimated")], known(5.0, 5.0));
    }

    #[test]
    fn focal_without_estimate_is_unknown() {
        let nodes = vec![todo("a", 2.0), TaskNode::new(id("goal"))];
        let edges = vec![edge("a", "goal")];
        let times = times_for("goal", &nodes, &edges);

        assert_eq!(times[&id("goal")], TimeMetric::Unknown);
        assert_eq!(times[&id("a")], known(2.0, 2.0));
    }

    #[test]
    fn resolved_barrier_hides_upstream() {
        // an unestimated task behind a Done one must not matter
        let nodes = vec![
            TaskNode::new(id("hidden")),
            todo("done", 9.0).with_status(TaskStatus::Done),
            todo("goal", 2.0),
        ];
        let edges = vec![edge("hidden", "done"), edge("done", "goal")];
        let times = times_for("goal", &nodes, &edges);

        assert_eq!(times.len(), 1);
        assert_eq!(times[&id("goal")], known(2.0, 2.0));
    }

    #[test]
    fn deferred_barrier_contributes_zero() {
        let nodes = vec![
            todo("skipped", 10.0).with_status(TaskStatus::Deferred),
            todo("goal", 1.0),
        ];
        let edges = vec![edge("skipped", "goal")];

        assert_eq!(times_for("goal", &nodes, &edges)[&id("goal")], known(1.0, 1.0));
    }

    #[test]
    fn mixed_units_normalise_to_days() {
        let nodes = vec![
            TaskNode::new(id("a")).with_estimate(Estimate::weeks(1.0).unwrap()),
            TaskNode::new(id("b")).with_estimate(Estimate::months(1.0).unwrap()),
        ];
        let edges = vec![edge("a", "b")];

        assert_eq!(times_for("b", &nodes, &edges)[&id("b")], known(25.0, 25.0));
    }

    #[test]
    fn self_loop_terminates() {
        let nodes = vec![todo("a", 1.0)];
        let edges = vec![edge("a", "a")];
        let times = times_for("a", &nodes, &edges);

        assert!(times.contains_key(&id("a")));
    }

    #[test]
    fn mutual_cycle_terminates() {
        let nodes = vec![todo("a", 1.0), todo("b", 2.0), todo("goal", 3.0)];
        let edges = vec![edge("a", "b"), edge("b", "a"), edge("b", "goal")];
        let times = times_for("goal", &nodes, &edges);

        assert!(times[&id("goal")].is_known());
    }

    #[test]
    fn dangling_prerequisite_ignored() {
        let nodes = vec![todo("goal", 2.0)];
        let edges = vec![edge("ghost", "goal")];

        assert_eq!(times_for("goal", &nodes, &edges)[&id("goal")], known(2.0, 2.0));
    }

    #[test]
    fn metric_display() {
        assert_eq!(known(12.0, 9.0).to_string(), "2.4 weeks serial, 1.8 weeks critical path");
        assert_eq!(TimeMetric::Unknown.to_string(), "needs estimate");
    }

    #[test]
    fn metric_serializes_tagged() {
        let json = serde_json::to_value(known(5.0, 3.0)).unwrap();
        assert_eq!(json["kind"], "known");
        assert_eq!(json["serial_sum"], 5.0);

        let json = serde_json::to_value(TimeMetric::Unknown).unwrap();
        assert_eq!(json["kind"], "unknown");
    }
}

//! Focus queries (frontier, times, ancestors, focus)
//!
//! Every command loads one snapshot, indexes it once and runs the engine
//! against it. A missing focal task is a normal state: the commands print
//! empty results and succeed.

use std::path::Path;

use anyhow::{Context, Result};

use super::output::{Output, Table};
use crate::domain::{DependencyGraph, GraphSnapshot, TaskId, TaskNode};
use crate::engine::{self, format_days, Evaluation, TimeMetric};
use crate::storage::{load_snapshot, Config, Project};

/// Snapshot plus the configuration it was resolved with
pub struct Workspace {
    pub config: Config,
    pub snapshot: GraphSnapshot,
}

impl Workspace {
    /// Loads `graph` if given, otherwise the current project's snapshot
    pub fn load(config: Config, graph: Option<&Path>) -> Result<Self> {
        let snapshot = match graph {
            Some(path) => load_snapshot(path)?,
            None => Project::open_current()?.load_snapshot()?,
        };

        Ok(Self { config, snapshot })
    }

    /// Focal task from the argument, falling back to the configured focus
    pub fn resolve_focus(&self, arg: Option<&str>) -> Result<Option<TaskId>> {
        match arg {
            Some(raw) => raw
                .parse()
                .map(Some)
                .with_context(|| format!("Invalid task ID: '{}'", raw)),
            None => Ok(self.config.focus()?),
        }
    }
}

fn warn_if_unknown(graph: &DependencyGraph<'_>, focal: Option<&TaskId>) {
    if let Some(focal) = focal {
        if !graph.contains(focal) {
            tracing::warn!(focal = %focal, "task not found in graph, nothing to analyse");
        }
    }
}

fn node_json(node: &TaskNode) -> serde_json::Value {
    serde_json::json!({
        "id": node.id,
        "title": node.title,
        "status": node.status,
    })
}

fn time_columns(metric: &TimeMetric) -> (String, String) {
    match metric {
        TimeMetric::Known {
            serial_sum,
            critical_min,
        } => (format_days(*serial_sum), format_days(*critical_min)),
        TimeMetric::Unknown => ("needs estimate".to_string(), "needs estimate".to_string()),
    }
}

/// Show what can be started now towards the focal task
pub fn frontier(output: &Output, workspace: &Workspace, task: Option<&str>) -> Result<()> {
    let focal = workspace.resolve_focus(task)?;
    let graph = workspace.snapshot.index();
    warn_if_unknown(&graph, focal.as_ref());

    let frontier = match &focal {
        Some(focal) => engine::frontier_in(&graph, focal),
        None => Default::default(),
    };
    let mut nodes: Vec<&TaskNode> = frontier.iter().filter_map(|id| graph.node(id)).collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    if output.is_json() {
        return output.data(&serde_json::json!({
            "focal": focal,
            "frontier": nodes.iter().map(|n| node_json(n)).collect::<Vec<_>>(),
        }));
    }

    let Some(focal) = focal else {
        println!("No focal task selected.");
        return Ok(());
    };

    print_frontier(output, &focal, &nodes);
    Ok(())
}

fn print_frontier(output: &Output, focal: &TaskId, nodes: &[&TaskNode]) {
    if nodes.is_empty() {
        println!("Nothing actionable upstream of {}.", focal);
        return;
    }

    println!("Frontier for {} ({}):", focal, nodes.len());
    let mut table = Table::new(&["ID", "STATUS", "TITLE"]);
    for node in nodes {
        table.row([
            node.id.to_string(),
            format!("{} {}", node.status.symbol(), node.status.label()),
            node.title.clone().unwrap_or_default(),
        ]);
    }
    output.table(&table);
}

/// Show remaining time for the focal task and its open ancestors
pub fn times(output: &Output, workspace: &Workspace, task: Option<&str>) -> Result<()> {
    let focal = workspace.resolve_focus(task)?;
    let graph = workspace.snapshot.index();
    warn_if_unknown(&graph, focal.as_ref());

    let evaluation = Evaluation {
        times: match &focal {
            Some(focal) => engine::cumulative_times_in(&graph, focal),
            None => Default::default(),
        },
        focal,
        ..Default::default()
    };

    if output.is_json() {
        return output.data(&serde_json::json!({
            "focal": evaluation.focal,
            "times": times_json(&evaluation),
        }));
    }

    let Some(focal) = &evaluation.focal else {
        println!("No focal task selected.");
        return Ok(());
    };

    print_times(output, focal, &evaluation);
    Ok(())
}

/// Focal entry first, then the rest by ID
fn ordered_times(evaluation: &Evaluation) -> Vec<(&TaskId, &TimeMetric)> {
    let mut entries = evaluation.sorted_times();
    if let Some(focal) = &evaluation.focal {
        if let Some(pos) = entries.iter().position(|(id, _)| *id == focal) {
            let entry = entries.remove(pos);
            entries.insert(0, entry);
        }
    }
    entries
}

fn times_json(evaluation: &Evaluation) -> Vec<serde_json::Value> {
    ordered_times(evaluation)
        .into_iter()
        .map(|(id, metric)| {
            serde_json::json!({
                "id": id,
                "metric": metric,
            })
        })
        .collect()
}

fn print_times(output: &Output, focal: &TaskId, evaluation: &Evaluation) {
    if evaluation.times.is_empty() {
        println!("No remaining time for {} (resolved or not in graph).", focal);
        return;
    }

    println!("Remaining time for {}:", focal);
    let mut table = Table::new(&["ID", "SERIAL", "CRITICAL PATH"]);
    for (id, metric) in ordered_times(evaluation) {
        let (serial, critical) = time_columns(metric);
        table.row([id.to_string(), serial, critical]);
    }
    output.table(&table);
}

/// Show everything upstream of a task
pub fn ancestors(
    output: &Output,
    workspace: &Workspace,
    task: &str,
    stop_at_resolved: bool,
) -> Result<()> {
    let focal: TaskId = task
        .parse()
        .with_context(|| format!("Invalid task ID: '{}'", task))?;
    let graph = workspace.snapshot.index();
    warn_if_unknown(&graph, Some(&focal));

    let ancestors = engine::ancestors_in(&graph, &focal, stop_at_resolved);
    let mut nodes: Vec<&TaskNode> = ancestors.iter().filter_map(|id| graph.node(id)).collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));

    if output.is_json() {
        output.data(&serde_json::json!({
            "focal": focal,
            "stop_at_resolved": stop_at_resolved,
            "ancestors": nodes.iter().map(|n| node_json(n)).collect::<Vec<_>>(),
        }))?;
    } else if nodes.is_empty() {
        println!("{} has no prerequisites.", focal);
    } else {
        println!("Ancestors of {} ({}):", focal, nodes.len());
        for node in nodes {
            println!("  {} {} - {}", node.status.symbol(), node.id, node.display_name());
        }
    }

    Ok(())
}

/// Show frontier and remaining time together, optionally pinning the focus
pub fn focus(output: &Output, workspace: &Workspace, task: Option<&str>, pin: bool) -> Result<()> {
    let focal = workspace.resolve_focus(task)?;
    let graph = workspace.snapshot.index();
    warn_if_unknown(&graph, focal.as_ref());

    if pin {
        let focal = focal
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("--pin needs a task to pin"))?;
        let mut config = workspace.config.clone();
        config.project.focus = Some(focal.to_string());
        config.save_project()?;
        tracing::info!(focal = %focal, "pinned default focus");
    }

    let evaluation = engine::evaluate_in(&graph, focal.as_ref());

    if output.is_json() {
        let frontier: Vec<_> = evaluation
            .sorted_frontier()
            .into_iter()
            .filter_map(|id| graph.node(id))
            .map(node_json)
            .collect();
        return output.data(&serde_json::json!({
            "focal": evaluation.focal,
            "frontier": frontier,
            "times": times_json(&evaluation),
        }));
    }

    let Some(focal) = &evaluation.focal else {
        println!("No focal task selected.");
        return Ok(());
    };

    let frontier: Vec<&TaskNode> = evaluation
        .sorted_frontier()
        .into_iter()
        .filter_map(|id| graph.node(id))
        .collect();

    match evaluation.focal_time() {
        Some(metric) => println!("{}: {}", focal, metric),
        None => println!("{}: no remaining time", focal),
    }
    println!();
    print_frontier(output, focal, &frontier);
    println!();
    print_times(output, focal, &evaluation);

    Ok(())
}

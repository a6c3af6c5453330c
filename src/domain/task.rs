//! Task domain model
//!
//! A task node is the unit of work the engine reasons about. Only the
//! status and the duration estimate influence derived values; the title
//! is carried along for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    #[error("Invalid estimate '{0}': expected a number followed by a unit, e.g. '3d' or '2 weeks'")]
    Malformed(String),

    #[error("Unknown duration unit '{0}' (expected day, week or month)")]
    UnknownUnit(String),

    #[error("Estimate must be a positive number, got {0}")]
    NotPositive(f64),
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    Deferred,
}

impl TaskStatus {
    /// Returns true for Done and Deferred.
    ///
    /// Resolved tasks have no remaining duration, never block their
    /// dependents and end a backward time walk.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Deferred)
    }

    /// Returns true if the task still needs work
    pub fn is_active(&self) -> bool {
        !self.is_resolved()
    }

    /// Returns a display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
            TaskStatus::Deferred => "deferred",
        }
    }

    /// Returns a checkbox-style marker for text output
    pub fn symbol(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "[ ]",
            TaskStatus::InProgress => "[~]",
            TaskStatus::Done => "[x]",
            TaskStatus::Deferred => "[-]",
        }
    }
}

/// Unit of a duration estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Day,
    Week,
    Month,
}

impl DurationUnit {
    /// Largest first, used when picking a display unit
    pub const DESCENDING: [DurationUnit; 3] =
        [DurationUnit::Month, DurationUnit::Week, DurationUnit::Day];

    /// Number of working days in one unit
    pub fn days(&self) -> f64 {
        match self {
            DurationUnit::Day => 1.0,
            DurationUnit::Week => 5.0,
            DurationUnit::Month => 20.0,
        }
    }

    /// Singular display name
    pub fn name(&self) -> &'static str {
        match self {
            DurationUnit::Day => "day",
            DurationUnit::Week => "week",
            DurationUnit::Month => "month",
        }
    }
}

impl FromStr for DurationUnit {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "days" => Ok(DurationUnit::Day),
            "w" | "wk" | "week" | "weeks" => Ok(DurationUnit::Week),
            "m" | "mo" | "month" | "months" => Ok(DurationUnit::Month),
            other => Err(EstimateError::UnknownUnit(other.to_string())),
        }
    }
}

/// Accepted serialized shapes for an estimate: `"3d"` or `{"value": 3, "unit": "day"}`
#[derive(Deserialize)]
#[serde(untagged)]
enum EstimateRepr {
    Short(String),
    Full { value: f64, unit: DurationUnit },
}

/// A duration estimate attached to a task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EstimateRepr")]
pub struct Estimate {
    pub value: f64,
    pub unit: DurationUnit,
}

impl Estimate {
    /// Creates an estimate, rejecting non-positive magnitudes
    pub fn new(value: f64, unit: DurationUnit) -> Result<Self, EstimateError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(EstimateError::NotPositive(value));
        }
        Ok(Self { value, unit })
    }

    pub fn days(value: f64) -> Result<Self, EstimateError> {
        Self::new(value, DurationUnit::Day)
    }

    pub fn weeks(value: f64) -> Result<Self, EstimateError> {
        Self::new(value, DurationUnit::Week)
    }

    pub fn months(value: f64) -> Result<Self, EstimateError> {
        Self::new(value, DurationUnit::Month)
    }

    /// Returns the estimate in days, or None if the magnitude is unusable
    pub fn in_days(&self) -> Option<f64> {
        if self.value.is_finite() && self.value > 0.0 {
            Some(self.value * self.unit.days())
        } else {
            None
        }
    }
}

impl TryFrom<EstimateRepr> for Estimate {
    type Error = EstimateError;

    fn try_from(repr: EstimateRepr) -> Result<Self, Self::Error> {
        match repr {
            EstimateRepr::Short(s) => s.parse(),
            EstimateRepr::Full { value, unit } => Estimate::new(value, unit),
        }
    }
}

impl FromStr for Estimate {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| EstimateError::Malformed(s.to_string()))?;

        let (number, unit) = s.split_at(split);
        let value: f64 = number
            .parse()
            .map_err(|_| EstimateError::Malformed(s.to_string()))?;

        Estimate::new(value, unit.parse()?)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.value == 1.0 { "" } else { "s" };
        write!(f, "{} {}{}", self.value, self.unit.name(), plural)
    }
}

/// A node of the task graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    pub id: TaskId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<Estimate>,
}

impl TaskNode {
    /// Creates a todo task without an estimate
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            status: TaskStatus::Todo,
            estimate: None,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_estimate(mut self, estimate: Estimate) -> Self {
        self.estimate = Some(estimate);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns true if the task is Done or Deferred
    pub fn is_resolved(&self) -> bool {
        self.status.is_resolved()
    }

    /// Returns the estimate in days, if a usable one is present
    pub fn duration_days(&self) -> Option<f64> {
        self.estimate.as_ref().and_then(Estimate::in_days)
    }

    /// Returns true for an active task with no usable estimate
    pub fn needs_estimate(&self) -> bool {
        self.status.is_active() && self.duration_days().is_none()
    }

    /// Title if set, otherwise the ID
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}

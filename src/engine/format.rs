//! Human-readable durations

use crate::domain::DurationUnit;

/// Renders a number of days in the largest unit that keeps the value at or
/// above one, rounded to one decimal (`1.5 weeks`, `2 months`, `0.5 days`).
pub fn format_days(days: f64) -> String {
    let (value, unit) = DurationUnit::DESCENDING
        .iter()
        .map(|unit| (days / unit.days(), *unit))
        .find(|(value, _)| *value >= 1.0)
        .unwrap_or((days, DurationUnit::Day));

    let rounded = (value * 10.0).round() / 10.0;
    let plural = if rounded == 1.0 { "" } else { "s" };
    format!("{} {}{}", rounded, unit.name(), plural)
}

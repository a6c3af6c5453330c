//! Output formatting for CLI commands
//!
//! Commands either emit one JSON document on stdout or print text made of
//! headings and aligned tables. Logging goes through `tracing` to stderr and
//! never mixes with this output.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::storage::OutputFormat;

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a one-line confirmation
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({
                    "success": true,
                    "message": message
                })
            ),
        }
    }

    /// Prints a serializable value, compact in JSON mode and pretty otherwise
    pub fn data<T: Serialize>(&self, data: &T) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string(data),
            OutputFormat::Text => serde_json::to_string_pretty(data),
        }
        .context("Failed to serialize output")?;

        println!("{}", rendered);
        Ok(())
    }

    /// Prints a title underlined with `=`
    pub fn heading(&self, title: &str) {
        println!("{}", title);
        println!("{}", "=".repeat(title.chars().count().max(40)));
    }

    /// Prints a table with aligned columns
    pub fn table(&self, table: &Table) {
        print!("{}", table.render());
    }
}

/// Column-aligned text table
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; missing cells render empty, extra cells are dropped
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .map(Into::into)
            .take(self.headers.len())
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders header, separator and rows, one line each
    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: &[&str]| -> String {
            let last = cells.len().saturating_sub(1);
            let mut out = String::new();
            for (col, cell) in cells.iter().enumerate() {
                if col == last {
                    out.push_str(cell);
                } else {
                    out.push_str(&format!("{:<width$}  ", cell, width = widths[col]));
                }
            }
            out.trim_end().to_string()
        };

        let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let mut out = line(&self.headers);
        out.push('\n');
        out.push_str(&"-".repeat(total));
        out.push('\n');
        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            out.push_str(&line(&cells));
            out.push('\n');
        }
        out
    }
}

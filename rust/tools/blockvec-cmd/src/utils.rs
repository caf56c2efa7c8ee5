//! Common utilities for blockvec-cmd

use anyhow::{Context, Result};
use std::fmt::Display;

/// Parses a comma-separated list of integers. Blank input yields an empty list.
pub fn parse_values(input: &str) -> Result<Vec<i64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("Invalid integer value: '{s}'"))
        })
        .collect()
}

/// Formats values as `[a, b, c]`.
pub fn format_values<T: Display>(values: &[T]) -> String {
    let items = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}

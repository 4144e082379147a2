//! Output formatting: compact JSON by default, tables with `--pretty`

use anyhow::Result;
use serde::Serialize;

pub use crate::config::OutputFormat;

/// Serialize `value` the way the selected format expects
pub fn render_json<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
    })
}

/// Fixed-width text table
pub struct Table {
    columns: Vec<(&'static str, usize)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[(&'static str, usize)]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rows
            .push(cells.into_iter().map(|c| c.as_ref().to_string()).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let total: usize = self.columns.iter().map(|(_, w)| w + 1).sum();
        let mut out = String::new();
        out.push_str(&self.line(self.columns.iter().map(|(h, _)| h.to_string())));
        out.push('\n');
        out.push_str(&"-".repeat(total.saturating_sub(1)));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&self.line(row.iter().cloned()));
            out.push('\n');
        }
        out
    }

    fn line(&self, cells: impl Iterator<Item = String>) -> String {
        let padded: Vec<String> = self
            .columns
            .iter()
            .zip(cells.chain(std::iter::repeat(String::new())))
            .map(|((_, width), cell)| format!("{:<width$}", truncate(&cell, *width), width = *width))
            .collect();
        padded.join(" ").trim_end().to_string()
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with "..."
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-name", 8), "a-ver...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_table_pads_and_fills_missing_cells() {
        let mut table = Table::new(&[("NAME", 6), ("STATUS", 8)]);
        table.row(["alpha"]);
        let rendered = table.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "NAME   STATUS");
        assert_eq!(lines[1], "-".repeat(15));
        assert_eq!(lines[2], "alpha");
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let value = serde_json::json!({"a": [1, 2]});
        assert_eq!(render_json(&value, OutputFormat::Json).unwrap(), r#"{"a":[1,2]}"#);
        assert!(render_json(&value, OutputFormat::Pretty).unwrap().contains('\n'));
    }
}

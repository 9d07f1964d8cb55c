//! Plain-text rendering helpers.
//!
//! Page responses are serializable structs; this module turns frames and
//! key/value lists into fixed-width text for the terminal.

use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

/// Widest a rendered cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 24;

/// A frame converted to strings, ready for display or JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows in the source frame, which may exceed `rows.len()`.
    pub total_rows: usize,
}

impl TableView {
    /// Convert up to `limit` rows of `df` (all rows when `None`).
    pub fn from_dataframe(df: &DataFrame, limit: Option<usize>) -> Self {
        let total_rows = df.height();
        let shown = limit.map_or(total_rows, |l| l.min(total_rows));
        let sliced = df.slice(0, shown);

        let headers = sliced
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = Vec::with_capacity(shown);
        for row_idx in 0..sliced.height() {
            let row = sliced
                .get_columns()
                .iter()
                .map(|col| col.get(row_idx).map_or_else(|_| String::new(), cell_text))
                .collect();
            rows.push(row);
        }

        Self {
            headers,
            rows,
            total_rows,
        }
    }

    /// Build a table from already formatted cells.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        let total_rows = rows.len();
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
            total_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an aligned text table.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|c| {
                let cells = self.rows.iter().filter_map(|r| r.get(c));
                std::iter::once(&self.headers[c])
                    .chain(cells)
                    .map(|s| s.chars().count())
                    .max()
                    .unwrap_or(0)
                    .min(MAX_CELL_WIDTH)
            })
            .collect();

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{:<w$}", truncate_str(cell, w)))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(&self.headers));
        out.push('\n');
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule_width));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        if self.total_rows > self.rows.len() {
            out.push_str(&format!(
                "... {} of {} rows shown\n",
                self.rows.len(),
                self.total_rows
            ));
        }
        out
    }
}

/// Display text of one cell.
fn cell_text(value: AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float32(f) => format!("{f:.2}"),
        AnyValue::Float64(f) => format!("{f:.2}"),
        other => format!("{other}"),
    }
}

/// Truncate to `max_len` characters, marking the cut with "...".
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{kept}...")
}

/// A titled block of text, underlined the way the CLI prints sections.
pub fn section(title: &str, body: &str) -> String {
    format!("{}\n{}\n{}\n", title, "-".repeat(title.chars().count().max(40)), body)
}

/// Render `label: value` lines aligned on the colon.
pub fn key_values(pairs: &[(String, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("  {k:<width$}  {v}\n"))
        .collect()
}

/// Percentage with one decimal.
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

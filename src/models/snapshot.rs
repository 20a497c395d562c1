//! Tabular snapshot of a fetched table.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;
use unicode_width::UnicodeWidthStr;

/// A rectangular, labeled result of one table fetch. Column names are in
/// declared order; every row is positional and exactly as wide as `columns`.
/// Created by one fetch call and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl TableSnapshot {
    /// Create a snapshot, dropping any row whose width does not match the
    /// column count so the structural invariant always holds. Dropped rows
    /// indicate a decoding bug upstream and are logged.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        let width = columns.len();
        let total = rows.len();
        let rows: Vec<Vec<JsonValue>> = rows.into_iter().filter(|r| r.len() == width).collect();
        let dropped = total - rows.len();
        if dropped > 0 {
            warn!(dropped, width, "Discarded rows not matching the column count");
        }
        Self { columns, rows }
    }

    /// Number of rows in the snapshot.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the snapshot holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over the first `n` rows, columns unchanged.
    pub fn head(&self, n: usize) -> TableSnapshot {
        TableSnapshot {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Render as an ASCII table (MySQL CLI style).
    pub fn to_ascii_table(&self) -> String {
        if self.columns.is_empty() {
            return "Empty set".to_string();
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.width()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                widths[i] = widths[i].max(format_value(value).width());
            }
        }

        let separator: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+\n";

        let mut output = String::new();
        output.push_str(&separator);
        let header: String = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("| {:^width$} ", col, width = *w))
            .collect::<String>()
            + "|\n";
        output.push_str(&header);
        output.push_str(&separator);

        for row in &self.rows {
            let row_str: String = row
                .iter()
                .zip(&widths)
                .map(|(value, w)| {
                    let formatted = format_value(value);
                    if matches!(value, JsonValue::Number(_)) {
                        format!("| {:>width$} ", formatted, width = *w)
                    } else {
                        format!("| {:<width$} ", formatted, width = *w)
                    }
                })
                .collect::<String>()
                + "|\n";
            output.push_str(&row_str);
        }

        output.push_str(&separator);
        let row_text = if self.row_count() == 1 { "row" } else { "rows" };
        output.push_str(&format!("{} {} in set\n", self.row_count(), row_text));
        output
    }
}

fn format_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(arr) => serde_json::to_string(arr).unwrap_or_default(),
        JsonValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TableSnapshot {
        TableSnapshot::new(
            vec!["id".to_string(), "amount".to_string()],
            vec![
                vec![json!(1), json!("120.50")],
                vec![json!(2), json!("9.99")],
                vec![json!(3), json!(null)],
            ],
        )
    }

    #[test]
    fn test_rows_match_column_count() {
        let snapshot = sample();
        for row in &snapshot.rows {
            assert_eq!(row.len(), snapshot.columns.len());
        }
    }

    #[test]
    fn test_new_drops_ragged_rows() {
        let snapshot = TableSnapshot::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![json!(1)], vec![json!(1), json!(2)]],
        );
        assert_eq!(snapshot.row_count(), 1);
        assert_eq!(snapshot.rows[0], vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_head_limits_rows() {
        let head = sample().head(2);
        assert_eq!(head.row_count(), 2);
        assert_eq!(head.columns.len(), 2);
    }

    #[test]
    fn test_head_beyond_len_is_whole_snapshot() {
        assert_eq!(sample().head(100).row_count(), 3);
    }

    #[test]
    fn test_ascii_table_contains_values() {
        let table = sample().to_ascii_table();
        assert!(table.contains("amount"));
        assert!(table.contains("120.50"));
        assert!(table.contains("NULL"));
        assert!(table.contains("3 rows in set"));
    }

    #[test]
    fn test_ascii_table_empty_columns() {
        let snapshot = TableSnapshot::new(Vec::new(), Vec::new());
        assert_eq!(snapshot.to_ascii_table(), "Empty set");
    }
}

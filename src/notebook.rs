//! Lab notebook interface
//!
//! Training results land in a spreadsheet-style notebook: one row per day,
//! one column per metric header. Backends differ (local workbook, exported
//! sheet), so access goes through a small trait chosen at construction;
//! nothing here inspects the backing type at runtime.

use crate::error::MetricsError;
use serde_json::Value;

/// Grid access to a notebook backend.
///
/// Row keys are matched against the first column, column keys against the
/// header row.
pub trait NotebookSource {
    /// Index of the row whose first cell equals `key`
    fn find_row(&self, key: &str) -> Option<usize>;
    /// Index of the column whose header cell equals `key`
    fn find_column(&self, key: &str) -> Option<usize>;
    /// Cell contents, `None` outside the grid
    fn read_cell(&self, row: usize, column: usize) -> Option<Value>;
    fn write_cell(&mut self, row: usize, column: usize, value: Value) -> Result<(), MetricsError>;
}

/// Whether a cell counts as empty for entry checks.
///
/// Missing cells, nulls (how spreadsheet NaN blanks come through), and blank
/// strings are empty; everything else is data.
pub fn cell_is_empty(cell: Option<&Value>) -> bool {
    match cell {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

/// Per-header skip flags for a day's row.
///
/// A header is flagged when its cell already holds data and `overwrite` is
/// not set. Headers the notebook does not have, and a date row that does not
/// exist, are never flagged; the update step resolves those by writing
/// nothing.
pub fn check_entries(
    notebook: &dyn NotebookSource,
    date_tag: &str,
    headers: &[&str],
    overwrite: bool,
) -> Vec<bool> {
    let row = notebook.find_row(date_tag);
    headers
        .iter()
        .map(|header| match (row, notebook.find_column(header)) {
            (Some(row), Some(column)) => {
                !overwrite && !cell_is_empty(notebook.read_cell(row, column).as_ref())
            }
            _ => false,
        })
        .collect()
}

/// Write a day's metric values into its notebook row.
///
/// Cells already holding data are left alone unless `overwrite` is set;
/// headers missing from the notebook or from `values` are skipped. Returns
/// how many cells were written.
pub fn update_row(
    notebook: &mut dyn NotebookSource,
    date_tag: &str,
    headers: &[&str],
    values: &serde_json::Map<String, Value>,
    overwrite: bool,
) -> Result<u32, MetricsError> {
    let skip_flags = check_entries(notebook, date_tag, headers, overwrite);

    let mut written = 0;
    for (header, skip) in headers.iter().zip(skip_flags) {
        if skip {
            continue;
        }
        let (row, column) = match (notebook.find_row(date_tag), notebook.find_column(header)) {
            (Some(row), Some(column)) => (row, column),
            _ => continue,
        };
        let value = match values.get(*header) {
            Some(value) => value.clone(),
            None => continue,
        };
        notebook.write_cell(row, column, value)?;
        written += 1;
    }
    Ok(written)
}

/// In-memory notebook grid.
///
/// Row 0 is the header row; column 0 holds the date tags. Serves as the
/// staging target when the real spreadsheet must keep its formatting, and as
/// the test backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotebook {
    grid: Vec<Vec<Value>>,
}

impl MemoryNotebook {
    pub fn new(grid: Vec<Vec<Value>>) -> Self {
        Self { grid }
    }

    /// Notebook with the given headers and one empty row per date tag
    pub fn with_layout(headers: &[&str], date_tags: &[&str]) -> Self {
        let mut grid = Vec::with_capacity(date_tags.len() + 1);
        grid.push(
            headers
                .iter()
                .map(|header| Value::String(header.to_string()))
                .collect::<Vec<Value>>(),
        );
        for date_tag in date_tags {
            let mut row = vec![Value::Null; headers.len()];
            if let Some(first) = row.first_mut() {
                *first = Value::String(date_tag.to_string());
            }
            grid.push(row);
        }
        Self { grid }
    }

    pub fn grid(&self) -> &[Vec<Value>] {
        &self.grid
    }
}

impl NotebookSource for MemoryNotebook {
    fn find_row(&self, key: &str) -> Option<usize> {
        self.grid
            .iter()
            .position(|row| row.first().and_then(Value::as_str) == Some(key))
    }

    fn find_column(&self, key: &str) -> Option<usize> {
        self.grid
            .first()?
            .iter()
            .position(|cell| cell.as_str() == Some(key))
    }

    fn read_cell(&self, row: usize, column: usize) -> Option<Value> {
        self.grid.get(row)?.get(column).cloned()
    }

    fn write_cell(&mut self, row: usize, column: usize, value: Value) -> Result<(), MetricsError> {
        let cell = self
            .grid
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
            .ok_or_else(|| {
                MetricsError::NotebookError(format!("cell ({}, {}) outside grid", row, column))
            })?;
        *cell = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const HEADERS: [&str; 3] = ["Date", "TOTAL_TRIALS", "SUCCESS_RATE"];

    fn make_test_notebook() -> MemoryNotebook {
        MemoryNotebook::with_layout(&HEADERS, &["2022_08_30", "2022_08_31"])
    }

    #[test]
    fn test_cell_is_empty() {
        assert!(cell_is_empty(None));
        assert!(cell_is_empty(Some(&Value::Null)));
        assert!(cell_is_empty(Some(&json!(""))));
        assert!(cell_is_empty(Some(&json!("   "))));
        assert!(!cell_is_empty(Some(&json!(0))));
        assert!(!cell_is_empty(Some(&json!("204"))));
    }

    #[test]
    fn test_find_row_and_column() {
        let notebook = make_test_notebook();
        assert_eq!(notebook.find_row("2022_08_31"), Some(2));
        assert_eq!(notebook.find_column("SUCCESS_RATE"), Some(2));
        assert_eq!(notebook.find_row("2022_09_01"), None);
        assert_eq!(notebook.find_column("EMG_CHANNELS"), None);
    }

    #[test]
    fn test_check_entries_flags_recorded_cells() {
        let mut notebook = make_test_notebook();
        notebook.write_cell(1, 1, json!(120)).unwrap();

        let skip = check_entries(&notebook, "2022_08_30", &["TOTAL_TRIALS", "SUCCESS_RATE"], false);
        assert_eq!(skip, vec![true, false]);

        // Overwrite clears the flags
        let skip = check_entries(&notebook, "2022_08_30", &["TOTAL_TRIALS", "SUCCESS_RATE"], true);
        assert_eq!(skip, vec![false, false]);
    }

    #[test]
    fn test_check_entries_unknown_row_or_header() {
        let notebook = make_test_notebook();
        let skip = check_entries(&notebook, "2022_09_01", &["TOTAL_TRIALS"], false);
        assert_eq!(skip, vec![false]);

        let skip = check_entries(&notebook, "2022_08_30", &["EMG_CHANNELS"], false);
        assert_eq!(skip, vec![false]);
    }

    #[test]
    fn test_update_row_writes_values() {
        let mut notebook = make_test_notebook();
        let mut values = serde_json::Map::new();
        values.insert("TOTAL_TRIALS".to_string(), json!(204));
        values.insert("SUCCESS_RATE".to_string(), json!(92.6));

        let written = update_row(
            &mut notebook,
            "2022_08_31",
            &["TOTAL_TRIALS", "SUCCESS_RATE"],
            &values,
            false,
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(notebook.read_cell(2, 1), Some(json!(204)));
        assert_eq!(notebook.read_cell(2, 2), Some(json!(92.6)));
    }

    #[test]
    fn test_update_row_preserves_recorded_cells() {
        let mut notebook = make_test_notebook();
        notebook.write_cell(2, 1, json!(111)).unwrap();

        let mut values = serde_json::Map::new();
        values.insert("TOTAL_TRIALS".to_string(), json!(204));
        values.insert("SUCCESS_RATE".to_string(), json!(92.6));

        let written = update_row(
            &mut notebook,
            "2022_08_31",
            &["TOTAL_TRIALS", "SUCCESS_RATE"],
            &values,
            false,
        )
        .unwrap();

        assert_eq!(written, 1);
        assert_eq!(notebook.read_cell(2, 1), Some(json!(111)));
        assert_eq!(notebook.read_cell(2, 2), Some(json!(92.6)));
    }

    #[test]
    fn test_update_row_unknown_date_writes_nothing() {
        let mut notebook = make_test_notebook();
        let mut values = serde_json::Map::new();
        values.insert("TOTAL_TRIALS".to_string(), json!(204));

        let written =
            update_row(&mut notebook, "2022_09_01", &["TOTAL_TRIALS"], &values, false).unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn test_write_cell_outside_grid() {
        let mut notebook = make_test_notebook();
        let result = notebook.write_cell(10, 10, json!(1));
        assert!(matches!(result, Err(MetricsError::NotebookError(_))));
    }
}

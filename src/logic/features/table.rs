//! Table - column-named, row-ordered batch of string cells
//!
//! Raw and derived batches are both tables: every cell is either a value or
//! missing (`None`). Numeric meaning is applied by the pipeline stage that
//! needs it, so a table never fails to hold what the input file contained.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A single cell; `None` marks a missing value
pub type Cell = Option<String>;

/// Ordered set of named columns over ordered rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a table from header names and rows, checking every row's width
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> PipelineResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> PipelineResult<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell value at (row, column name)
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[index].as_deref()).collect())
    }

    /// Replace a column's values, or append it as a new last column
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> PipelineResult<()> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::RowWidth {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Rewrite a column in place; unknown columns are left alone
    pub fn map_column<F>(&mut self, name: &str, mut f: F)
    where
        F: FnMut(Cell) -> Cell,
    {
        if let Some(index) = self.column_index(name) {
            for row in &mut self.rows {
                let value = row[index].take();
                row[index] = f(value);
            }
        }
    }

    /// Drop the named columns; names that are not present are ignored
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<bool> = self.columns.iter().map(|c| !names.contains(&c.as_str())).collect();

        if keep.iter().all(|&k| k) {
            return;
        }

        self.columns = retain_by_mask(std::mem::take(&mut self.columns), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        Some(s.to_string())
    }

    fn sample() -> Table {
        Table::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![cell("1"), cell("x"), None],
                vec![cell("2"), None, cell("z")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        let err = table.push_row(vec![cell("1")]).unwrap_err();
        assert!(matches!(err, PipelineError::RowWidth { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn test_get_and_column() {
        let table = sample();
        assert_eq!(table.get(0, "b"), Some("x"));
        assert_eq!(table.get(1, "b"), None);
        assert_eq!(table.get(0, "missing"), None);
        assert_eq!(table.column("c"), Some(vec![None, Some("z")]));
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut table = sample();
        table.set_column("d", vec![cell("p"), cell("q")]).unwrap();
        assert_eq!(table.columns().last().map(String::as_str), Some("d"));

        table.set_column("a", vec![None, cell("9")]).unwrap();
        assert_eq!(table.get(0, "a"), None);
        assert_eq!(table.get(1, "a"), Some("9"));
        assert_eq!(table.columns().len(), 4);
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut table = sample();
        assert!(table.set_column("d", vec![cell("p")]).is_err());
    }

    #[test]
    fn test_drop_columns_keeps_order() {
        let mut table = sample();
        table.drop_columns(&["b", "not-there"]);
        assert_eq!(table.columns(), &["a".to_string(), "c".to_string()]);
        assert_eq!(table.rows()[1], vec![cell("2"), cell("z")]);
    }

    #[test]
    fn test_map_column() {
        let mut table = sample();
        table.map_column("b", |v| v.or_else(|| cell("filled")));
        assert_eq!(table.column("b"), Some(vec![Some("x"), Some("filled")]));
    }
}

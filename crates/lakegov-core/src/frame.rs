//! In-memory tabular data.
//!
//! [`Frame`] is the dataset representation handed to the quality engine and
//! the batch transformation job: ordered columns, rows of [`Cell`]s. CSV
//! ingestion keeps every value textual (empty cells become [`Cell::Null`]) so
//! that pattern and categorical rules see the data exactly as written;
//! numeric rules parse on demand.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// A single value in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing value.
    Null,
    /// Numeric value.
    Number(f64),
    /// Textual value.
    Text(String),
}

impl Cell {
    /// Returns true if the cell is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the cell as a number, parsing text if necessary.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null => None,
        }
    }

    /// Returns the cell's text, if textual.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Null
        } else {
            Self::Text(s.to_string())
        }
    }
}

/// An ordered-column, row-oriented table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Creates an empty frame with the given columns.
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Loads a frame from CSV data; the header row defines the columns.
    ///
    /// Empty cells become [`Cell::Null`], everything else stays textual.
    pub fn from_csv(reader: impl Read) -> CoreResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut frame = Self::new(columns);
        for record in csv_reader.records() {
            let record = record?;
            let row: Vec<Cell> = record.iter().map(Cell::from).collect();
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Appends a row; its arity must match the columns.
    pub fn push_row(&mut self, row: Vec<Cell>) -> CoreResult<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowArity {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the index of a column.
    pub fn column_index(&self, name: &str) -> CoreResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CoreError::UnknownColumn(name.to_string()))
    }

    /// Returns the cell at (row, column name).
    pub fn cell(&self, row: usize, column: &str) -> CoreResult<&Cell> {
        let idx = self.column_index(column)?;
        Ok(&self.rows[row][idx])
    }

    /// Keeps only the rows for which the predicate holds.
    ///
    /// The predicate sees one row at a time and must not depend on other
    /// rows, so the hosting engine may evaluate it in any order.
    pub fn retain_rows(&mut self, mut predicate: impl FnMut(&[Cell]) -> bool) {
        self.rows.retain(|row| predicate(row));
    }

    /// Rewrites every cell of a column through a pure per-cell function.
    pub fn map_column(&mut self, column: &str, f: impl Fn(&Cell) -> Cell) -> CoreResult<()> {
        let idx = self.column_index(column)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
        Ok(())
    }

    /// Appends a column computed per row from the existing cells.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&Frame, usize) -> Cell,
    ) -> CoreResult<()> {
        let name = name.into();
        if self.columns.contains(&name) {
            return Err(CoreError::Configuration(format!(
                "column '{name}' already exists"
            )));
        }
        let cells: Vec<Cell> = (0..self.rows.len()).map(|i| f(self, i)).collect();
        self.columns.push(name);
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        let csv = "student_id,gpa,department\nAB12345678,3.85,physics\nCD87654321,,math\n";
        Frame::from_csv(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_csv_loading() {
        let frame = sample_frame();
        assert_eq!(frame.columns(), &["student_id", "gpa", "department"]);
        assert_eq!(frame.row_count(), 2);
        assert_eq!(
            frame.cell(0, "gpa").unwrap(),
            &Cell::Text("3.85".to_string())
        );
        assert!(frame.cell(1, "gpa").unwrap().is_null());
    }

    #[test]
    fn test_text_parses_as_number() {
        let frame = sample_frame();
        assert_eq!(frame.cell(0, "gpa").unwrap().as_number(), Some(3.85));
        assert_eq!(frame.cell(0, "student_id").unwrap().as_number(), None);
    }

    #[test]
    fn test_row_arity_enforced() {
        let mut frame = Frame::new(["a", "b"]);
        let err = frame.push_row(vec![Cell::Null]).unwrap_err();
        assert!(matches!(err, CoreError::RowArity { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_retain_and_map() {
        let mut frame = sample_frame();
        frame.retain_rows(|row| !row[1].is_null());
        assert_eq!(frame.row_count(), 1);

        frame
            .map_column("department", |_| Cell::Text("********".to_string()))
            .unwrap();
        assert_eq!(
            frame.cell(0, "department").unwrap(),
            &Cell::Text("********".to_string())
        );
    }

    #[test]
    fn test_add_column() {
        let mut frame = sample_frame();
        frame
            .add_column("gpa_tag", |f, i| {
                if f.cell(i, "gpa").unwrap().is_null() {
                    Cell::Text("FAIL".into())
                } else {
                    Cell::Text("PASS".into())
                }
            })
            .unwrap();
        assert_eq!(frame.cell(0, "gpa_tag").unwrap(), &Cell::Text("PASS".into()));
        assert_eq!(frame.cell(1, "gpa_tag").unwrap(), &Cell::Text("FAIL".into()));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut frame = sample_frame();
        let err = frame.add_column("gpa", |_, _| Cell::Null).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }
}

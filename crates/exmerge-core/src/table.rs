//! Core table types for representing exercise measurements

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A tabular dataset: either one parsed CSV file or a merged class table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
    /// Source file path (empty for tables not backed by a file)
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Create an empty table with no source
    pub fn empty() -> Self {
        Self::new(PathBuf::new())
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// A table with no columns carries nothing worth persisting
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Find a column by exact name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterate the values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(index).unwrap_or(&EMPTY_CELL))
    }

    /// Append a column, filling each existing row from `values` by position.
    ///
    /// Rows beyond the end of `values` receive `CellValue::Empty`; surplus
    /// values are dropped. The row count never changes.
    pub fn push_column(&mut self, name: String, values: Vec<CellValue>) {
        let index = self.columns.len();
        self.columns.push(Column::new(name, index));

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.cells.push(values.next().unwrap_or(CellValue::Empty));
        }
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as it appears in the header
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values for each column
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Empty/missing cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type.
    ///
    /// Surrounding whitespace is ignored for numeric detection only; text
    /// cells keep their raw content. `f64` parsing is correctly rounded, and
    /// `Display` emits the shortest text that parses back to the same value,
    /// so values survive a write/read cycle unchanged. Integers outside the
    /// `i64` range stay as text rather than being rounded through `f64`.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            return CellValue::Empty;
        }

        let trimmed = s.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        if !looks_like_integer(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return CellValue::Float(f);
            }
        }

        CellValue::String(s.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        self.to_string()
    }
}

/// Optional sign followed by one or more ASCII digits
fn looks_like_integer(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            // `{:?}` keeps the trailing ".0" on integral floats
            CellValue::Float(fl) => write!(f, "{:?}", fl),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::Empty => Ok(()),
        }
    }
}

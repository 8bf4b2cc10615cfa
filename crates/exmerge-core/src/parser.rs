//! CSV parser for exercise measurement files

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Parse a CSV file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_reader(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    parse_reader(content.as_bytes(), PathBuf::from(source_name))
}

/// Outcome of a tolerant load: the table, or an empty tombstone on failure
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Parsed table; empty when `loaded` is false
    pub table: Table,
    /// Whether the file parsed successfully
    pub loaded: bool,
}

/// Parse a CSV file, turning any failure into a warning and a tombstone.
///
/// Never returns an error: one unreadable file must not stop the rest of a
/// class from being merged.
pub fn read_csv_safely<P: AsRef<Path>>(path: P) -> LoadOutcome {
    let path = path.as_ref();
    match parse_csv(path) {
        Ok(table) => LoadOutcome {
            table,
            loaded: true,
        },
        Err(e) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            warn!(file = %name, error = %e, "error reading file, skipping");
            LoadOutcome {
                table: Table::new(path.to_path_buf()),
                loaded: false,
            }
        }
    }
}

fn parse_reader<R: Read>(reader: R, path: PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows are padded below
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.to_string(), i))
        .collect();

    if columns.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "no columns found in CSV".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() > columns.len() {
            return Err(Error::CsvParse {
                path,
                message: format!(
                    "row {} has {} fields, header has {}",
                    row_idx + 1,
                    record.len(),
                    columns.len()
                ),
            });
        }

        let mut cells: Vec<CellValue> = record.iter().map(CellValue::parse).collect();
        cells.resize(columns.len(), CellValue::Empty);

        rows.push(Row::new(cells));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

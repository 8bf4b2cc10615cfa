//! CSV output for merged tables

use crate::error::{Error, Result};
use crate::table::Table;
use std::path::{Path, PathBuf};

/// Output file name for a class ("squat" -> "squat_merged.csv")
pub fn output_file_name(class_name: &str) -> String {
    format!("{}_merged.csv", class_name)
}

/// Write a table as comma-delimited CSV with a header row
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let csv_error = |e: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(table.columns.iter().map(|c| c.name.as_str()))
        .map_err(csv_error)?;

    for row in &table.rows {
        writer
            .write_record(row.cells.iter().map(|c| c.to_string_value()))
            .map_err(csv_error)?;
    }

    writer.flush().map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_csv, parse_csv_str};

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("squat"), "squat_merged.csv");
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let csv = "Channel,X,label\n0,0.1,\"left, slow\"\n1,2.0,\n2,-3.14159265358979,x\n";
        let table = parse_csv_str(csv, "Ex1.csv").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&table, dir.path().join("out.csv")).unwrap();
        let reread = parse_csv(&path).unwrap();

        assert_eq!(reread.column_names(), table.column_names());
        assert_eq!(reread.row_count(), table.row_count());
        assert_eq!(reread.rows, table.rows);
    }
}

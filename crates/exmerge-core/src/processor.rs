//! Per-class processing: load every exercise file, merge, summarize

use crate::merger::{merge_tables, MergeNote};
use crate::naming::ex_label;
use crate::parser::read_csv_safely;
use crate::scanner::ClassFolder;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Descriptor of one successfully loaded exercise file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub ex_number: Option<u64>,
    pub rows: usize,
    pub columns: usize,
}

impl FileInfo {
    /// "Ex3" or "Unknown"
    pub fn label(&self) -> String {
        ex_label(self.ex_number)
    }
}

/// Summary of one class after merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Class (folder) name
    pub class: String,
    /// Files that loaded, in merge order
    pub files: Vec<FileInfo>,
    /// Files that could not be read
    pub skipped: Vec<String>,
    /// Row count of the merged table
    pub total_rows: usize,
    /// Column count of the merged table
    pub total_columns: usize,
    /// Workarounds applied during the merge
    pub notes: Vec<MergeNote>,
}

/// Output of [`process_class`]
#[derive(Debug, Clone)]
pub struct ClassResult {
    pub metadata: ClassMetadata,
    pub merged: Table,
}

/// Load, merge and summarize every CSV file of one class.
///
/// Never fails: missing files, unreadable files and a missing time column all
/// produce an empty merged table with zero totals.
pub fn process_class(class: &ClassFolder) -> ClassResult {
    info!(class = %class.name, "processing class");

    let mut metadata = ClassMetadata {
        class: class.name.clone(),
        ..ClassMetadata::default()
    };

    if class.files.is_empty() {
        warn!(class = %class.name, "no CSV files found");
        return ClassResult {
            metadata,
            merged: Table::empty(),
        };
    }

    info!(class = %class.name, count = class.files.len(), "found CSV files");

    let mut tables = Vec::new();
    let mut file_names = Vec::new();

    for file in &class.files {
        info!(label = %ex_label(file.ex_number), file = %file.name, "reading");

        let outcome = read_csv_safely(&file.path);
        if !outcome.loaded {
            metadata.skipped.push(file.name.clone());
            continue;
        }

        metadata.files.push(FileInfo {
            name: file.name.clone(),
            ex_number: file.ex_number,
            rows: outcome.table.row_count(),
            columns: outcome.table.column_count(),
        });
        tables.push(outcome.table);
        file_names.push(file.name.clone());
    }

    if tables.is_empty() {
        warn!(class = %class.name, "no valid files to merge");
        return ClassResult {
            metadata,
            merged: Table::empty(),
        };
    }

    info!(class = %class.name, count = tables.len(), "merging");
    let result = merge_tables(tables, &file_names);

    metadata.total_rows = result.table.row_count();
    metadata.total_columns = result.table.column_count();
    metadata.notes = result.notes;

    info!(
        class = %class.name,
        rows = metadata.total_rows,
        columns = metadata.total_columns,
        "merged table"
    );

    ClassResult {
        metadata,
        merged: result.table,
    }
}

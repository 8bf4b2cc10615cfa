//! Merge engine for joining exercise tables side by side
//!
//! The first table is kept whole and provides the time/channel axis. Every
//! later table contributes only its X/Y/Z columns, renamed with a suffix
//! derived from the file name (`X_Ex3`) or its position (`X_4`).

use crate::naming::{extract_ex_number, find_matching_column, Role};
use crate::table::{CellValue, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Something the merge had to work around, kept for the class summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergeNote {
    /// The first table had no channel column, so nothing was merged
    MissingChannel { file: String },
    /// A source had a different row count than the first table
    RowCountMismatch {
        file: String,
        expected: usize,
        found: usize,
    },
    /// A derived column name was taken and got a uniqueness token
    ColumnRenamed {
        file: String,
        requested: String,
        assigned: String,
    },
}

impl std::fmt::Display for MergeNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeNote::MissingChannel { file } => {
                write!(f, "no time/channel column in {}", file)
            }
            MergeNote::RowCountMismatch {
                file,
                expected,
                found,
            } => write!(
                f,
                "{} has {} rows, expected {} (aligned by position)",
                file, found, expected
            ),
            MergeNote::ColumnRenamed {
                file,
                requested,
                assigned,
            } => write!(f, "{}: column {} already taken, wrote {}", file, requested, assigned),
        }
    }
}

/// A merged table plus the notes collected while building it
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub table: Table,
    pub notes: Vec<MergeNote>,
}

impl MergeResult {
    fn empty(notes: Vec<MergeNote>) -> Self {
        Self {
            table: Table::empty(),
            notes,
        }
    }
}

/// Column-name suffix for the table at 1-based `position`
///
/// Uses the exercise number from `file_name` when there is one.
pub fn column_suffix(file_name: &str, position: usize) -> String {
    match extract_ex_number(file_name) {
        Some(n) => format!("_Ex{}", n),
        None => format!("_{}", position),
    }
}

/// Merge tables horizontally.
///
/// `file_names[i]` names the file `tables[i]` was loaded from. The result has
/// exactly as many rows as the first table: shorter sources are padded with
/// `CellValue::Empty`, longer ones truncated, and both are reported as
/// [`MergeNote::RowCountMismatch`].
pub fn merge_tables(tables: Vec<Table>, file_names: &[String]) -> MergeResult {
    let mut tables = tables.into_iter();
    let Some(mut result) = tables.next() else {
        return MergeResult::empty(Vec::new());
    };

    let first_name = file_names.first().cloned().unwrap_or_default();
    let channel = find_matching_column(Role::Channel, &result.column_names()).map(str::to_string);
    let Some(channel) = channel else {
        warn!(file = %first_name, "no time/channel column found, skipping merge");
        return MergeResult::empty(vec![MergeNote::MissingChannel { file: first_name }]);
    };
    debug!(file = %first_name, column = %channel, "time/channel column");

    let mut notes = Vec::new();
    let expected_rows = result.row_count();

    for (offset, table) in tables.enumerate() {
        let position = offset + 2;
        let file_name = file_names
            .get(position - 1)
            .cloned()
            .unwrap_or_else(|| format!("#{}", position));
        let suffix = column_suffix(&file_name, position);

        let columns = table.column_names();
        let mut copied_any = false;
        for role in Role::AXES {
            let Some(source) = find_matching_column(role, &columns) else {
                debug!(file = %file_name, role = role.keyword(), "no matching column");
                continue;
            };
            let Some(source_index) = table.find_column(source).map(|c| c.index) else {
                continue;
            };

            let requested = format!("{}{}", role.label(), suffix);
            let assigned = unique_column_name(&result, &requested);
            if assigned != requested {
                warn!(
                    file = %file_name,
                    requested = %requested,
                    assigned = %assigned,
                    "column name collision, renamed"
                );
                notes.push(MergeNote::ColumnRenamed {
                    file: file_name.clone(),
                    requested,
                    assigned: assigned.clone(),
                });
            }

            debug!(file = %file_name, source = %source, target = %assigned, "copy column");
            let values: Vec<CellValue> = table.column_values(source_index).cloned().collect();
            result.push_column(assigned, values);
            copied_any = true;
        }

        if copied_any && table.row_count() != expected_rows {
            warn!(
                file = %file_name,
                expected = expected_rows,
                found = table.row_count(),
                "row count differs from first file, aligning by position"
            );
            notes.push(MergeNote::RowCountMismatch {
                file: file_name,
                expected: expected_rows,
                found: table.row_count(),
            });
        }
    }

    MergeResult {
        table: result,
        notes,
    }
}

/// Return `name`, or `name_2`, `name_3`, ... if it is already used in `table`
fn unique_column_name(table: &Table, name: &str) -> String {
    if table.find_column(name).is_none() {
        return name.to_string();
    }
    (2..)
        .map(|k| format!("{}_{}", name, k))
        .find(|candidate| table.find_column(candidate).is_none())
        .unwrap_or_else(|| name.to_string())
}

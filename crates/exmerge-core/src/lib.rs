//! exmerge-core: Core library for merging per-exercise CSV measurements
//!
//! This library provides functionality to:
//! - Discover class folders and their CSV files under a root directory
//! - Sort exercise files naturally and read exercise numbers from file names
//! - Load CSV files tolerantly, skipping unreadable ones with a warning
//! - Join each class's tables side by side on the time/channel axis
//! - Write one merged CSV per class and summarize the run

pub mod config;
pub mod error;
pub mod merger;
pub mod naming;
pub mod parser;
pub mod processor;
pub mod runner;
pub mod scanner;
pub mod table;
pub mod writer;

pub use config::{MergerConfig, DEFAULT_OUTPUT_DIR};
pub use error::{Error, Result};
pub use merger::{column_suffix, merge_tables, MergeNote, MergeResult};
pub use naming::{ex_label, extract_ex_number, find_matching_column, natural_sort_files, Role};
pub use parser::{parse_csv, parse_csv_str, read_csv_safely, LoadOutcome};
pub use processor::{process_class, ClassMetadata, ClassResult, FileInfo};
pub use runner::{CsvMerger, RunSummary};
pub use scanner::{
    list_class_files, list_classes, scan_class, scan_class_or_empty, scan_directory, ClassFolder,
    ExerciseFile,
};
pub use table::{CellValue, Column, Row, Table};
pub use writer::{output_file_name, write_csv};

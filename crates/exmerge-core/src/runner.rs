//! Run orchestrator: every class under the root, one output file per class

use crate::config::MergerConfig;
use crate::error::{Error, Result};
use crate::naming::file_name_lossy;
use crate::processor::{process_class, ClassMetadata};
use crate::scanner::{list_classes, scan_class_or_empty, validate_root};
use crate::writer::{output_file_name, write_csv};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Directory merged tables were written to
    pub output_dir: PathBuf,
    /// Per-class results, in processing order
    pub classes: Vec<ClassMetadata>,
    /// Output files written
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    /// Save the summary as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Merges the CSV files of every class folder under a root directory
#[derive(Debug, Clone)]
pub struct CsvMerger {
    config: MergerConfig,
}

impl CsvMerger {
    /// Create a merger for `root`, writing to the default output directory.
    ///
    /// Fails with `RootNotFound` or `RootNotADirectory` before any folder is
    /// touched.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::from_config(MergerConfig::new(root.as_ref()))
    }

    /// Create a merger from a full config
    pub fn from_config(config: MergerConfig) -> Result<Self> {
        validate_root(&config.root)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// Class folders in discovery order
    pub fn class_folders(&self) -> Result<Vec<PathBuf>> {
        list_classes(&self.config.root)
    }

    /// Merge every class and write `<class>_merged.csv` for each non-empty
    /// result into `output_dir` (or the configured default).
    ///
    /// Only failing to create the output directory is fatal; class-level
    /// problems end up in the summary.
    pub fn run(&self, output_dir: Option<&Path>) -> Result<RunSummary> {
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.output_dir.clone());

        fs::create_dir_all(&output_dir).map_err(|e| Error::OutputWrite {
            path: output_dir.clone(),
            source: e,
        })?;

        info!(root = %self.config.root.display(), output = %output_dir.display(), "starting CSV merger");

        let mut summary = RunSummary {
            started_at: Utc::now(),
            root: self.config.root.clone(),
            output_dir: output_dir.clone(),
            classes: Vec::new(),
            written: Vec::new(),
        };

        let mut folders = match self.class_folders() {
            Ok(folders) => folders,
            Err(e) => {
                warn!(root = %self.config.root.display(), error = %e, "failed to list class folders");
                Vec::new()
            }
        };
        if folders.is_empty() {
            warn!(root = %self.config.root.display(), "no class folders found");
            return Ok(summary);
        }

        let names: Vec<String> = folders.iter().map(|f| file_name_lossy(f)).collect();
        info!(count = folders.len(), classes = ?names, "found classes");

        folders.sort();
        for folder in folders {
            let class = scan_class_or_empty(&folder);
            let result = process_class(&class);

            if !result.merged.is_empty() {
                let path = output_dir.join(output_file_name(&result.metadata.class));
                match write_csv(&result.merged, &path) {
                    Ok(path) => {
                        info!(path = %path.display(), "saved");
                        summary.written.push(path);
                    }
                    Err(e) => warn!(class = %result.metadata.class, error = %e, "failed to save"),
                }
            }

            summary.classes.push(result.metadata);
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv;
    use crate::table::CellValue;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_new_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvMerger::new(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::RootNotFound(_)));
    }

    #[test]
    fn test_new_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("root.csv");
        write(&file, "Channel\n");

        let err = CsvMerger::new(&file).unwrap_err();
        assert!(matches!(err, Error::RootNotADirectory(_)));
    }

    #[test]
    fn test_run_writes_one_file_per_class() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let root = data.path();

        write(&root.join("squat/Ex1.csv"), "Channel,X,Y,Z\n0,0.5,1.5,2.5\n1,0.25,1.25,2.25\n");
        write(&root.join("squat/Ex10.csv"), "Channel,X,Y,Z\n0,9,9,9\n1,8,8,8\n");
        write(&root.join("squat/Ex2.csv"), "Channel,X,Y,Z\n0,3,4,5\n1,6,7,8\n");
        write(&root.join("lunge/Ex1.csv"), "Time,X\n0,1\n");
        fs::create_dir_all(root.join("plank")).unwrap();

        let merger = CsvMerger::new(root).unwrap();
        let summary = merger.run(Some(out.path())).unwrap();

        let classes: Vec<&str> = summary.classes.iter().map(|c| c.class.as_str()).collect();
        assert_eq!(classes, vec!["lunge", "plank", "squat"]);
        assert_eq!(summary.written, vec![out.path().join("squat_merged.csv")]);
        assert!(!out.path().join("lunge_merged.csv").exists());

        let merged = parse_csv(out.path().join("squat_merged.csv")).unwrap();
        assert_eq!(
            merged.column_names(),
            vec![
                "Channel", "X", "Y", "Z", "X_Ex2", "Y_Ex2", "Z_Ex2", "X_Ex10", "Y_Ex10", "Z_Ex10"
            ]
        );
        assert_eq!(merged.row_count(), 2);
        assert_eq!(merged.rows[1].cells[1], CellValue::Float(0.25));
        assert_eq!(merged.rows[1].cells[9], CellValue::Integer(8));

        let squat = &summary.classes[2];
        assert_eq!(squat.total_rows, merged.row_count());
        assert_eq!(squat.total_columns, merged.column_count());
    }

    #[test]
    fn test_run_uses_configured_output_dir() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&data.path().join("squat/Ex1.csv"), "Channel,X\n0,1\n");

        let target = out.path().join("nested/merged");
        let config = MergerConfig::new(data.path()).with_output_dir(&target);
        let summary = CsvMerger::from_config(config).unwrap().run(None).unwrap();

        assert_eq!(summary.output_dir, target);
        assert!(target.join("squat_merged.csv").exists());
    }

    #[test]
    fn test_run_with_no_classes() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let summary = CsvMerger::new(data.path()).unwrap().run(Some(out.path())).unwrap();

        assert!(summary.classes.is_empty());
        assert!(summary.written.is_empty());
    }

    #[test]
    fn test_summary_serializes() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(&data.path().join("squat/Ex1.csv"), "Channel,X\n0,1\n");

        let summary = CsvMerger::new(data.path()).unwrap().run(Some(out.path())).unwrap();
        let json_path = out.path().join("summary.json");
        summary.save(&json_path).unwrap();

        let loaded: RunSummary =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(loaded.classes.len(), 1);
        assert_eq!(loaded.classes[0].files[0].ex_number, Some(1));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_survives_dangling_links() {
        use std::os::unix::fs::symlink;

        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let root = data.path();

        write(&root.join("squat/Ex1.csv"), "Channel,X\n0,1\n1,2\n");
        write(&root.join("squat/Ex2.csv"), "Channel,X\n0,3\n1,4\n");
        symlink(root.join("squat/gone.csv"), root.join("squat/Ex3.csv")).unwrap();
        symlink(root.join("missing"), root.join("broken")).unwrap();

        let summary = CsvMerger::new(root).unwrap().run(Some(out.path())).unwrap();

        assert_eq!(summary.classes.len(), 1);
        let squat = &summary.classes[0];
        assert_eq!(squat.files.len(), 2);
        assert_eq!(squat.skipped, vec!["Ex3.csv".to_string()]);
        assert_eq!(squat.total_columns, 3);
        assert_eq!(summary.written, vec![out.path().join("squat_merged.csv")]);
    }
}

//! Directory scanner for discovering class folders and their CSV files
//!
//! Layout is fixed at two levels: `root/<class>/<*.csv>`. Anything deeper
//! is ignored.

use crate::error::{Error, Result};
use crate::naming::{extract_ex_number, file_name_lossy, natural_sort_files};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A class folder and its naturally sorted exercise files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassFolder {
    /// Folder name, used as the class name
    pub name: String,
    /// Full path to the folder
    pub path: PathBuf,
    /// CSV files in natural order
    pub files: Vec<ExerciseFile>,
}

/// One CSV file inside a class folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name without directory
    pub name: String,
    /// Exercise number parsed from the name, if any
    pub ex_number: Option<u64>,
}

impl ExerciseFile {
    fn from_path(path: PathBuf) -> Self {
        let name = file_name_lossy(&path);
        let ex_number = extract_ex_number(&name);
        Self {
            path,
            name,
            ex_number,
        }
    }
}

/// Check that `root` exists and is a directory
pub fn validate_root<P: AsRef<Path>>(root: P) -> Result<PathBuf> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::RootNotADirectory(root.to_path_buf()));
    }
    Ok(root.to_path_buf())
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "csv")
}

/// List the immediate subdirectories of `root`, in discovery order.
///
/// Entries that cannot be inspected (dangling links, permission errors) are
/// skipped with a warning; only failing to read `root` itself is an error.
pub fn list_classes<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let root = validate_root(root)?;

    let mut classes = Vec::new();
    for entry in WalkDir::new(&root).min_depth(1).max_depth(1).follow_links(true) {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => classes.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                warn!(entry = %path, error = %e, "skipping unreadable entry in root");
            }
        }
    }

    Ok(classes)
}

/// List the `.csv` files directly inside a class folder, naturally sorted
pub fn list_class_files<P: AsRef<Path>>(class_folder: P) -> Result<Vec<PathBuf>> {
    let class_folder = class_folder.as_ref();
    if !class_folder.is_dir() {
        return Err(Error::DirectoryRead {
            path: class_folder.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(class_folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_csv_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => match e.path() {
                // Keep it: loading reports the failure as a skipped file.
                Some(path) if has_csv_extension(path) => files.push(path.to_path_buf()),
                path => {
                    let path = path.map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(entry = %path, error = %e, "skipping unreadable entry");
                }
            },
        }
    }

    Ok(natural_sort_files(files))
}

/// Scan one class folder into a [`ClassFolder`]
pub fn scan_class<P: AsRef<Path>>(class_folder: P) -> Result<ClassFolder> {
    let path = class_folder.as_ref().to_path_buf();
    let files = list_class_files(&path)?
        .into_iter()
        .map(ExerciseFile::from_path)
        .collect();

    Ok(ClassFolder {
        name: file_name_lossy(&path),
        path,
        files,
    })
}

/// Scan one class folder, falling back to a class with no files when the
/// folder cannot be listed
pub fn scan_class_or_empty<P: AsRef<Path>>(class_folder: P) -> ClassFolder {
    let path = class_folder.as_ref();
    scan_class(path).unwrap_or_else(|e| {
        warn!(class = %path.display(), error = %e, "failed to list class folder");
        ClassFolder {
            name: file_name_lossy(path),
            path: path.to_path_buf(),
            files: Vec::new(),
        }
    })
}

/// Scan every class under `root`, sorted alphabetically by class name.
///
/// A class folder that cannot be listed is kept with no files.
pub fn scan_directory<P: AsRef<Path>>(root: P) -> Result<Vec<ClassFolder>> {
    let mut classes: Vec<ClassFolder> = list_classes(root)?
        .into_iter()
        .map(scan_class_or_empty)
        .collect();

    classes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(classes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, "Channel,X\n0,1\n").unwrap();
    }

    #[test]
    fn test_validate_root_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_root(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::RootNotFound(_)));
    }

    #[test]
    fn test_validate_root_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.csv");
        touch(&file);

        let err = validate_root(&file).unwrap_err();
        assert!(matches!(err, Error::RootNotADirectory(_)));
    }

    #[test]
    fn test_list_classes_only_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("squat")).unwrap();
        fs::create_dir(dir.path().join("lunge")).unwrap();
        touch(&dir.path().join("stray.csv"));

        let mut names: Vec<String> = list_classes(dir.path())
            .unwrap()
            .iter()
            .map(|p| file_name_lossy(p))
            .collect();
        names.sort();
        assert_eq!(names, vec!["lunge", "squat"]);
    }

    #[test]
    fn test_list_class_files_natural_order_and_depth() {
        let dir = tempfile::tempdir().unwrap();
        let class = dir.path().join("squat");
        fs::create_dir_all(class.join("nested")).unwrap();
        touch(&class.join("Ex10.csv"));
        touch(&class.join("Ex2.csv"));
        touch(&class.join("Ex1.csv"));
        touch(&class.join("notes.txt"));
        touch(&class.join("nested").join("Ex3.csv"));

        let names: Vec<String> = list_class_files(&class)
            .unwrap()
            .iter()
            .map(|p| file_name_lossy(p))
            .collect();
        assert_eq!(names, vec!["Ex1.csv", "Ex2.csv", "Ex10.csv"]);
    }

    #[test]
    fn test_scan_directory_sorted_with_ex_numbers() {
        let dir = tempfile::tempdir().unwrap();
        for class in ["b_class", "a_class"] {
            fs::create_dir(dir.path().join(class)).unwrap();
        }
        touch(&dir.path().join("a_class").join("Ex4_run.csv"));
        touch(&dir.path().join("a_class").join("baseline.csv"));

        let classes = scan_directory(dir.path()).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "a_class");
        assert_eq!(classes[1].name, "b_class");
        assert!(classes[1].files.is_empty());

        let ex: Vec<Option<u64>> = classes[0].files.iter().map(|f| f.ex_number).collect();
        assert_eq!(ex, vec![None, Some(4)]);
    }

    #[test]
    fn test_scan_class_or_empty_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let class = scan_class_or_empty(dir.path().join("vanished"));

        assert_eq!(class.name, "vanished");
        assert!(class.files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_list_class_files_keeps_dangling_csv() {
        let dir = tempfile::tempdir().unwrap();
        let class = dir.path().join("squat");
        fs::create_dir(&class).unwrap();
        touch(&class.join("Ex1.csv"));
        touch(&class.join("Ex2.csv"));
        std::os::unix::fs::symlink(class.join("gone.csv"), class.join("Ex3.csv")).unwrap();
        std::os::unix::fs::symlink(class.join("gone.txt"), class.join("notes.txt")).unwrap();

        let names: Vec<String> = list_class_files(&class)
            .unwrap()
            .iter()
            .map(|p| file_name_lossy(p))
            .collect();
        assert_eq!(names, vec!["Ex1.csv", "Ex2.csv", "Ex3.csv"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_directory_skips_dangling_root_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("squat")).unwrap();
        touch(&dir.path().join("squat").join("Ex1.csv"));
        std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("broken")).unwrap();

        let classes = scan_directory(dir.path()).unwrap();

        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "squat");
        assert_eq!(classes[0].files.len(), 1);
    }
}

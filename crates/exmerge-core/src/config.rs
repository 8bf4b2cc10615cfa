//! Run configuration, loadable from JSON

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output directory used when none is configured, relative to the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Where to read classes from and where to write merged tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergerConfig {
    /// Directory whose subdirectories are classes
    pub root: PathBuf,
    /// Directory receiving `<class>_merged.csv` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl MergerConfig {
    /// Config for `root` with the default output directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output_dir: default_output_dir(),
        }
    }

    /// Replace the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Load a config from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_defaults_when_omitted() {
        let config: MergerConfig = serde_json::from_str(r#"{"root": "data"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("data"));
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exmerge.json");
        let config = MergerConfig::new("data").with_output_dir("merged");

        config.save(&path).unwrap();
        let loaded = MergerConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MergerConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}

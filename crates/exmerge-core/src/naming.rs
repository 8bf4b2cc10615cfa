//! Filename and column-name utilities
//!
//! Pure helpers shared by discovery and merging:
//! - natural (numeric-aware) ordering of file paths
//! - exercise-number extraction from file names
//! - fuzzy, case-insensitive column role matching

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::debug;

static EX_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)ex(\d+)").expect("valid regex"));

/// Semantic kind of a column sought in a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The shared time/channel axis
    Channel,
    X,
    Y,
    Z,
}

impl Role {
    /// Axis roles copied from every subsequent file
    pub const AXES: [Role; 3] = [Role::X, Role::Y, Role::Z];

    /// Lowercase keyword a column name must contain to fill this role
    pub fn keyword(self) -> &'static str {
        match self {
            Role::Channel => "channel",
            Role::X => "x",
            Role::Y => "y",
            Role::Z => "z",
        }
    }

    /// Prefix for renamed axis columns in the merged table
    pub fn label(self) -> &'static str {
        match self {
            Role::Channel => "Channel",
            Role::X => "X",
            Role::Y => "Y",
            Role::Z => "Z",
        }
    }
}

/// One piece of a natural-sort key
#[derive(Debug, PartialEq, Eq)]
enum Chunk {
    /// Digits with leading zeros stripped
    Number(String),
    Text(String),
}

impl Ord for Chunk {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Shorter digit run is the smaller number; equal length compares lexically.
            (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Greater,
            (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Chunk {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into alternating text and number chunks.
///
/// Text is lowercased; numbers are kept as digit strings so that arbitrarily
/// long runs compare correctly without overflow.
fn natural_key(name: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    for c in name.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            chunks.push(finish_chunk(std::mem::take(&mut current), in_digits));
        }
        in_digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        chunks.push(finish_chunk(current, in_digits));
    }

    chunks
}

fn finish_chunk(raw: String, digits: bool) -> Chunk {
    if digits {
        let trimmed = raw.trim_start_matches('0');
        Chunk::Number(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
    } else {
        Chunk::Text(raw.to_lowercase())
    }
}

/// Compare two names in natural order ("ex2" < "ex10")
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sort file paths by natural order of their file names.
///
/// The sort is stable, so paths with identical keys keep their input order.
pub fn natural_sort_files(mut files: Vec<PathBuf>) -> Vec<PathBuf> {
    files.sort_by_cached_key(|p| natural_key(&file_name_lossy(p)));
    files
}

/// Extract the exercise number from a file name.
///
/// Examples:
/// - "Ex3_data.csv" -> Some(3)
/// - "session_ex12.csv" -> Some(12)
/// - "baseline.csv" -> None
///
/// A digit run too large for `u64` counts as no number.
pub fn extract_ex_number(file_name: &str) -> Option<u64> {
    let digits = EX_NUMBER.captures(file_name)?.get(1)?.as_str();
    match digits.parse() {
        Ok(n) => Some(n),
        Err(e) => {
            debug!(file = %file_name, digits = %digits, error = %e, "exercise number out of range");
            None
        }
    }
}

/// Display label for a file's exercise number ("Ex3" or "Unknown")
pub fn ex_label(ex_number: Option<u64>) -> String {
    match ex_number {
        Some(n) => format!("Ex{}", n),
        None => "Unknown".to_string(),
    }
}

/// Find the first column whose lowercase name contains the role keyword
pub fn find_matching_column<'a, I, S>(role: Role, columns: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let keyword = role.keyword();
    columns
        .into_iter()
        .map(<S as AsRef<str>>::as_ref)
        .find(|name| name.to_lowercase().contains(keyword))
}

pub(crate) fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

//! Directory scanning.
//!
//! Lists the regular files directly inside a directory and classifies each
//! one with [`CategoryRules`]. Scanning never modifies the filesystem.

use crate::category::{self, CategoryRules};
use crate::config::CompiledFilters;
use crate::stats::{self, CategoryCounts};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while scanning a directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The specified path does not exist
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The specified path is not a directory
    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Permission denied when listing the directory
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },

    /// Any other I/O error while reading the directory
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Io { path, source },
        }
    }
}

/// A classified file found by the scanner.
///
/// Fields are private so a record cannot be re-categorized after the fact;
/// use the accessors to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFile {
    path: PathBuf,
    name: String,
    extension: String,
    category: String,
}

impl ScannedFile {
    /// Classifies the file at `path`. Returns `None` if the path has no
    /// final file name component.
    pub fn classify(path: impl Into<PathBuf>, rules: &CategoryRules) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_string_lossy().into_owned();
        let extension = category::extension_of(&name);
        let category = rules.category_for_extension(&extension).to_string();
        Some(Self {
            path,
            name,
            extension,
            category,
        })
    }

    /// Full path to the file as seen during the scan.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name, lossily converted for display and classification.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base file name exactly as stored on disk.
    pub fn file_name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&self.name))
    }

    /// Lowercase extension including the dot, or empty.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// The files found in one directory plus their per-category counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub files: Vec<ScannedFile>,
    pub category_counts: CategoryCounts,
    pub total: usize,
}

impl ScanResult {
    /// Builds a result from already-classified files, computing the counts.
    pub fn from_files(files: Vec<ScannedFile>) -> Self {
        let summary = stats::aggregate(&files);
        Self {
            files,
            category_counts: summary.category_counts,
            total: summary.total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lists and classifies files in a single directory.
pub struct Scanner<'a> {
    rules: &'a CategoryRules,
    filters: &'a CompiledFilters,
}

impl<'a> Scanner<'a> {
    pub fn new(rules: &'a CategoryRules, filters: &'a CompiledFilters) -> Self {
        Self { rules, filters }
    }

    /// Scans the direct entries of `dir`.
    ///
    /// Only regular files are returned; directories and symlinks are
    /// skipped, as are files rejected by the filters. Files are sorted by
    /// name so repeated scans of an unchanged directory agree.
    ///
    /// # Errors
    ///
    /// Returns a `ScanError` if `dir` is missing, is not a directory, or
    /// cannot be listed. No partial result is returned.
    pub fn scan(&self, dir: &Path) -> Result<ScanResult, ScanError> {
        let metadata = fs::metadata(dir).map_err(|e| ScanError::from_io(dir, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|e| ScanError::from_io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScanError::from_io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| ScanError::from_io(dir, e))?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.filters.should_include(&name) {
                tracing::debug!(file = %name, "skipping filtered file");
                continue;
            }

            if let Some(file) = ScannedFile::classify(entry.path(), self.rules) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));

        let result = ScanResult::from_files(files);
        tracing::info!(
            dir = %dir.display(),
            total = result.total,
            categories = result.category_counts.len(),
            "scan complete"
        );
        Ok(result)
    }
}

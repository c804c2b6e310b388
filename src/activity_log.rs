//! Persistent plain-text record of cleanup sessions.
//!
//! Each cleanup appends one session block to the log file: a header with the
//! session time, one entry per file, and a summary line. The `logs`
//! operation reads back the tail of this file.

use crate::organizer::FileOutcome;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of trailing lines returned by [`read_recent`] by default.
pub const DEFAULT_TAIL_LINES: usize = 100;

const RULE: &str = "============================================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors from reading or writing the activity log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to write log file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read log file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Final status of a logged file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Success,
    Failed,
}

impl EntryStatus {
    fn label(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

/// One logged file operation.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub category: String,
    pub status: EntryStatus,
    pub error: Option<String>,
}

impl LogEntry {
    /// Builds an entry from an organizer outcome, stamped with the current time.
    pub fn from_outcome(outcome: &FileOutcome) -> Self {
        match outcome {
            FileOutcome::Moved(moved) => Self {
                timestamp: Local::now(),
                source: moved.source.clone(),
                destination: Some(moved.destination.clone()),
                category: moved.category.clone(),
                status: EntryStatus::Success,
                error: None,
            },
            FileOutcome::Failed {
                failure,
                category,
                detail,
            } => Self {
                timestamp: Local::now(),
                source: failure.path.clone(),
                destination: None,
                category: category.clone(),
                status: EntryStatus::Failed,
                error: Some(format!("{}: {}", failure.reason, detail)),
            },
        }
    }
}

/// The entries of one cleanup session.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    pub started: DateTime<Local>,
    pub entries: Vec<LogEntry>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self {
            started: Local::now(),
            entries: Vec::new(),
        }
    }

    /// Records the final state of one file.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.entries.push(LogEntry::from_outcome(outcome));
    }

    pub fn moved(&self) -> usize {
        self.count(EntryStatus::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(EntryStatus::Failed)
    }

    fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Renders the session block that gets appended to the log file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "\n{}", RULE);
        let _ = writeln!(
            out,
            "Cleanup Session: {}",
            self.started.format(TIMESTAMP_FORMAT)
        );
        let _ = writeln!(out, "{}\n", RULE);

        for entry in &self.entries {
            let _ = writeln!(
                out,
                "[{}] {}",
                entry.timestamp.format(TIMESTAMP_FORMAT),
                entry.status.label()
            );
            let _ = writeln!(out, "  Source: {}", entry.source.display());
            if let Some(destination) = &entry.destination {
                let _ = writeln!(out, "  Destination: {}", destination.display());
            }
            if !entry.category.is_empty() {
                let _ = writeln!(out, "  Category: {}", entry.category);
            }
            if let Some(error) = &entry.error {
                let _ = writeln!(out, "  Error: {}", error);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "\nSummary:");
        let _ = writeln!(
            out,
            "  Total: {}, Moved: {}, Failed: {}",
            self.entries.len(),
            self.moved(),
            self.failed()
        );
        let _ = writeln!(out, "{}", RULE);
        out
    }

    /// Appends this session to `log_path`, creating the file and its parent
    /// directories if needed.
    pub fn append_to(&self, log_path: &Path) -> Result<(), LogError> {
        let write_err = |source| LogError::Write {
            path: log_path.to_path_buf(),
            source,
        };

        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(write_err)?;
        file.write_all(self.render().as_bytes()).map_err(write_err)?;

        tracing::debug!(path = %log_path.display(), entries = self.entries.len(), "appended activity log");
        Ok(())
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the last `max_lines` lines of the log file.
///
/// A missing log file is not an error: nothing has been logged yet, so an
/// empty string is returned.
pub fn read_recent(log_path: &Path, max_lines: usize) -> Result<String, LogError> {
    let content = match fs::read_to_string(log_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
        Err(source) => {
            return Err(LogError::Read {
                path: log_path.to_path_buf(),
                source,
            });
        }
    };

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    let mut tail = lines[start..].join("\n");
    if !tail.is_empty() {
        tail.push('\n');
    }
    Ok(tail)
}

//! Request/response boundary over the engine.
//!
//! Every operation returns a serializable response with a `success` flag.
//! On failure the response carries an `error` message and none of the data
//! fields, so callers never see partial results. Nothing here keeps state
//! between calls: a scan result is handed back by the caller to `cleanup`.

use crate::activity_log::{self, ActivityLog, DEFAULT_TAIL_LINES};
use crate::config::AppConfig;
use crate::organizer::{FileFailure, FileOutcome, Organizer, PlannedMove};
use crate::scanner::{ScannedFile, Scanner};
use crate::stats::CategoryCounts;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of `scan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ScannedFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResponse {
    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            files: None,
            categories: None,
            total: None,
            error: Some(error.to_string()),
        }
    }
}

/// Moved/failed counts of a cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupSummary {
    pub moved: usize,
    pub failed: usize,
}

/// Result of `cleanup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<CleanupSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<FileFailure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Vec<PlannedMove>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of reading the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AppConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of operations that return no data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of `logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Scans `target` (or the configured source directory) and classifies its files.
pub fn scan(config: &AppConfig, target: Option<&Path>) -> ScanResponse {
    let (rules, filters) = match config
        .category_rules()
        .and_then(|rules| Ok((rules, config.compile_filters()?)))
    {
        Ok(compiled) => compiled,
        Err(e) => return ScanResponse::failure(e),
    };

    let dir = target.map_or_else(|| config.source_dir(), Path::to_path_buf);
    match Scanner::new(&rules, &filters).scan(&dir) {
        Ok(result) => ScanResponse {
            success: true,
            total: Some(result.total),
            categories: Some(result.category_counts),
            files: Some(result.files),
            error: None,
        },
        Err(e) => {
            tracing::error!(dir = %dir.display(), error = %e, "scan failed");
            ScanResponse::failure(e)
        }
    }
}

/// Shows where each file would be moved, without moving anything.
pub fn preview(
    config: &AppConfig,
    files: &[ScannedFile],
    destination_root: Option<&Path>,
) -> PreviewResponse {
    let root = destination_root.map_or_else(|| config.destination_root(), Path::to_path_buf);
    PreviewResponse {
        success: true,
        preview: Some(Organizer::plan(files, &root)),
        error: None,
    }
}

/// Moves `files` into category folders and appends the session to the log file.
///
/// The response is successful whenever the batch ran, even if individual
/// files failed; those are listed in `failures`. A log write failure is
/// reported as a warning and does not fail the call.
pub fn cleanup(
    config: &AppConfig,
    files: &[ScannedFile],
    destination_root: Option<&Path>,
) -> CleanupResponse {
    cleanup_with(config, files, destination_root, |_, _| {})
}

/// Like [`cleanup`], calling `on_file` as each file reaches its final state.
pub fn cleanup_with<F>(
    config: &AppConfig,
    files: &[ScannedFile],
    destination_root: Option<&Path>,
    mut on_file: F,
) -> CleanupResponse
where
    F: FnMut(&ScannedFile, &FileOutcome),
{
    let root = destination_root.map_or_else(|| config.destination_root(), Path::to_path_buf);
    let organizer = Organizer::new(config.on_collision);
    let mut log = ActivityLog::new();

    let result = organizer.cleanup_with(files, &root, |file, outcome| {
        log.record(outcome);
        on_file(file, outcome);
    });
    match result {
        Ok(outcome) => {
            if !files.is_empty()
                && let Err(e) = log.append_to(&config.log_path())
            {
                tracing::warn!(error = %e, "could not write activity log");
            }
            CleanupResponse {
                success: true,
                summary: Some(CleanupSummary {
                    moved: outcome.moved_count,
                    failed: outcome.failed_count,
                }),
                failures: Some(outcome.failures),
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(root = %root.display(), error = %e, "cleanup aborted");
            CleanupResponse {
                success: false,
                summary: None,
                failures: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Loads the configuration the application would use.
pub fn get_config(config_path: Option<&Path>) -> ConfigResponse {
    match AppConfig::load(config_path) {
        Ok(config) => ConfigResponse {
            success: true,
            config: Some(config),
            error: None,
        },
        Err(e) => ConfigResponse {
            success: false,
            config: None,
            error: Some(e.to_string()),
        },
    }
}

/// Validates `new_config` and writes it to `config_path`.
pub fn save_config(config_path: &Path, new_config: &AppConfig) -> StatusResponse {
    match new_config.save(config_path) {
        Ok(()) => StatusResponse {
            success: true,
            error: None,
        },
        Err(e) => StatusResponse {
            success: false,
            error: Some(e.to_string()),
        },
    }
}

/// Returns the most recent lines of the activity log.
pub fn logs(config: &AppConfig) -> LogsResponse {
    match activity_log::read_recent(&config.log_path(), DEFAULT_TAIL_LINES) {
        Ok(logs) => LogsResponse {
            success: true,
            logs: Some(logs),
            error: None,
        },
        Err(e) => LogsResponse {
            success: false,
            logs: None,
            error: Some(e.to_string()),
        },
    }
}

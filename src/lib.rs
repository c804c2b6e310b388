//! deskclean - sort the loose files of a directory into category folders
//!
//! This library classifies files by extension, scans a single directory level,
//! moves the files into per-category folders under a destination root, and
//! reports per-category counts. Category mappings and file filters are loaded
//! from TOML configuration files.

pub mod activity_log;
pub mod api;
pub mod category;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod scanner;
pub mod stats;

pub use activity_log::{ActivityLog, LogError};
pub use category::CategoryRules;
pub use config::{AppConfig, CompiledFilters, ConfigError, FilterRules};
pub use organizer::{
    CleanupError, CleanupOutcome, CollisionPolicy, FailureReason, FileFailure, FileOutcome,
    Organizer,
};
pub use scanner::{ScanError, ScanResult, ScannedFile, Scanner};
pub use stats::{CategoryCounts, CategoryStats, aggregate};

pub use cli::{Cli, run};

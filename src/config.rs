//! Configuration loading, saving and validation.
//!
//! The configuration is a TOML file describing where to scan, where to put
//! organized files, how to categorize them and which files to leave alone.
//!
//! # Configuration File Format
//!
//! ```toml
//! source_path = "~/Desktop"
//! target_base_path = "~/Desktop/Organized"
//! log_file = "~/Desktop/Organized/cleanup_log.txt"
//! fallback_category = "Others"
//! on_collision = "reject"
//!
//! [categories]
//! Documents = [".pdf", ".docx", ".txt"]
//! Images = [".jpg", ".png"]
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["desktop.ini", ".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp"]
//! extensions = ["bak"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::category::{self, CategoryRules, DEFAULT_FALLBACK_CATEGORY};
use crate::organizer::CollisionPolicy;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".deskcleanrc.toml";

/// Errors that can occur while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid TOML syntax or structure.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Two categories claim the same extension.
    #[error("extension '{extension}' is mapped to both '{first}' and '{second}'")]
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },

    /// A category name that cannot be used as a folder name.
    #[error("invalid category name '{0}': must be a single folder name")]
    InvalidCategory(String),

    /// A blank extension inside a category list.
    #[error("category '{category}' contains an empty extension")]
    EmptyExtension { category: String },

    /// Invalid glob pattern provided.
    #[error("invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),

    /// Invalid regex pattern provided with the actual error reason.
    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    /// IO error while reading or writing configuration.
    #[error("I/O error on configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory that gets scanned.
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Root under which category folders are created.
    #[serde(default = "default_target_base_path")]
    pub target_base_path: PathBuf,

    /// Plain-text activity log appended after each cleanup.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Category assigned to files whose extension has no rule.
    #[serde(default = "default_fallback_category")]
    pub fallback_category: String,

    /// What to do when the destination file already exists.
    #[serde(default)]
    pub on_collision: CollisionPolicy,

    /// Category name to list of extensions.
    #[serde(default = "category::default_category_table")]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Which directory entries the scanner ignores.
    #[serde(default)]
    pub filters: FilterRules,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("~/Desktop")
}

fn default_target_base_path() -> PathBuf {
    PathBuf::from("~/Desktop/Organized")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("~/Desktop/Organized/cleanup_log.txt")
}

fn default_fallback_category() -> String {
    DEFAULT_FALLBACK_CATEGORY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            target_base_path: default_target_base_path(),
            log_file: default_log_file(),
            fallback_category: default_fallback_category(),
            on_collision: CollisionPolicy::default(),
            categories: category::default_category_table(),
            filters: FilterRules::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.deskcleanrc.toml` in the current directory
    /// 3. Look for `~/.config/deskclean/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be read
    /// or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::locate(config_path) {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Returns the file `load` would read, if any.
    ///
    /// An explicit path is always returned, even if it does not exist yet.
    pub fn locate(config_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.to_path_buf());
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = Self::user_config_path()?;
        home_config.exists().then_some(home_config)
    }

    /// `$HOME/.config/deskclean/config.toml`, if `HOME` is set.
    pub fn user_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("deskclean")
                .join("config.toml")
        })
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing or validation fails.
    /// Returns `ConfigError::Io` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), categories = config.categories.len(), "loaded configuration");
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes this configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validates and writes this configuration to `path`, creating parent
    /// directories as needed. Nothing is written if validation fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let content = self.to_toml()?;

        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)?;

        tracing::info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Checks the category table and filter patterns without keeping the
    /// compiled forms.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.category_rules()?;
        self.compile_filters()?;
        Ok(())
    }

    /// Builds the extension lookup rules from the category table.
    pub fn category_rules(&self) -> Result<CategoryRules, ConfigError> {
        CategoryRules::from_table(&self.categories, &self.fallback_category)
    }

    /// Compiles the filter rules for the scanner.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }

    /// `source_path` with `~` expanded.
    pub fn source_dir(&self) -> PathBuf {
        expand_home(&self.source_path)
    }

    /// `target_base_path` with `~` expanded.
    pub fn destination_root(&self) -> PathBuf {
        expand_home(&self.target_base_path)
    }

    /// `log_file` with `~` expanded.
    pub fn log_path(&self) -> PathBuf {
        expand_home(&self.log_file)
    }
}

/// Expands a leading `~` to `$HOME`. Paths are returned unchanged when
/// they do not start with `~` or `HOME` is unset.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Rules deciding which directory entries the scanner considers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to false.
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                filenames: ["desktop.ini", ".DS_Store", "thumbs.db", "Thumbs.db"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ..Default::default()
            },
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (system files such as "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g. "*.tmp").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, with or without the dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Compiled filter structures for matching file names.
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| category::normalize_extension(ext))
                .collect(),
            exclude_patterns: compile_globs(rules.exclude.patterns.as_slice())?,
            exclude_regexes,
            include_patterns: compile_globs(rules.include.patterns.as_slice())?,
        })
    }

    /// A filter set that accepts every file.
    pub fn allow_all() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }

    /// Check if a file should be scanned.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        let ext = category::extension_of(file_name);
        if !ext.is_empty() && self.exclude_extensions.contains(&ext) {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|re| re.is_match(file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        // The default rules contain only literal names, so compilation cannot fail.
        Self::new(&FilterRules::default()).unwrap_or_else(|_| Self::allow_all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filters_with(exclude: ExcludeRules) -> CompiledFilters {
        CompiledFilters::new(&FilterRules {
            enable_hidden_files: true,
            exclude,
            include: IncludeRules::default(),
        })
        .unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fallback_category, "Others");
        assert_eq!(config.on_collision, CollisionPolicy::Reject);
    }

    #[test]
    fn test_default_filters_skip_hidden_and_system_files() {
        let compiled = CompiledFilters::default();

        assert!(!compiled.should_include(".DS_Store"));
        assert!(!compiled.should_include(".hidden.txt"));
        assert!(!compiled.should_include("desktop.ini"));
        assert!(!compiled.should_include("Thumbs.db"));
        assert!(compiled.should_include("photo.jpg"));
    }

    #[test]
    fn test_hidden_file_included_when_enabled() {
        let compiled = filters_with(ExcludeRules::default());
        assert!(compiled.should_include(".profile"));
    }

    #[test]
    fn test_exclude_extensions_case_insensitive() {
        let compiled = filters_with(ExcludeRules {
            extensions: vec!["bak".to_string(), ".TMP".to_string()],
            ..Default::default()
        });

        assert!(!compiled.should_include("file.bak"));
        assert!(!compiled.should_include("file.BAK"));
        assert!(!compiled.should_include("file.tmp"));
        assert!(compiled.should_include("file.txt"));
    }

    #[test]
    fn test_exclude_glob_and_regex() {
        let compiled = filters_with(ExcludeRules {
            patterns: vec!["~$*".to_string()],
            regex: vec![r"^draft_.*\.txt$".to_string()],
            ..Default::default()
        });

        assert!(!compiled.should_include("~$report.docx"));
        assert!(!compiled.should_include("draft_notes.txt"));
        assert!(compiled.should_include("notes.txt"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = CompiledFilters::new(&FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules::default(),
            include: IncludeRules {
                patterns: vec![".important".to_string()],
            },
        })
        .unwrap();

        assert!(compiled.should_include(".important"));
        assert!(!compiled.should_include(".other"));
    }

    #[test]
    fn test_invalid_patterns_return_error() {
        let bad_regex = FilterRules {
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_regex),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));

        let bad_glob = FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(&bad_glob),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            target_base_path = "/srv/sorted"

            [categories]
            Pictures = ["jpg", ".png"]
            "#,
        )
        .unwrap();

        assert_eq!(config.target_base_path, PathBuf::from("/srv/sorted"));
        assert_eq!(config.source_path, PathBuf::from("~/Desktop"));
        assert_eq!(config.categories.len(), 1);
        assert!(!config.filters.enable_hidden_files);

        let rules = config.category_rules().unwrap();
        assert_eq!(rules.classify("a.JPG"), "Pictures");
        assert_eq!(rules.classify("b.pdf"), "Others");
    }

    #[test]
    fn test_collision_policy_parses() {
        let config = AppConfig::from_toml("on_collision = \"rename\"").unwrap();
        assert_eq!(config.on_collision, CollisionPolicy::Rename);

        assert!(AppConfig::from_toml("on_collision = \"overwrite\"").is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_invalid() {
        let err = AppConfig::from_toml("categories = 12").unwrap_err();
        assert!(matches!(err, ConfigError::ConfigInvalid(_)));
    }

    #[test]
    fn test_duplicate_extension_rejected_on_load() {
        let err = AppConfig::from_toml(
            r#"
            [categories]
            A = [".txt"]
            B = [".txt"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateExtension { .. }));
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.fallback_category = "Misc".to_string();
        config.on_collision = CollisionPolicy::Rename;
        config.save(&path).expect("Failed to save config");

        let loaded = AppConfig::load(Some(&path)).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_refuses_invalid_config() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config
            .categories
            .insert("Scans".to_string(), vec![".pdf".to_string()]);

        assert!(config.save(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = AppConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        assert_eq!(expand_home(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_home(Path::new("rel/x")), PathBuf::from("rel/x"));
    }
}

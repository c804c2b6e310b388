/// Extension-based file categorization.
///
/// This module maps file extensions to category names (e.g. "Images",
/// "Documents"). Category names double as destination folder names, so the
/// mapping is validated when it is built from configuration.
///
/// # Examples
///
/// ```
/// use deskclean::category::CategoryRules;
///
/// let rules = CategoryRules::default();
/// assert_eq!(rules.classify("photo.JPG"), "Images");
/// assert_eq!(rules.classify("report.pdf"), "Documents");
/// assert_eq!(rules.classify("mystery.xyz"), "Others");
/// ```
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path};

/// Category assigned when no rule matches a file's extension.
pub const DEFAULT_FALLBACK_CATEGORY: &str = "Others";

/// The built-in category table: category name and the extensions it claims.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[".pdf", ".doc", ".docx", ".txt", ".xlsx", ".pptx", ".odt", ".rtf"],
    ),
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".ico", ".webp"],
    ),
    (
        "Videos",
        &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"],
    ),
    (
        "Audio",
        &[".mp3", ".wav", ".flac", ".aac", ".ogg", ".m4a", ".wma"],
    ),
    (
        "Archives",
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz"],
    ),
    (
        "Code",
        &[
            ".py", ".js", ".java", ".cpp", ".c", ".h", ".html", ".css", ".json", ".xml",
        ],
    ),
];

/// Returns the built-in `category -> extensions` table in config form.
pub fn default_category_table() -> BTreeMap<String, Vec<String>> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(name, exts)| {
            (
                (*name).to_string(),
                exts.iter().map(|e| (*e).to_string()).collect(),
            )
        })
        .collect()
}

/// Extracts the lowercase extension of a file name, including the leading dot.
///
/// The extension is everything from the last `.` onward. Names without a
/// dot, and dotfiles such as `.bashrc` with no further dot, have no
/// extension and yield an empty string.
///
/// # Examples
///
/// ```
/// use deskclean::category::extension_of;
///
/// assert_eq!(extension_of("Photo.JPG"), ".jpg");
/// assert_eq!(extension_of("backup.tar.gz"), ".gz");
/// assert_eq!(extension_of("Makefile"), "");
/// assert_eq!(extension_of(".bashrc"), "");
/// assert_eq!(extension_of(".config.json"), ".json");
/// ```
pub fn extension_of(file_name: &str) -> String {
    let base = base_name(file_name);
    match base.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => base[idx..].to_lowercase(),
    }
}

/// Strips any leading directories so only the final component is inspected.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', std::path::MAIN_SEPARATOR])
        .next()
        .unwrap_or(file_name)
}

/// Normalizes a configured extension to the lookup key form (`.ext`, lowercase).
///
/// Surrounding whitespace is dropped, so `" PDF "` becomes `".pdf"`.
pub fn normalize_extension(ext: &str) -> String {
    lookup_key(ext.trim())
}

/// Lowercases and adds the leading dot. Whitespace is part of the key.
fn lookup_key(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.is_empty() || lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Returns true if `name` is usable as a single folder or file name.
pub(crate) fn is_single_component(name: impl AsRef<Path>) -> bool {
    let mut components = name.as_ref().components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Maps lowercase file extensions to category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    extension_to_category: HashMap<String, String>,
    fallback_category: String,
}

impl CategoryRules {
    /// Builds rules from a `category -> [extensions]` table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategory` for category names that cannot
    /// be used as a folder name, `ConfigError::EmptyExtension` for blank
    /// extensions, and `ConfigError::DuplicateExtension` when two categories
    /// claim the same extension.
    pub fn from_table(
        categories: &BTreeMap<String, Vec<String>>,
        fallback_category: &str,
    ) -> Result<Self, ConfigError> {
        if !is_single_component(fallback_category) {
            return Err(ConfigError::InvalidCategory(fallback_category.to_string()));
        }

        let mut extension_to_category: HashMap<String, String> = HashMap::new();
        for (category, extensions) in categories {
            if !is_single_component(category) {
                return Err(ConfigError::InvalidCategory(category.clone()));
            }
            for ext in extensions {
                let key = normalize_extension(ext);
                if key.is_empty() || key == "." {
                    return Err(ConfigError::EmptyExtension {
                        category: category.clone(),
                    });
                }
                if let Some(existing) = extension_to_category.get(&key)
                    && existing != category
                {
                    return Err(ConfigError::DuplicateExtension {
                        extension: key,
                        first: existing.clone(),
                        second: category.clone(),
                    });
                }
                extension_to_category.insert(key, category.clone());
            }
        }

        Ok(Self {
            extension_to_category,
            fallback_category: fallback_category.to_string(),
        })
    }

    /// Returns the category for a file name. Unknown extensions resolve to
    /// the fallback category.
    pub fn classify(&self, file_name: &str) -> &str {
        self.category_for_extension(&extension_of(file_name))
    }

    /// Looks up an already-extracted extension (with or without the dot).
    pub fn category_for_extension(&self, ext: &str) -> &str {
        self.extension_to_category
            .get(&lookup_key(ext))
            .map(String::as_str)
            .unwrap_or(&self.fallback_category)
    }

    /// The category used for unmatched extensions.
    pub fn fallback_category(&self) -> &str {
        &self.fallback_category
    }

    /// Number of extensions with an explicit rule.
    pub fn len(&self) -> usize {
        self.extension_to_category.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extension_to_category.is_empty()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        let extension_to_category = DEFAULT_CATEGORIES
            .iter()
            .flat_map(|(name, exts)| exts.iter().map(move |e| ((*e).to_string(), (*name).to_string())))
            .collect();
        Self {
            extension_to_category,
            fallback_category: DEFAULT_FALLBACK_CATEGORY.to_string(),
        }
    }
}

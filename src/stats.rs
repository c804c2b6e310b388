/// Per-category statistics for a set of scanned files.
use crate::scanner::ScannedFile;
use std::collections::BTreeMap;

/// Category name to number of files, ordered by name.
pub type CategoryCounts = BTreeMap<String, usize>;

/// Counts per category and the overall total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub category_counts: CategoryCounts,
    pub total: usize,
}

/// Groups files by category and counts each group.
///
/// `total` always equals `files.len()`. Percentages are left to the caller,
/// which must handle `total == 0`.
pub fn aggregate(files: &[ScannedFile]) -> CategoryStats {
    let mut category_counts = CategoryCounts::new();
    for file in files {
        *category_counts.entry(file.category().to_string()).or_insert(0) += 1;
    }
    CategoryStats {
        category_counts,
        total: files.len(),
    }
}

//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. Category colours live here and
//! only here: they are presentation, not classification.

use crate::organizer::{FileOutcome, PlannedMove};
use crate::stats::CategoryCounts;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deskclean::output::OutputFormatter;
    /// OutputFormatter::success("Desktop organized!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deskclean::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a table of file counts per category with each share of the total.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deskclean::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 5);
    /// OutputFormatter::summary_table(&counts, 20);
    /// ```
    pub fn summary_table(category_counts: &CategoryCounts, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {:>5} | {}",
            "Category".bold(),
            "Files".bold(),
            "Share".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 20));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {:>5} | {:>5.1}%",
                category_colored(category),
                count.to_string().green(),
                percent_of(*count, total_files),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 20));
        println!(
            "{:<width$} | {:>5} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Prints one line per planned move.
    pub fn preview(plan: &[PlannedMove]) {
        for planned in plan {
            println!(
                " - {} {} {}",
                planned.filename,
                "→".dimmed(),
                planned.destination.display()
            );
        }
    }

    /// Prints the final line for one file during cleanup.
    pub fn file_result(outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Moved(moved) => println!(
                "  {} [{}] {}",
                "✓".green(),
                category_colored(&moved.category),
                moved.destination.display()
            ),
            FileOutcome::Failed {
                failure, category, ..
            } => eprintln!(
                "  {} [{}] {} - {}",
                "✗".red(),
                category_colored(category),
                failure.path.display(),
                failure.reason.to_string().red()
            ),
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

/// Share of `count` in `total` as a percentage; 0 when `total` is 0.
pub fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "file" } else { "files" }
}

/// Display colour for well-known category names.
fn category_colored(category: &str) -> ColoredString {
    match category {
        "Documents" => category.blue(),
        "Images" => category.magenta(),
        "Videos" => category.red(),
        "Audio" => category.green(),
        "Archives" => category.yellow(),
        "Code" => category.cyan(),
        _ => category.normal(),
    }
}

//! Command-line interface module for deskclean.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Scan / preview / cleanup orchestration
//! - Confirmation before files are moved
//! - Configuration and log inspection

use crate::api::{self, ScanResponse};
use crate::config::AppConfig;
use crate::organizer::CollisionPolicy;
use crate::output::OutputFormatter;
use crate::scanner::ScannedFile;
use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "deskclean", version)]
#[command(about = "Sort the files in a directory into category folders by extension", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./.deskcleanrc.toml, then ~/.config/deskclean/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON responses instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List files in a directory and count them per category
    Scan {
        /// Directory to scan (default: source_path from the configuration)
        dir: Option<PathBuf>,
    },

    /// Show where each file would be moved
    Preview {
        /// Directory to scan (default: source_path from the configuration)
        dir: Option<PathBuf>,

        /// Destination root (default: target_base_path from the configuration)
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },

    /// Move files into category folders
    Cleanup {
        /// Directory to scan (default: source_path from the configuration)
        dir: Option<PathBuf>,

        /// Destination root (default: target_base_path from the configuration)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Use the files listed in a `scan --json` output instead of scanning
        #[arg(long, conflicts_with = "dir")]
        from: Option<PathBuf>,

        /// Show the plan without moving anything
        #[arg(long)]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Rename instead of failing when the destination file exists
        #[arg(long)]
        rename: bool,
    },

    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the most recent activity log lines
    Logs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path in use
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a TOML file and install it as the configuration
    Import {
        /// File to import
        file: PathBuf,
    },
}

/// Runs a parsed command, reading confirmations from stdin.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use deskclean::cli::{Cli, run};
///
/// let cli = Cli::parse_from(["deskclean", "scan", "/home/me/Desktop"]);
/// if let Err(e) = run(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run(cli: Cli) -> Result<()> {
    let stdin = io::stdin();
    run_with_input(cli, &mut stdin.lock())
}

/// Runs a parsed command, reading confirmations from `input`.
pub fn run_with_input(cli: Cli, input: &mut impl BufRead) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Scan { dir } => {
            let config = AppConfig::load(config_path)?;
            scan_command(&config, dir.as_deref(), cli.json)
        }
        Command::Preview { dir, dest } => {
            let config = AppConfig::load(config_path)?;
            preview_command(&config, dir.as_deref(), dest.as_deref(), cli.json)
        }
        Command::Cleanup {
            dir,
            dest,
            from,
            dry_run,
            yes,
            rename,
        } => {
            let mut config = AppConfig::load(config_path)?;
            if rename {
                config.on_collision = CollisionPolicy::Rename;
            }
            let options = CleanupOptions {
                dir,
                dest,
                from,
                dry_run,
                yes,
                json: cli.json,
            };
            cleanup_command(&config, &options, input)
        }
        Command::Config { action } => config_command(config_path, action, cli.json),
        Command::Logs => {
            let config = AppConfig::load(config_path)?;
            let response = api::logs(&config);
            if cli.json {
                return print_json(&response, response.success, response.error.as_deref());
            }
            match response.logs {
                Some(logs) if logs.is_empty() => OutputFormatter::info("No cleanup has been logged yet."),
                Some(logs) => print!("{}", logs),
                None => bail!(response.error.unwrap_or_default()),
            }
            Ok(())
        }
    }
}

struct CleanupOptions {
    dir: Option<PathBuf>,
    dest: Option<PathBuf>,
    from: Option<PathBuf>,
    dry_run: bool,
    yes: bool,
    json: bool,
}

fn scan_command(config: &AppConfig, dir: Option<&Path>, json: bool) -> Result<()> {
    let response = api::scan(config, dir);
    if json {
        return print_json(&response, response.success, response.error.as_deref());
    }

    let files = scanned_files(response)?;
    let target = dir.map_or_else(|| config.source_dir(), Path::to_path_buf);
    OutputFormatter::info(&format!("Scanned: {}", target.display()));

    if files.is_empty() {
        OutputFormatter::success("No files to organize. Directory is clean!");
        return Ok(());
    }

    for file in &files {
        OutputFormatter::plain(&format!(" - [{}] {}", file.category(), file.name()));
    }
    let stats = crate::stats::aggregate(&files);
    OutputFormatter::summary_table(&stats.category_counts, stats.total);
    Ok(())
}

fn preview_command(
    config: &AppConfig,
    dir: Option<&Path>,
    dest: Option<&Path>,
    json: bool,
) -> Result<()> {
    let scan = api::scan(config, dir);
    if !scan.success {
        if json {
            return print_json(&scan, false, scan.error.as_deref());
        }
        bail!(scan.error.unwrap_or_default());
    }

    let files = scan.files.unwrap_or_default();
    let response = api::preview(config, &files, dest);
    if json {
        return print_json(&response, response.success, response.error.as_deref());
    }

    OutputFormatter::header("PREVIEW");
    OutputFormatter::preview(&response.preview.unwrap_or_default());
    Ok(())
}

fn cleanup_command(
    config: &AppConfig,
    options: &CleanupOptions,
    input: &mut impl BufRead,
) -> Result<()> {
    let files = match &options.from {
        Some(path) => load_scan_file(path)?,
        None => {
            let scan = api::scan(config, options.dir.as_deref());
            if options.json && !scan.success {
                return print_json(&scan, false, scan.error.as_deref());
            }
            scanned_files(scan)?
        }
    };
    let dest = options
        .dest
        .clone()
        .unwrap_or_else(|| config.destination_root());

    if options.dry_run {
        let response = api::preview(config, &files, Some(&dest));
        if options.json {
            return print_json(&response, response.success, response.error.as_deref());
        }
        OutputFormatter::dry_run_notice("No files will be moved.");
        OutputFormatter::preview(&response.preview.unwrap_or_default());
        return Ok(());
    }

    if options.json {
        if !options.yes {
            bail!("--json cleanup needs --yes, there is no prompt in JSON mode");
        }
        let response = api::cleanup(config, &files, Some(&dest));
        return print_json(&response, response.success, response.error.as_deref());
    }

    if files.is_empty() {
        OutputFormatter::success("No files to organize. Directory is clean!");
        return Ok(());
    }

    let stats = crate::stats::aggregate(&files);
    OutputFormatter::summary_table(&stats.category_counts, stats.total);
    OutputFormatter::info(&format!("Destination: {}", dest.display()));

    if !options.yes && !confirm(&format!("Move {} files?", files.len()), input)? {
        OutputFormatter::warning("Cancelled. No files were moved.");
        return Ok(());
    }

    let pb = OutputFormatter::create_progress_bar(files.len() as u64);
    let response = api::cleanup_with(config, &files, Some(&dest), |file, outcome| {
        pb.suspend(|| OutputFormatter::file_result(outcome));
        pb.set_message(file.name().to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let summary = response
        .summary
        .ok_or_else(|| anyhow!(response.error.clone().unwrap_or_default()))?;

    OutputFormatter::header("CLEANUP SUMMARY");
    OutputFormatter::plain(&format!("Moved:  {}", summary.moved));
    OutputFormatter::plain(&format!("Failed: {}", summary.failed));
    OutputFormatter::plain(&format!("Log:    {}", config.log_path().display()));

    if summary.failed > 0 {
        OutputFormatter::warning("Some files could not be organized. Rescan to retry them.");
    } else {
        OutputFormatter::success("Cleanup complete!");
    }
    Ok(())
}

fn config_command(config_path: Option<&Path>, action: ConfigAction, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let response = api::get_config(config_path);
            if json {
                return print_json(&response, response.success, response.error.as_deref());
            }
            let config = response
                .config
                .ok_or_else(|| anyhow!(response.error.unwrap_or_default()))?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Path => {
            match AppConfig::locate(config_path) {
                Some(path) => OutputFormatter::plain(&path.display().to_string()),
                None => OutputFormatter::info("No configuration file found; using defaults."),
            }
            Ok(())
        }
        ConfigAction::Init { force } => {
            let path = write_target(config_path)?;
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            finish_save(&path, &AppConfig::default(), json)
        }
        ConfigAction::Import { file } => {
            let new_config = AppConfig::load_from_file(&file)?;
            let path = write_target(config_path)?;
            finish_save(&path, &new_config, json)
        }
    }
}

/// Where `config init` / `config import` write to.
fn write_target(config_path: Option<&Path>) -> Result<PathBuf> {
    config_path
        .map(Path::to_path_buf)
        .or_else(AppConfig::user_config_path)
        .ok_or_else(|| anyhow!("HOME is not set; pass --config"))
}

fn finish_save(path: &Path, config: &AppConfig, json: bool) -> Result<()> {
    let response = api::save_config(path, config);
    if json {
        return print_json(&response, response.success, response.error.as_deref());
    }
    if let Some(error) = response.error {
        bail!(error);
    }
    OutputFormatter::success(&format!("Configuration written to {}", path.display()));
    Ok(())
}

/// Unwraps the file list of a scan response or turns its error into an `Err`.
fn scanned_files(response: ScanResponse) -> Result<Vec<ScannedFile>> {
    match response.files {
        Some(files) if response.success => Ok(files),
        _ => Err(anyhow!(
            response
                .error
                .unwrap_or_else(|| "scan returned no files".to_string())
        )),
    }
}

/// Reads the files of a saved `scan --json` output.
fn load_scan_file(path: &Path) -> Result<Vec<ScannedFile>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let response: ScanResponse = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a scan result", path.display()))?;
    scanned_files(response)
}

/// Prints a response as JSON and fails the command if it was unsuccessful.
fn print_json<T: Serialize>(response: &T, success: bool, error: Option<&str>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    if success {
        Ok(())
    } else {
        Err(anyhow!(error.unwrap_or("operation failed").to_string()))
    }
}

/// Asks a yes/no question; anything but "y" or "yes" means no.
fn confirm(prompt: &str, input: &mut impl BufRead) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

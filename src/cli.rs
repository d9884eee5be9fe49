//! Command-line interface module for dirsort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Configuration loading
//! - Organization and dry-run orchestration
//! - Mapping failures to the process exit status

use crate::config::ConfigFile;
use crate::file_organizer::{
    Destination, FileOrganizer, Operation, OrganizeError, OrganizeObserver, OrganizeResult,
    SkippedFile,
};
use crate::output::OutputFormatter;
use clap::builder::TypedValueParser;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Sort the files of a folder into category subfolders by extension.
#[derive(Parser, Debug)]
#[command(name = "dirsort")]
#[command(version)]
pub struct Cli {
    /// Folder whose files should be organized
    #[arg(value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from))]
    pub path: Option<PathBuf>,

    /// Show what would be moved without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Organize files in a directory.
    Organize {
        /// If true, report the plan without making changes.
        dry_run: bool,
    },
}

impl Cli {
    /// The folder to organize. An empty argument counts as missing.
    pub fn target(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}

/// Runs a parsed command line and returns the process exit status.
pub fn run(cli: Cli) -> ExitCode {
    let Some(path) = cli.target() else {
        OutputFormatter::error(&OrganizeError::MissingArgument.to_string());
        eprintln!("Usage: dirsort \"/path/to/your/folder\"");
        return ExitCode::FAILURE;
    };

    let command = OrganizeCommand::Organize {
        dry_run: cli.dry_run,
    };

    match run_cli_with_config(command, path, cli.config.as_deref()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Runs a command against `dir_path` with the default configuration.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// match run_cli(OrganizeCommand::Organize { dry_run: false }, Path::new("/path/to/directory")) {
///     Ok(moved) => println!("{moved} file(s) organized"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> OrganizeResult<usize> {
    run_cli_with_config(command, dir_path, None)
}

/// Runs a command with an optional configuration file.
///
/// Returns the number of files moved, or for a dry run, the number of files
/// that would be moved under the configured conflict policy.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
) -> OrganizeResult<usize> {
    let config = ConfigFile::load(config_path)?.compile()?;
    let organizer = FileOrganizer::new(config);

    match command {
        OrganizeCommand::Organize { dry_run: true } => {
            organize_directory_dry_run(&organizer, dir_path)
        }
        OrganizeCommand::Organize { dry_run: false } => organize_directory(&organizer, dir_path),
    }
}

/// Prints progress as the organizer works.
struct ConsoleObserver;

impl OrganizeObserver for ConsoleObserver {
    fn folder_created(&mut self, path: &Path) {
        OutputFormatter::info(&format!("Creating folder: {}", path.display()));
    }

    fn file_moved(&mut self, operation: &Operation) {
        let name = operation
            .new_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        OutputFormatter::moved(&name, operation.category.dir_name());
    }

    fn file_skipped(&mut self, skipped: &SkippedFile) {
        OutputFormatter::warning(&format!(
            "Skipped: {} ({} already exists)",
            skipped.path.display(),
            skipped.existing.display()
        ));
    }
}

/// Moves every eligible file of `base_path` into its category folder.
fn organize_directory(organizer: &FileOrganizer, base_path: &Path) -> OrganizeResult<usize> {
    OutputFormatter::plain(&format!("Scanning folder: {}", base_path.display()));

    let report = organizer.organize_with(base_path, &mut ConsoleObserver)?;

    if !report.skipped.is_empty() {
        OutputFormatter::warning(&format!(
            "{} file(s) left in place because the destination already exists.",
            report.skipped.len()
        ));
    }

    let moved = report.moved_count();
    if moved == 0 {
        println!();
        OutputFormatter::warning("Analysis complete. No new files to organize.");
    } else {
        println!();
        OutputFormatter::success(&format!("Success! Organized {} file(s).", moved));
        OutputFormatter::summary_table(&report.category_counts(), moved);
    }

    Ok(moved)
}

/// Reports where each file would go, without touching the filesystem.
fn organize_directory_dry_run(
    organizer: &FileOrganizer,
    base_path: &Path,
) -> OrganizeResult<usize> {
    OutputFormatter::dry_run_notice(&format!("Scanning folder: {}", base_path.display()));

    let planned = organizer.plan(base_path)?;
    if planned.is_empty() {
        OutputFormatter::dry_run_notice("No files found to organize.");
        return Ok(0);
    }

    let mut category_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut would_move = 0;
    for item in &planned {
        let category = item.category.dir_name();
        match organizer.resolve(base_path, item) {
            Destination::MoveTo(path) => {
                let target_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let destination = if target_name == item.file_name {
                    format!("{category}/")
                } else {
                    format!("{category}/{target_name}")
                };
                OutputFormatter::would_move(&item.file_name, &destination);
                *category_counts.entry(category).or_insert(0) += 1;
                would_move += 1;
            }
            Destination::Skip(existing) => {
                OutputFormatter::would_skip(&item.file_name, &existing.display().to_string());
            }
        }
    }

    if would_move == 0 {
        OutputFormatter::dry_run_notice("No new files to organize.");
    } else {
        OutputFormatter::summary_table(&category_counts, would_move);
    }
    OutputFormatter::dry_run_notice("Dry run complete. No files were modified.");

    Ok(would_move)
}

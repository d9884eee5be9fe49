//! Output formatting and styling module.
//!
//! All user-facing terminal output goes through [`OutputFormatter`] so the
//! colors and symbols stay consistent across commands.

use colored::*;
use std::collections::BTreeMap;

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in bold green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Organized 3 file(s).");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message.green().bold());
    }

    /// Prints an error message in red to stderr.
    pub fn error(message: &str) {
        eprintln!("{}", format!("Error: {}", message).red());
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message.yellow());
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a `Moved:` line for one file.
    pub fn moved(file_name: &str, category: &str) {
        println!("{} {} -> {}/", "Moved:".green(), file_name, category);
    }

    /// Prints a line describing a move that a dry run would perform.
    ///
    /// `destination` is the category folder with a trailing slash, or the
    /// full relative target when the file would be renamed.
    pub fn would_move(file_name: &str, destination: &str) {
        println!("{} {} -> {}", "Would move:".yellow(), file_name, destination);
    }

    /// Prints a line for a file a dry run would leave in place.
    pub fn would_skip(file_name: &str, existing: &str) {
        println!(
            "{} {} ({} already exists)",
            "Would skip:".yellow(),
            file_name,
            existing
        );
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents", 15);
    /// counts.insert("Images", 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<&str, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let width = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{} | {}",
            format!("{:<width$}", "Category").bold(),
            "Files".bold()
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural_files(*count)
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{} | {} {}",
            format!("{:<width$}", "Total").bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files)
        );
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

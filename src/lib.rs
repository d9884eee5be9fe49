//! dirsort - sort the files of a directory into category subfolders
//!
//! This library classifies files by extension against a static rule table
//! and moves each one into a matching subfolder of the directory it lives
//! in, creating the subfolder when needed.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{ConfigError, ConfigFile, ConflictPolicy, OrganizerConfig};
pub use file_category::{Category, FALLBACK_CATEGORY, RULE_TABLE, classify};
pub use file_organizer::{
    FileOrganizer, OrganizeError, OrganizeReport, OrganizeResult, organize,
};

pub use cli::{OrganizeCommand, run_cli};

//! Organizer configuration.
//!
//! Defaults reproduce the plain behaviour of the tool: every regular file is
//! eligible except the tool's own binary, and a move never replaces an
//! existing file. An optional TOML file, passed explicitly on the command
//! line, can extend the ignore set and pick a different conflict policy.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organizer]
//! on_conflict = "rename"
//!
//! [organizer.ignore]
//! filenames = ["Thumbs.db", "desktop.ini"]
//! patterns = ["*.part", "~$*"]
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names the organizer never touches: its own executable, should it
/// sit inside the directory being sorted.
pub const SELF_EXCLUDED_NAMES: &[&str] = &[
    env!("CARGO_PKG_NAME"),
    concat!(env!("CARGO_PKG_NAME"), ".exe"),
];

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    IoError(#[from] std::io::Error),
}

/// What to do when the destination already holds a file of the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the source where it is and report it.
    #[default]
    Skip,
    /// Replace the existing destination file.
    Overwrite,
    /// Move under a free name such as `photo (1).png`.
    Rename,
}

/// Root of the TOML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub organizer: OrganizerSettings,
}

/// `[organizer]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerSettings {
    #[serde(default)]
    pub on_conflict: ConflictPolicy,

    #[serde(default)]
    pub ignore: IgnoreRules,
}

/// `[organizer.ignore]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Exact file names to leave in place.
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl ConfigFile {
    /// Loads configuration from `config_path`, or returns defaults when no
    /// path was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses a TOML document.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles the settings into an [`OrganizerConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn compile(self) -> Result<OrganizerConfig, ConfigError> {
        OrganizerConfig::new(self.organizer)
    }
}

/// Compiled, ready-to-use settings for a run.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    pub on_conflict: ConflictPolicy,
    ignore_filenames: HashSet<String>,
    ignore_patterns: Vec<Pattern>,
}

impl OrganizerConfig {
    fn new(settings: OrganizerSettings) -> Result<Self, ConfigError> {
        let ignore_patterns = settings
            .ignore
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ignore_filenames = SELF_EXCLUDED_NAMES
            .iter()
            .map(|name| name.to_string())
            .chain(settings.ignore.filenames)
            .collect();

        Ok(Self {
            on_conflict: settings.on_conflict,
            ignore_filenames,
            ignore_patterns,
        })
    }

    /// Returns a copy using a different conflict policy.
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// Whether a top-level file name must be left untouched.
    pub fn is_ignored(&self, file_name: &str) -> bool {
        self.ignore_filenames.contains(file_name)
            || self
                .ignore_patterns
                .iter()
                .any(|pattern| pattern.matches(file_name))
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            on_conflict: ConflictPolicy::default(),
            ignore_filenames: SELF_EXCLUDED_NAMES.iter().map(|n| n.to_string()).collect(),
            ignore_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_excludes_only_self() {
        let config = OrganizerConfig::default();
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert!(config.is_ignored("dirsort"));
        assert!(config.is_ignored("dirsort.exe"));
        assert!(!config.is_ignored("photo.png"));
        assert!(!config.is_ignored(".DS_Store"));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = ConfigFile::load(None).unwrap().compile().unwrap();
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert!(config.is_ignored("dirsort"));
    }

    #[test]
    fn test_parse_full_document() {
        let config = ConfigFile::parse(
            r#"
            [organizer]
            on_conflict = "rename"

            [organizer.ignore]
            filenames = ["Thumbs.db"]
            patterns = ["*.part"]
            "#,
        )
        .unwrap()
        .compile()
        .unwrap();

        assert_eq!(config.on_conflict, ConflictPolicy::Rename);
        assert!(config.is_ignored("Thumbs.db"));
        assert!(config.is_ignored("movie.mkv.part"));
        assert!(config.is_ignored("dirsort"));
        assert!(!config.is_ignored("movie.mkv"));
    }

    #[test]
    fn test_parse_empty_document() {
        let config = ConfigFile::parse("").unwrap().compile().unwrap();
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
    }

    #[test]
    fn test_parse_rejects_unknown_policy() {
        let result = ConfigFile::parse("[organizer]\non_conflict = \"merge\"\n");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let result = ConfigFile::parse("[organizer.ignore]\npatterns = [\"[invalid\"]\n")
            .unwrap()
            .compile();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidGlobPattern { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load(Some(Path::new("/non/existent/dirsort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[organizer]\non_conflict = \"overwrite\"").unwrap();

        let config = ConfigFile::load(Some(file.path()))
            .unwrap()
            .compile()
            .unwrap();
        assert_eq!(config.on_conflict, ConflictPolicy::Overwrite);
    }

    #[test]
    fn test_with_conflict_policy() {
        let config = OrganizerConfig::default().with_conflict_policy(ConflictPolicy::Rename);
        assert_eq!(config.on_conflict, ConflictPolicy::Rename);
    }
}

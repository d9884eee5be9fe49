/// File categorization by extension.
///
/// This module owns the static rule table that maps category names to the
/// extensions they claim, and the lookup that turns a file name into the
/// subfolder it belongs in.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::{Category, classify};
///
/// assert_eq!(classify("holiday.png"), Category::Rule("Images"));
/// assert_eq!(classify("REPORT.PDF"), Category::Rule("Documents"));
/// assert_eq!(classify("notes.xyz"), Category::Other);
/// ```
use std::fmt;
use std::path::Path;

/// Folder used for files whose extension matches no rule.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Ordered rule table. Earlier entries win when an extension appears twice.
///
/// Extensions are lowercase and carry their leading dot.
pub const RULE_TABLE: &[(&str, &[&str])] = &[
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp"],
    ),
    (
        "Documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".ppt", ".pptx", ".xls", ".xlsx", ".odt",
        ],
    ),
    ("Videos", &[".mp4", ".mov", ".avi", ".mkv", ".wmv"]),
    ("Audio", &[".mp3", ".wav", ".aac", ".flac"]),
    ("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"]),
    (
        "Code",
        &[
            ".js", ".html", ".css", ".py", ".java", ".cpp", ".c", ".ts", ".json",
        ],
    ),
];

/// Destination bucket for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A category named in [`RULE_TABLE`].
    Rule(&'static str),
    /// Nothing in the rule table matched.
    Other,
}

impl Category {
    /// Returns the subfolder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dirsort::file_category::Category;
    ///
    /// assert_eq!(Category::Rule("Audio").dir_name(), "Audio");
    /// assert_eq!(Category::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Rule(name) => *name,
            Category::Other => FALLBACK_CATEGORY,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Returns the lowercase extension of `file_name`, including the leading dot.
///
/// Names without an extension, including dotfiles like `.bashrc`, yield an
/// empty string.
///
/// # Examples
///
/// ```
/// use dirsort::file_category::extension_of;
///
/// assert_eq!(extension_of("Photo.JPG"), ".jpg");
/// assert_eq!(extension_of("backup.tar.gz"), ".gz");
/// assert_eq!(extension_of("Makefile"), "");
/// assert_eq!(extension_of(".bashrc"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    match Path::new(file_name).extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy().to_lowercase()),
        _ => String::new(),
    }
}

/// Looks up an extension (with leading dot) in the rule table.
pub fn category_for_extension(ext: &str) -> Category {
    if ext.is_empty() {
        return Category::Other;
    }

    let ext = ext.to_lowercase();
    RULE_TABLE
        .iter()
        .find(|(_, extensions)| extensions.iter().any(|candidate| *candidate == ext))
        .map(|(name, _)| Category::Rule(*name))
        .unwrap_or(Category::Other)
}

/// Determines the destination category for a file name.
pub fn classify(file_name: &str) -> Category {
    category_for_extension(&extension_of(file_name))
}

/// File organization: moving the files of one directory into category folders.
///
/// The organizer makes a single pass over the immediate entries of a target
/// directory. Directories and ignored names are left alone; every other file
/// is classified by extension and renamed into `<target>/<Category>/`.
/// The first filesystem error aborts the run. Files moved before that point
/// stay where they were moved.
use crate::config::{ConfigError, ConflictPolicy, OrganizerConfig};
use crate::file_category::{self, Category};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// No target directory was supplied.
    #[error("Please provide a folder path to organize.")]
    MissingArgument,
    /// The target directory does not exist or cannot be accessed.
    #[error("The folder \"{}\" does not exist. Please check the path.", .path.display())]
    PathNotFound { path: PathBuf, source: io::Error },
    /// The target path exists but is not a directory.
    #[error("\"{}\" is not a folder.", .path.display())]
    NotADirectory { path: PathBuf },
    /// Listing the target directory failed.
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Reading metadata of an entry failed.
    #[error("Failed to inspect {}: {source}", .path.display())]
    MetadataFailed { path: PathBuf, source: io::Error },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A file that has been classified but not yet moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// File name, lossily decoded for display.
    pub file_name: String,
    /// Full path of the file inside the target directory.
    pub source: PathBuf,
    /// Destination category.
    pub category: Category,
}

/// Record of a completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The original path of the file before organization.
    pub original_path: PathBuf,
    /// The new path of the file after organization.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: Category,
    /// Whether the category folder was created for this move.
    pub created_dir: bool,
}

/// A file left in place because its destination was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// The file that was not moved.
    pub path: PathBuf,
    /// The entry already occupying the destination.
    pub existing: PathBuf,
    /// The category the file would have been moved to.
    pub category: Category,
}

/// What happened to a single planned move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file was renamed into its category folder.
    Moved(Operation),
    /// The destination was taken and the policy said to leave the file.
    Skipped(SkippedFile),
}

/// Where a file will end up, decided before anything is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Move to this path. It may replace an existing file under `Overwrite`.
    MoveTo(PathBuf),
    /// Leave the file in place; this path is already taken.
    Skip(PathBuf),
}

/// Resolves the destination of `file_name` inside `category_path` under
/// `policy`. Reads the filesystem but never changes it.
pub fn resolve_destination(
    category_path: &Path,
    file_name: &OsStr,
    policy: ConflictPolicy,
) -> Destination {
    let destination_path = category_path.join(file_name);
    if !path_taken(&destination_path) {
        return Destination::MoveTo(destination_path);
    }

    match policy {
        ConflictPolicy::Skip => Destination::Skip(destination_path),
        ConflictPolicy::Overwrite => Destination::MoveTo(destination_path),
        ConflictPolicy::Rename => {
            Destination::MoveTo(free_name(category_path, Path::new(file_name)))
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Moves performed, in processing order.
    pub operations: Vec<Operation>,
    /// Files left in place because of a name conflict.
    pub skipped: Vec<SkippedFile>,
}

impl OrganizeReport {
    /// Number of files moved.
    pub fn moved_count(&self) -> usize {
        self.operations.len()
    }

    /// Moved files per category folder.
    pub fn category_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for op in &self.operations {
            *counts.entry(op.category.dir_name()).or_insert(0) += 1;
        }
        counts
    }

    /// Category folders created during the run.
    pub fn created_dirs(&self) -> Vec<&Path> {
        self.operations
            .iter()
            .filter(|op| op.created_dir)
            .filter_map(|op| op.new_path.parent())
            .collect()
    }
}

/// Receives progress notifications while a directory is organized.
///
/// All methods default to doing nothing.
pub trait OrganizeObserver {
    /// A category folder was created, before any file is moved into it.
    fn folder_created(&mut self, _path: &Path) {}
    /// A file was moved.
    fn file_moved(&mut self, _operation: &Operation) {}
    /// A file was left in place because of a name conflict.
    fn file_skipped(&mut self, _skipped: &SkippedFile) {}
}

impl OrganizeObserver for () {}

/// Organizes files by moving them into category subdirectories.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    config: OrganizerConfig,
}

impl FileOrganizer {
    /// Creates an organizer with the given configuration.
    pub fn new(config: OrganizerConfig) -> Self {
        Self { config }
    }

    /// Verifies that `target` exists and is a directory.
    pub fn check_target(target: &Path) -> OrganizeResult<()> {
        let metadata = fs::metadata(target).map_err(|e| OrganizeError::PathNotFound {
            path: target.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_dir() {
            return Err(OrganizeError::NotADirectory {
                path: target.to_path_buf(),
            });
        }

        Ok(())
    }

    /// Lists and classifies the files of `target` without touching them.
    ///
    /// Entries are returned sorted by file name. Directories (including
    /// symlinks to directories) and ignored names are left out.
    pub fn plan(&self, target: &Path) -> OrganizeResult<Vec<PlannedMove>> {
        Self::check_target(target)?;

        let read_dir_error = |e: io::Error| OrganizeError::ReadDirFailed {
            path: target.to_path_buf(),
            source: e,
        };

        let mut entries = fs::read_dir(target)
            .map_err(read_dir_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_dir_error)?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut planned = Vec::new();
        for entry in entries {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            if self.config.is_ignored(&file_name) {
                debug!(file = %file_name, "ignored");
                continue;
            }

            let metadata = fs::metadata(&path).map_err(|e| OrganizeError::MetadataFailed {
                path: path.clone(),
                source: e,
            })?;

            if metadata.is_dir() {
                debug!(dir = %file_name, "skipping directory");
                continue;
            }

            let category = file_category::classify(&file_name);
            debug!(file = %file_name, %category, "classified");

            planned.push(PlannedMove {
                file_name,
                source: path,
                category,
            });
        }

        Ok(planned)
    }

    /// Resolves where a planned file would go under the active conflict
    /// policy, without creating folders or moving anything.
    pub fn resolve(&self, target: &Path, item: &PlannedMove) -> Destination {
        let category_path = target.join(item.category.dir_name());
        let file_name = item
            .source
            .file_name()
            .unwrap_or_else(|| OsStr::new(&item.file_name));
        resolve_destination(&category_path, file_name, self.config.on_conflict)
    }

    /// Organizes `target` and returns a report of what was moved.
    pub fn organize(&self, target: &Path) -> OrganizeResult<OrganizeReport> {
        self.organize_with(target, &mut ())
    }

    /// Organizes `target`, notifying `observer` as folders are created and
    /// files are moved or skipped.
    pub fn organize_with(
        &self,
        target: &Path,
        observer: &mut dyn OrganizeObserver,
    ) -> OrganizeResult<OrganizeReport> {
        let planned = self.plan(target)?;
        info!(dir = %target.display(), files = planned.len(), "organizing");

        let mut report = OrganizeReport::default();
        for item in &planned {
            match self.process(target, item, observer)? {
                MoveOutcome::Moved(operation) => {
                    observer.file_moved(&operation);
                    report.operations.push(operation);
                }
                MoveOutcome::Skipped(skipped) => {
                    observer.file_skipped(&skipped);
                    report.skipped.push(skipped);
                }
            }
        }

        info!(moved = report.moved_count(), skipped = report.skipped.len(), "done");
        Ok(report)
    }

    /// Prepares the category folder for one file, reports it if created,
    /// then moves the file.
    fn process(
        &self,
        target: &Path,
        item: &PlannedMove,
        observer: &mut dyn OrganizeObserver,
    ) -> OrganizeResult<MoveOutcome> {
        let category_path = target.join(item.category.dir_name());
        let created_dir = ensure_dir(&category_path)?;
        if created_dir {
            observer.folder_created(&category_path);
        }

        move_into(
            &item.source,
            &category_path,
            item.category,
            self.config.on_conflict,
            created_dir,
        )
    }

    /// Moves a file into its category directory within the base path.
    ///
    /// The category directory is created if it does not exist yet. When the
    /// destination name is already taken, `policy` decides whether the file
    /// is skipped, replaces the existing one, or gets a numbered name.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::config::ConflictPolicy;
    /// use dirsort::file_category::Category;
    /// use dirsort::file_organizer::{FileOrganizer, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let outcome = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/image.png"),
    ///     Category::Rule("Images"),
    ///     ConflictPolicy::Skip,
    /// );
    ///
    /// match outcome {
    ///     Ok(MoveOutcome::Moved(op)) => println!("Moved to {}", op.new_path.display()),
    ///     Ok(MoveOutcome::Skipped(_)) => println!("Destination taken"),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: Category,
        policy: ConflictPolicy,
    ) -> OrganizeResult<MoveOutcome> {
        let category_path = base_path.join(category.dir_name());
        let created_dir = ensure_dir(&category_path)?;
        move_into(file_path, &category_path, category, policy, created_dir)
    }
}

/// Renames `file_path` into the existing folder `category_path`.
fn move_into(
    file_path: &Path,
    category_path: &Path,
    category: Category,
    policy: ConflictPolicy,
    created_dir: bool,
) -> OrganizeResult<MoveOutcome> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            from: file_path.to_path_buf(),
            to: category_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

    let destination_path = match resolve_destination(category_path, file_name, policy) {
        Destination::MoveTo(path) => path,
        Destination::Skip(existing) => {
            info!(
                file = %file_path.display(),
                existing = %existing.display(),
                "destination exists, skipping"
            );
            return Ok(MoveOutcome::Skipped(SkippedFile {
                path: file_path.to_path_buf(),
                existing,
                category,
            }));
        }
    };

    fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
        from: file_path.to_path_buf(),
        to: destination_path.clone(),
        source: e,
    })?;
    debug!(from = %file_path.display(), to = %destination_path.display(), "moved");

    Ok(MoveOutcome::Moved(Operation {
        original_path: file_path.to_path_buf(),
        new_path: destination_path,
        category,
        created_dir,
    }))
}

/// Organizes `target` with the default configuration and returns the
/// number of files moved.
///
/// # Examples
///
/// ```no_run
/// let moved = dirsort::organize(std::path::Path::new("/home/me/Downloads"))?;
/// println!("Organized {moved} file(s)");
/// # Ok::<(), dirsort::OrganizeError>(())
/// ```
pub fn organize(target: &Path) -> OrganizeResult<usize> {
    FileOrganizer::default()
        .organize(target)
        .map(|report| report.moved_count())
}

/// Creates `dir` if missing. Returns whether it was created by this call.
fn ensure_dir(dir: &Path) -> OrganizeResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }

    match fs::create_dir(dir) {
        Ok(()) => {
            info!(dir = %dir.display(), "created category folder");
            Ok(true)
        }
        // Lost a race with another process creating the same folder.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(false),
        Err(e) => Err(OrganizeError::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source: e,
        }),
    }
}

/// True if anything, including a dangling symlink, occupies `path`.
fn path_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Finds the first unused `name (n).ext` inside `dir`.
fn free_name(dir: &Path, file_name: &Path) -> PathBuf {
    let stem = file_name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = file_name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| dir.join(format!("{stem} ({n}){ext}")))
        .find(|candidate| !path_taken(candidate))
        .unwrap_or_else(|| dir.join(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn images() -> Category {
        Category::Rule("Images")
    }

    #[test]
    fn test_move_to_category_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let file_path = base_path.join("test.txt");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let outcome = FileOrganizer::move_to_category(
            base_path,
            &file_path,
            Category::Rule("Documents"),
            ConflictPolicy::Skip,
        )
        .expect("Failed to move file");

        let category_dir = base_path.join("Documents");
        assert!(category_dir.is_dir());
        assert!(!file_path.exists());
        assert!(category_dir.join("test.txt").exists());

        match outcome {
            MoveOutcome::Moved(op) => {
                assert!(op.created_dir);
                assert_eq!(op.new_path, category_dir.join("test.txt"));
            }
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn test_move_to_category_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        let category_dir = base_path.join("Images");
        fs::create_dir(&category_dir).expect("Failed to create category directory");

        let file_path = base_path.join("test.png");
        fs::write(&file_path, "test content").expect("Failed to write test file");

        let outcome =
            FileOrganizer::move_to_category(base_path, &file_path, images(), ConflictPolicy::Skip)
                .expect("Failed to move file");

        assert!(!file_path.exists());
        assert!(category_dir.join("test.png").exists());
        assert!(matches!(outcome, MoveOutcome::Moved(Operation { created_dir: false, .. })));
    }

    #[test]
    fn test_move_conflict_skip_leaves_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Images")).unwrap();
        fs::write(base_path.join("Images/a.png"), "old").unwrap();
        fs::write(base_path.join("a.png"), "new").unwrap();

        let outcome = FileOrganizer::move_to_category(
            base_path,
            &base_path.join("a.png"),
            images(),
            ConflictPolicy::Skip,
        )
        .unwrap();

        assert!(matches!(outcome, MoveOutcome::Skipped(_)));
        assert_eq!(fs::read_to_string(base_path.join("a.png")).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Images/a.png")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_move_conflict_overwrite_replaces_file() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Images")).unwrap();
        fs::write(base_path.join("Images/a.png"), "old").unwrap();
        fs::write(base_path.join("a.png"), "new").unwrap();

        FileOrganizer::move_to_category(
            base_path,
            &base_path.join("a.png"),
            images(),
            ConflictPolicy::Overwrite,
        )
        .unwrap();

        assert!(!base_path.join("a.png").exists());
        assert_eq!(
            fs::read_to_string(base_path.join("Images/a.png")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_move_conflict_rename_picks_free_name() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Images")).unwrap();
        fs::write(base_path.join("Images/a.png"), "old").unwrap();
        fs::write(base_path.join("Images/a (1).png"), "older").unwrap();
        fs::write(base_path.join("a.png"), "new").unwrap();

        let outcome = FileOrganizer::move_to_category(
            base_path,
            &base_path.join("a.png"),
            images(),
            ConflictPolicy::Rename,
        )
        .unwrap();

        let expected = base_path.join("Images/a (2).png");
        assert!(matches!(outcome, MoveOutcome::Moved(ref op) if op.new_path == expected));
        assert_eq!(fs::read_to_string(expected).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(base_path.join("Images/a.png")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_resolve_destination_follows_policy_without_touching_disk() {
        let temp_dir = TempDir::new().unwrap();
        let category_path = temp_dir.path().join("Images");
        let name = OsStr::new("a.png");

        assert_eq!(
            resolve_destination(&category_path, name, ConflictPolicy::Skip),
            Destination::MoveTo(category_path.join("a.png"))
        );
        assert!(!category_path.exists());

        fs::create_dir(&category_path).unwrap();
        fs::write(category_path.join("a.png"), "old").unwrap();

        assert_eq!(
            resolve_destination(&category_path, name, ConflictPolicy::Skip),
            Destination::Skip(category_path.join("a.png"))
        );
        assert_eq!(
            resolve_destination(&category_path, name, ConflictPolicy::Overwrite),
            Destination::MoveTo(category_path.join("a.png"))
        );
        assert_eq!(
            resolve_destination(&category_path, name, ConflictPolicy::Rename),
            Destination::MoveTo(category_path.join("a (1).png"))
        );
        assert_eq!(fs::read_dir(&category_path).unwrap().count(), 1);
    }

    #[derive(Default)]
    struct RecordingObserver {
        events: Vec<String>,
    }

    impl OrganizeObserver for RecordingObserver {
        fn folder_created(&mut self, path: &Path) {
            self.events.push(format!("folder {}", path.display()));
        }

        fn file_moved(&mut self, operation: &Operation) {
            self.events
                .push(format!("moved {}", operation.new_path.display()));
        }
    }

    #[test]
    fn test_folder_created_reported_before_move() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::write(base_path.join("a.png"), "").unwrap();

        let mut observer = RecordingObserver::default();
        FileOrganizer::default()
            .organize_with(base_path, &mut observer)
            .unwrap();

        let images_dir = base_path.join("Images");
        assert_eq!(
            observer.events,
            vec![
                format!("folder {}", images_dir.display()),
                format!("moved {}", images_dir.join("a.png").display()),
            ]
        );
    }

    #[test]
    fn test_folder_created_reported_when_move_fails() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        let item = PlannedMove {
            file_name: "gone.png".to_string(),
            source: base_path.join("gone.png"),
            category: images(),
        };

        let mut observer = RecordingObserver::default();
        let result = FileOrganizer::default().process(base_path, &item, &mut observer);

        assert!(matches!(result, Err(OrganizeError::FileMoveFailure { .. })));
        assert!(base_path.join("Images").is_dir());
        assert_eq!(
            observer.events,
            vec![format!("folder {}", base_path.join("Images").display())]
        );
    }

    #[test]
    fn test_free_name_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let name = free_name(temp_dir.path(), Path::new("README"));
        assert_eq!(name, temp_dir.path().join("README (1)"));
    }

    #[test]
    fn test_check_target_missing() {
        let result = FileOrganizer::check_target(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(OrganizeError::PathNotFound { .. })));
    }

    #[test]
    fn test_check_target_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let result = FileOrganizer::check_target(&file);
        assert!(matches!(result, Err(OrganizeError::NotADirectory { .. })));
    }

    #[test]
    fn test_plan_skips_directories_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        fs::write(base_path.join("b.pdf"), "").unwrap();
        fs::write(base_path.join("a.png"), "").unwrap();
        fs::create_dir(base_path.join("sub")).unwrap();

        let planned = FileOrganizer::default().plan(base_path).unwrap();
        let names: Vec<_> = planned.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.pdf"]);
        assert_eq!(planned[0].category, images());
        assert_eq!(planned[1].category, Category::Rule("Documents"));
    }

    #[test]
    fn test_plan_excludes_own_binary() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("dirsort"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let planned = FileOrganizer::default().plan(temp_dir.path()).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].file_name, "notes.txt");
    }

    #[test]
    fn test_report_counts() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path();
        for name in ["a.png", "b.png", "c.xyz"] {
            fs::write(base_path.join(name), "").unwrap();
        }

        let report = FileOrganizer::default().organize(base_path).unwrap();
        assert_eq!(report.moved_count(), 3);
        let counts = report.category_counts();
        assert_eq!(counts.get("Images"), Some(&2));
        assert_eq!(counts.get("Other"), Some(&1));
        assert_eq!(report.created_dirs().len(), 2);
    }

    #[test]
    fn test_organize_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(organize(temp_dir.path()).unwrap(), 0);
    }
}

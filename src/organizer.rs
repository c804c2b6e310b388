/// Moving scanned files into category folders.
///
/// Each file is moved to `destination_root/<category>/<name>`. Files are
/// processed one at a time in input order, and a failure on one file is
/// recorded and never stops the rest of the batch.
use crate::category::is_single_component;
use crate::scanner::ScannedFile;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What to do when a file with the same name already sits at the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail the file with `DestinationExists`.
    #[default]
    Reject,
    /// Move under a new name with a timestamp suffix.
    Rename,
}

/// Why a single file could not be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    SourceMissing,
    DestinationExists,
    PermissionDenied,
    CrossDeviceError,
    Unknown,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SourceMissing => "SourceMissing",
            Self::DestinationExists => "DestinationExists",
            Self::PermissionDenied => "PermissionDenied",
            Self::CrossDeviceError => "CrossDeviceError",
            Self::Unknown => "Unknown",
        }
    }

    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::SourceMissing,
            io::ErrorKind::AlreadyExists | io::ErrorKind::DirectoryNotEmpty => {
                Self::DestinationExists
            }
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied
            }
            io::ErrorKind::CrossesDevices => Self::CrossDeviceError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: FailureReason,
}

/// A file that was moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: String,
}

/// The terminal state of one file in a cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Moved(MovedFile),
    Failed {
        failure: FileFailure,
        category: String,
        /// Underlying error text, for logs only.
        detail: String,
    },
}

/// Summary of one cleanup call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOutcome {
    pub moved_count: usize,
    pub failed_count: usize,
    /// Failures in input order.
    pub failures: Vec<FileFailure>,
    /// Successful moves in input order.
    pub moved: Vec<MovedFile>,
}

impl CleanupOutcome {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Moved(moved) => {
                self.moved_count += 1;
                self.moved.push(moved.clone());
            }
            FileOutcome::Failed { failure, .. } => {
                self.failed_count += 1;
                self.failures.push(failure.clone());
            }
        }
    }

    /// Returns true if no file failed.
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// Where a file would go, computed without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: String,
    pub filename: String,
}

/// Errors that abort a whole cleanup before any file is touched.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The destination root could not be created.
    #[error("cannot create destination root {}: {source}", path.display())]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination root exists but is not a directory.
    #[error("destination root is not a directory: {}", path.display())]
    RootNotADirectory { path: PathBuf },

    /// The destination root is read-only.
    #[error("destination root is not writable: {}", path.display())]
    RootNotWritable { path: PathBuf },
}

/// Moves scanned files into category folders under a destination root.
#[derive(Debug, Clone, Copy, Default)]
pub struct Organizer {
    collision: CollisionPolicy,
}

impl Organizer {
    pub fn new(collision: CollisionPolicy) -> Self {
        Self { collision }
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    /// Computes the destination of every file without moving anything.
    pub fn plan(files: &[ScannedFile], destination_root: &Path) -> Vec<PlannedMove> {
        files
            .iter()
            .map(|file| PlannedMove {
                source: file.path().to_path_buf(),
                destination: destination_root.join(file.category()).join(file.file_name()),
                category: file.category().to_string(),
                filename: file.name().to_string(),
            })
            .collect()
    }

    /// Moves every file into `destination_root/<category>/<name>`.
    ///
    /// See [`Organizer::cleanup_with`].
    pub fn cleanup(
        &self,
        files: &[ScannedFile],
        destination_root: &Path,
    ) -> Result<CleanupOutcome, CleanupError> {
        self.cleanup_with(files, destination_root, |_, _| {})
    }

    /// Moves every file, calling `on_file` after each one reaches its final state.
    ///
    /// An empty `files` slice returns immediately without touching the
    /// filesystem. Otherwise the destination root is created if needed;
    /// category folders are created on demand.
    ///
    /// # Errors
    ///
    /// Returns a `CleanupError` only if the destination root cannot be used.
    /// Per-file problems are reported in the returned `CleanupOutcome`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use deskclean::organizer::{CollisionPolicy, Organizer};
    /// use std::path::Path;
    ///
    /// let organizer = Organizer::new(CollisionPolicy::Reject);
    /// let outcome = organizer
    ///     .cleanup_with(&[], Path::new("/tmp/sorted"), |file, result| {
    ///         println!("{}: {:?}", file.name(), result);
    ///     })
    ///     .expect("destination root unusable");
    /// assert_eq!(outcome.moved_count, 0);
    /// ```
    pub fn cleanup_with<F>(
        &self,
        files: &[ScannedFile],
        destination_root: &Path,
        mut on_file: F,
    ) -> Result<CleanupOutcome, CleanupError>
    where
        F: FnMut(&ScannedFile, &FileOutcome),
    {
        let mut outcome = CleanupOutcome::default();
        if files.is_empty() {
            return Ok(outcome);
        }

        ensure_destination_root(destination_root)?;

        let mut ready_dirs = HashSet::new();
        for file in files {
            let result = match self.move_one(file, destination_root, &mut ready_dirs) {
                Ok(destination) => {
                    tracing::info!(
                        source = %file.path().display(),
                        destination = %destination.display(),
                        category = file.category(),
                        "moved file"
                    );
                    FileOutcome::Moved(MovedFile {
                        source: file.path().to_path_buf(),
                        destination,
                        category: file.category().to_string(),
                    })
                }
                Err((reason, detail)) => {
                    tracing::warn!(
                        source = %file.path().display(),
                        category = file.category(),
                        %reason,
                        detail = %detail,
                        "failed to move file"
                    );
                    FileOutcome::Failed {
                        failure: FileFailure {
                            path: file.path().to_path_buf(),
                            reason,
                        },
                        category: file.category().to_string(),
                        detail,
                    }
                }
            };
            outcome.record(&result);
            on_file(file, &result);
        }

        tracing::info!(
            moved = outcome.moved_count,
            failed = outcome.failed_count,
            root = %destination_root.display(),
            "cleanup finished"
        );
        Ok(outcome)
    }

    /// Moves a single file and returns its destination.
    fn move_one(
        &self,
        file: &ScannedFile,
        destination_root: &Path,
        ready_dirs: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf, (FailureReason, String)> {
        if !is_single_component(file.file_name()) || !is_single_component(file.category()) {
            return Err((
                FailureReason::Unknown,
                format!(
                    "refusing unsafe name or category: {}/{}",
                    file.category(),
                    file.name()
                ),
            ));
        }

        let source_meta = fs::symlink_metadata(file.path()).map_err(io_failure)?;
        if !source_meta.is_file() {
            return Err((
                FailureReason::Unknown,
                "source is not a regular file".to_string(),
            ));
        }

        let category_dir = destination_root.join(file.category());
        if !ready_dirs.contains(&category_dir) {
            fs::create_dir_all(&category_dir).map_err(|e| {
                (
                    category_dir_failure(&e),
                    format!("failed to create {}: {}", category_dir.display(), e),
                )
            })?;
            ready_dirs.insert(category_dir.clone());
        }

        let mut destination = category_dir.join(file.file_name());
        if path_exists(&destination) {
            match self.collision {
                CollisionPolicy::Reject => {
                    return Err((
                        FailureReason::DestinationExists,
                        format!("{} already exists", destination.display()),
                    ));
                }
                CollisionPolicy::Rename => destination = unique_destination(&destination),
            }
        }

        move_file(file.path(), &destination)?;
        Ok(destination)
    }
}

/// Checks the batch precondition on the destination root.
fn ensure_destination_root(root: &Path) -> Result<(), CleanupError> {
    fs::create_dir_all(root).map_err(|source| CleanupError::CreateRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let metadata = fs::metadata(root).map_err(|source| CleanupError::CreateRoot {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(CleanupError::RootNotADirectory {
            path: root.to_path_buf(),
        });
    }
    if metadata.permissions().readonly() {
        return Err(CleanupError::RootNotWritable {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Renames `source` to `destination`, copying across devices when needed.
fn move_file(source: &Path, destination: &Path) -> Result<(), (FailureReason, String)> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(source = %source.display(), "rename crossed devices, copying instead");
            copy_then_remove(source, destination).map_err(|e| {
                (
                    FailureReason::CrossDeviceError,
                    format!("cross-device move failed: {}", e),
                )
            })
        }
        Err(e) => Err(io_failure(e)),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    if let Err(e) = fs::copy(source, destination) {
        // Drop any partial copy.
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(source) {
        // Leave the source in place rather than keeping two copies.
        let _ = fs::remove_file(destination);
        return Err(e);
    }
    Ok(())
}

/// Reason reported when a category folder cannot be created.
fn category_dir_failure(err: &io::Error) -> FailureReason {
    match FailureReason::from_io(err) {
        FailureReason::PermissionDenied => FailureReason::PermissionDenied,
        _ => FailureReason::Unknown,
    }
}

fn io_failure(err: io::Error) -> (FailureReason, String) {
    (FailureReason::from_io(&err), err.to_string())
}

/// True if anything (file, directory or dangling symlink) occupies `path`.
fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Generates a free name next to `candidate` by appending a timestamp.
///
/// Example: `photo.jpg` becomes `photo_20251109_143052.jpg`, then
/// `photo_20251109_143052_1.jpg` if that is also taken.
fn unique_destination(candidate: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let stem = candidate.file_stem().unwrap_or_default();
    let ext = candidate.extension();

    let mut counter = 0usize;
    loop {
        let mut name = OsString::from(stem);
        name.push("_");
        name.push(&timestamp);
        if counter > 0 {
            name.push(format!("_{}", counter));
        }
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }

        let renamed = candidate.with_file_name(name);
        if !path_exists(&renamed) {
            return renamed;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryRules;
    use tempfile::TempDir;

    fn scanned(dir: &Path, name: &str, content: &str) -> ScannedFile {
        let path = dir.join(name);
        fs::write(&path, content).expect("Failed to write test file");
        ScannedFile::classify(path, &CategoryRules::default()).unwrap()
    }

    #[test]
    fn test_cleanup_moves_into_category_dirs() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let files = vec![
            scanned(source.path(), "a.jpg", "img"),
            scanned(source.path(), "b.pdf", "pdf"),
            scanned(source.path(), "c.xyz", "???"),
        ];

        let outcome = Organizer::default()
            .cleanup(&files, dest.path())
            .expect("Cleanup failed");

        assert_eq!(outcome.moved_count, 3);
        assert_eq!(outcome.failed_count, 0);
        assert!(dest.path().join("Images").join("a.jpg").is_file());
        assert!(dest.path().join("Documents").join("b.pdf").is_file());
        assert!(dest.path().join("Others").join("c.xyz").is_file());
        assert!(!source.path().join("a.jpg").exists());
    }

    #[test]
    fn test_cleanup_uses_existing_category_dir() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dest.path().join("Images")).unwrap();
        fs::write(dest.path().join("Images").join("old.png"), "old").unwrap();

        let files = vec![scanned(source.path(), "new.png", "new")];
        let outcome = Organizer::default().cleanup(&files, dest.path()).unwrap();

        assert_eq!(outcome.moved_count, 1);
        assert!(dest.path().join("Images").join("old.png").exists());
        assert!(dest.path().join("Images").join("new.png").exists());
    }

    #[test]
    fn test_cleanup_empty_list_has_no_side_effects() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("never-created");

        let outcome = Organizer::default().cleanup(&[], &root).unwrap();

        assert_eq!(outcome, CleanupOutcome::default());
        assert!(!root.exists());
    }

    #[test]
    fn test_cleanup_creates_missing_root() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let root = dest.path().join("Organized").join("deep");
        let files = vec![scanned(source.path(), "song.mp3", "la")];

        let outcome = Organizer::default().cleanup(&files, &root).unwrap();

        assert_eq!(outcome.moved_count, 1);
        assert!(root.join("Audio").join("song.mp3").exists());
    }

    #[test]
    fn test_collision_rejected_by_default() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dest.path().join("Documents")).unwrap();
        fs::write(dest.path().join("Documents").join("report.pdf"), "existing").unwrap();

        let files = vec![
            scanned(source.path(), "report.pdf", "incoming"),
            scanned(source.path(), "photo.png", "img"),
        ];
        let outcome = Organizer::default().cleanup(&files, dest.path()).unwrap();

        assert_eq!(outcome.moved_count, 1);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.failures[0].reason, FailureReason::DestinationExists);
        assert_eq!(outcome.failures[0].path, source.path().join("report.pdf"));

        // Neither file was overwritten.
        let existing = fs::read_to_string(dest.path().join("Documents").join("report.pdf")).unwrap();
        assert_eq!(existing, "existing");
        assert!(source.path().join("report.pdf").exists());
        assert!(dest.path().join("Images").join("photo.png").exists());
    }

    #[test]
    fn test_collision_rename_policy() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dest.path().join("Documents")).unwrap();
        fs::write(dest.path().join("Documents").join("notes.txt"), "existing").unwrap();

        let files = vec![scanned(source.path(), "notes.txt", "incoming")];
        let outcome = Organizer::new(CollisionPolicy::Rename)
            .cleanup(&files, dest.path())
            .unwrap();

        assert_eq!(outcome.moved_count, 1);
        let destination = &outcome.moved[0].destination;
        assert_ne!(destination, &dest.path().join("Documents").join("notes.txt"));
        let name = destination.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("notes_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(fs::read_to_string(destination).unwrap(), "incoming");
        assert_eq!(
            fs::read_to_string(dest.path().join("Documents").join("notes.txt")).unwrap(),
            "existing"
        );
    }

    #[test]
    fn test_rerun_yields_source_missing() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let files = vec![
            scanned(source.path(), "a.jpg", "1"),
            scanned(source.path(), "b.txt", "2"),
        ];

        let organizer = Organizer::default();
        let first = organizer.cleanup(&files, dest.path()).unwrap();
        assert_eq!(first.moved_count, 2);

        let second = organizer.cleanup(&files, dest.path()).unwrap();
        assert_eq!(second.moved_count, 0);
        assert_eq!(second.failed_count, 2);
        assert!(
            second
                .failures
                .iter()
                .all(|f| f.reason == FailureReason::SourceMissing)
        );
    }

    #[test]
    fn test_failures_preserve_input_order() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let rules = CategoryRules::default();
        let files = vec![
            ScannedFile::classify(source.path().join("gone1.txt"), &rules).unwrap(),
            scanned(source.path(), "present.txt", "x"),
            ScannedFile::classify(source.path().join("gone2.jpg"), &rules).unwrap(),
        ];

        let mut seen = Vec::new();
        let outcome = Organizer::default()
            .cleanup_with(&files, dest.path(), |file, _| seen.push(file.name().to_string()))
            .unwrap();

        assert_eq!(seen, vec!["gone1.txt", "present.txt", "gone2.jpg"]);
        let failed: Vec<_> = outcome.failures.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            failed,
            vec![source.path().join("gone1.txt"), source.path().join("gone2.jpg")]
        );
    }

    #[test]
    fn test_category_dir_blocked_by_file_fails_only_that_category() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        // A plain file where the Images folder should go.
        fs::write(dest.path().join("Images"), "not a dir").unwrap();

        let files = vec![
            scanned(source.path(), "a.jpg", "1"),
            scanned(source.path(), "b.pdf", "2"),
        ];
        let outcome = Organizer::default().cleanup(&files, dest.path()).unwrap();

        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.failures[0].path, source.path().join("a.jpg"));
        assert_eq!(outcome.failures[0].reason, FailureReason::Unknown);
        assert_eq!(outcome.moved_count, 1);
        assert!(dest.path().join("Documents").join("b.pdf").exists());
    }

    #[test]
    fn test_root_that_is_a_file_is_fatal() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let root = dest.path().join("root.txt");
        fs::write(&root, "").unwrap();

        let files = vec![scanned(source.path(), "a.jpg", "1")];
        let result = Organizer::default().cleanup(&files, &root);

        assert!(result.is_err());
        assert!(source.path().join("a.jpg").exists());
    }

    #[test]
    fn test_unsafe_names_are_rejected() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let file: ScannedFile = serde_json::from_value(serde_json::json!({
            "path": source.path().join("x.txt"),
            "name": "../x.txt",
            "extension": ".txt",
            "category": "Documents",
        }))
        .unwrap();
        fs::write(source.path().join("x.txt"), "x").unwrap();

        let outcome = Organizer::default().cleanup(&[file], dest.path()).unwrap();

        assert_eq!(outcome.failures[0].reason, FailureReason::Unknown);
        assert!(source.path().join("x.txt").exists());
    }

    #[test]
    fn test_plan_does_not_touch_filesystem() {
        let rules = CategoryRules::default();
        let files = vec![ScannedFile::classify("/desk/a.jpg", &rules).unwrap()];
        let root = Path::new("/non/existent/root");

        let plan = Organizer::plan(&files, root);

        assert_eq!(plan[0].destination, root.join("Images").join("a.jpg"));
        assert_eq!(plan[0].filename, "a.jpg");
        assert!(!root.exists());
    }

    #[test]
    fn test_failure_reason_from_io() {
        let kinds = [
            (io::ErrorKind::NotFound, FailureReason::SourceMissing),
            (io::ErrorKind::PermissionDenied, FailureReason::PermissionDenied),
            (io::ErrorKind::AlreadyExists, FailureReason::DestinationExists),
            (io::ErrorKind::CrossesDevices, FailureReason::CrossDeviceError),
            (io::ErrorKind::Other, FailureReason::Unknown),
        ];
        for (kind, expected) in kinds {
            assert_eq!(FailureReason::from_io(&io::Error::from(kind)), expected);
        }
        assert_eq!(FailureReason::CrossDeviceError.to_string(), "CrossDeviceError");
    }

    #[test]
    fn test_unique_destination_keeps_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let taken = temp_dir.path().join("archive.tar.gz");
        fs::write(&taken, "").unwrap();

        let renamed = unique_destination(&taken);
        let name = renamed.file_name().unwrap().to_string_lossy().into_owned();

        assert!(name.starts_with("archive.tar_"));
        assert!(name.ends_with(".gz"));
        assert!(!renamed.exists());
    }

    #[test]
    fn test_failed_copy_leaves_no_destination_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let destination = dir.path().join("half.bin");
        fs::write(&destination, "partial").unwrap();

        let result = copy_then_remove(&dir.path().join("gone.bin"), &destination);

        assert!(result.is_err());
        assert!(!destination.exists());
    }

    #[test]
    fn test_copy_then_remove_moves_content() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let source = dir.path().join("a.txt");
        let destination = dir.path().join("b.txt");
        fs::write(&source, "data").unwrap();

        copy_then_remove(&source, &destination).unwrap();

        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "data");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_kept_on_move() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let raw = OsStr::from_bytes(b"caf\xE9.jpg");
        let path = source.path().join(raw);
        if fs::write(&path, "img").is_err() {
            // Some filesystems only accept UTF-8 names.
            return;
        }
        let files = vec![ScannedFile::classify(path, &CategoryRules::default()).unwrap()];

        let outcome = Organizer::default().cleanup(&files, dest.path()).unwrap();

        assert_eq!(outcome.moved_count, 1);
        assert_eq!(files[0].category(), "Images");
        let names: Vec<_> = fs::read_dir(dest.path().join("Images"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![raw.to_os_string()]);
        assert_eq!(
            Organizer::plan(&files, dest.path())[0].destination,
            dest.path().join("Images").join(raw)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().expect("Failed to create temp directory");
        let taken = dir.path().join(OsStr::from_bytes(b"caf\xE9.jpg"));

        let renamed = unique_destination(&taken);
        let bytes = renamed.file_name().unwrap().as_bytes();

        assert!(bytes.starts_with(b"caf\xE9_"));
        assert!(bytes.ends_with(b".jpg"));
    }
}

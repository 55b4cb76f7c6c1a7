//! Moves files into category folders under `<base>/files/`.
//!
//! Organizing never fails as a whole: each call resolves a folder, creates
//! it, and moves the entry if it is a regular file. Problems are logged and
//! returned as [`Outcome::Failed`] so that a caller walking a directory can
//! carry on with the next entry.

use crate::file_category::ExtensionMapping;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Name of the directory, under the base path, that holds category folders.
pub const FILES_DIR: &str = "files";

/// Errors that can occur while organizing a single entry.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// Failed to create the category directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to move a file into its category directory.
    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    MoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one directory entry.
#[derive(Debug)]
pub enum Outcome {
    /// The file was moved.
    Moved { folder: String, destination: PathBuf },
    /// Dry run: the file would be moved here.
    Planned { folder: String, destination: PathBuf },
    /// The entry is a directory; directories are never organized.
    SkippedDirectory,
    /// The entry is neither a regular file nor a directory (it may have
    /// disappeared since the listing).
    Absent,
    /// The entry matched an exclusion rule and was left in place.
    Excluded,
    /// Directory creation or the move itself failed.
    Failed(OrganizeError),
}

impl Outcome {
    /// Destination folder name for outcomes that have one.
    pub fn folder(&self) -> Option<&str> {
        match self {
            Outcome::Moved { folder, .. } | Outcome::Planned { folder, .. } => {
                Some(folder.as_str())
            }
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Moved { .. } => "moved",
            Outcome::Planned { .. } => "planned",
            Outcome::SkippedDirectory => "skipped-directory",
            Outcome::Absent => "absent",
            Outcome::Excluded => "excluded",
            Outcome::Failed(_) => "failed",
        }
    }
}

/// Per-entry outcomes of one run over a directory, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// The base directory the run operated on.
    pub base_path: PathBuf,
    /// Entry names paired with their outcome.
    pub entries: Vec<(OsString, Outcome)>,
}

impl RunReport {
    /// Creates an empty report for a base path.
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            entries: Vec::new(),
        }
    }

    /// Adds an entry outcome to this report.
    pub fn record(&mut self, name: OsString, outcome: Outcome) {
        self.entries.push((name, outcome));
    }

    /// Number of files moved (or planned, in a dry run).
    pub fn moved_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.folder().is_some())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .count()
    }

    /// Files per destination folder, sorted by folder name.
    pub fn folder_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for folder in self.entries.iter().filter_map(|(_, o)| o.folder()) {
            *counts.entry(folder.to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Looks up the outcome recorded for an entry name.
    pub fn outcome_of(&self, name: impl AsRef<OsStr>) -> Option<&Outcome> {
        let name = name.as_ref();
        self.entries
            .iter()
            .find(|(entry, _)| entry.as_os_str() == name)
            .map(|(_, outcome)| outcome)
    }
}

/// Organizes entries of a base directory into `<base>/files/<folder>/`.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Returns `<base>/files/<folder>`.
    pub fn folder_path(base_path: &Path, folder: &str) -> PathBuf {
        base_path.join(FILES_DIR).join(folder)
    }

    /// Organizes one entry of `base_path`.
    ///
    /// The destination folder is created (with any missing parents) before
    /// the entry is inspected. Regular files are then moved into it;
    /// directories are left untouched. Failures are logged and returned as
    /// [`Outcome::Failed`], never as a panic or an early return to the caller.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_category::ExtensionMapping;
    /// use foldersort::file_organizer::{FileOrganizer, Outcome};
    /// use std::path::Path;
    ///
    /// let mapping = ExtensionMapping::from_pairs([("Images", vec!["png"])]);
    /// match FileOrganizer::organize("photo.png", Path::new("/path/to/base"), &mapping) {
    ///     Outcome::Moved { destination, .. } => println!("now at {}", destination.display()),
    ///     Outcome::Failed(e) => eprintln!("could not organize: {}", e),
    ///     _ => {}
    /// }
    /// ```
    pub fn organize(
        file_name: impl AsRef<OsStr>,
        base_path: &Path,
        mapping: &ExtensionMapping,
    ) -> Outcome {
        let file_name = file_name.as_ref();
        let folder = mapping.folder_name(file_name);
        let folder_path = Self::folder_path(base_path, &folder);

        if let Err(source) = fs::create_dir_all(&folder_path) {
            let err = OrganizeError::DirectoryCreation {
                path: folder_path,
                source,
            };
            error!(file = %file_name.to_string_lossy(), "Error creating folder: {}", err);
            return Outcome::Failed(err);
        }

        let source_path = base_path.join(file_name);
        if source_path.is_file() {
            let destination = folder_path.join(file_name);
            match move_file(&source_path, &destination) {
                Ok(()) => {
                    info!(
                        file = %file_name.to_string_lossy(),
                        folder = %folder_path.display(),
                        "File moved"
                    );
                    Outcome::Moved {
                        folder,
                        destination,
                    }
                }
                Err(source) => {
                    let err = OrganizeError::MoveFailure {
                        from: source_path,
                        to: destination,
                        source,
                    };
                    error!(file = %file_name.to_string_lossy(), "Error moving file: {}", err);
                    Outcome::Failed(err)
                }
            }
        } else if source_path.is_dir() {
            debug!(entry = %file_name.to_string_lossy(), "Skipping directory");
            Outcome::SkippedDirectory
        } else {
            Outcome::Absent
        }
    }

    /// Resolves what [`FileOrganizer::organize`] would do without touching
    /// the file system.
    pub fn plan(
        file_name: impl AsRef<OsStr>,
        base_path: &Path,
        mapping: &ExtensionMapping,
    ) -> Outcome {
        let file_name = file_name.as_ref();
        let source_path = base_path.join(file_name);

        if source_path.is_file() {
            let folder = mapping.folder_name(file_name);
            let destination = Self::folder_path(base_path, &folder).join(file_name);
            Outcome::Planned {
                folder,
                destination,
            }
        } else if source_path.is_dir() {
            Outcome::SkippedDirectory
        } else {
            Outcome::Absent
        }
    }
}

/// Renames `from` to `to`, falling back to copy and remove when the two
/// paths are on different file systems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mapping() -> ExtensionMapping {
        ExtensionMapping::from_pairs([("Images", vec!["png"]), ("Documents", vec!["pdf"])])
    }

    #[test]
    fn test_organize_creates_nested_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("photo.png"), "png").expect("Failed to write test file");

        let outcome = FileOrganizer::organize("photo.png", base_path, &mapping());

        let folder = base_path.join("files").join("images");
        assert!(folder.is_dir());
        assert!(folder.join("photo.png").is_file());
        assert!(!base_path.join("photo.png").exists());
        assert!(matches!(outcome, Outcome::Moved { ref folder, .. } if folder == "images"));
    }

    #[test]
    fn test_organize_uses_existing_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir_all(base_path.join("files/documents")).unwrap();
        fs::write(base_path.join("a.pdf"), "a").unwrap();
        fs::write(base_path.join("b.pdf"), "b").unwrap();

        let first = FileOrganizer::organize("a.pdf", base_path, &mapping());
        let second = FileOrganizer::organize("b.pdf", base_path, &mapping());

        assert!(matches!(first, Outcome::Moved { .. }));
        assert!(matches!(second, Outcome::Moved { .. }));
        assert!(base_path.join("files/documents/a.pdf").is_file());
        assert!(base_path.join("files/documents/b.pdf").is_file());
    }

    #[test]
    fn test_organize_overwrites_same_named_destination() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir_all(base_path.join("files/images")).unwrap();
        fs::write(base_path.join("files/images/photo.png"), "old").unwrap();
        fs::write(base_path.join("photo.png"), "new").unwrap();

        let outcome = FileOrganizer::organize("photo.png", base_path, &mapping());

        assert!(matches!(outcome, Outcome::Moved { .. }));
        let content = fs::read_to_string(base_path.join("files/images/photo.png")).unwrap();
        assert_eq!(content, "new");
    }

    #[test]
    fn test_organize_directory_is_left_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("album.png")).unwrap();

        let outcome = FileOrganizer::organize("album.png", base_path, &mapping());

        assert!(matches!(outcome, Outcome::SkippedDirectory));
        assert!(base_path.join("album.png").is_dir());
        assert!(!base_path.join("files/images/album.png").exists());
    }

    #[test]
    fn test_organize_missing_entry_is_absent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let outcome = FileOrganizer::organize("gone.pdf", temp_dir.path(), &mapping());
        assert!(matches!(outcome, Outcome::Absent));
    }

    #[test]
    fn test_organize_reports_directory_creation_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        // A regular file where the `files` directory should go.
        fs::write(base_path.join("files"), "not a directory").unwrap();
        fs::write(base_path.join("photo.png"), "png").unwrap();

        let outcome = FileOrganizer::organize("photo.png", base_path, &mapping());

        assert!(matches!(
            outcome,
            Outcome::Failed(OrganizeError::DirectoryCreation { .. })
        ));
        assert!(base_path.join("photo.png").is_file());
    }

    #[test]
    fn test_organize_reports_move_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        // A non-empty directory occupying the destination name.
        let blocker = base_path.join("files/others/notes.xyz");
        fs::create_dir_all(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();
        fs::write(base_path.join("notes.xyz"), "notes").unwrap();

        let outcome = FileOrganizer::organize("notes.xyz", base_path, &mapping());

        assert!(matches!(
            outcome,
            Outcome::Failed(OrganizeError::MoveFailure { .. })
        ));
        assert!(base_path.join("notes.xyz").is_file());
    }

    #[test]
    fn test_plan_does_not_touch_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join("report.pdf"), "pdf").unwrap();

        let outcome = FileOrganizer::plan("report.pdf", base_path, &mapping());

        match outcome {
            Outcome::Planned {
                folder,
                destination,
            } => {
                assert_eq!(folder, "documents");
                assert_eq!(destination, base_path.join("files/documents/report.pdf"));
            }
            other => panic!("expected Planned, got {:?}", other),
        }
        assert!(base_path.join("report.pdf").is_file());
        assert!(!base_path.join("files").exists());
    }

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::new(PathBuf::from("/base"));
        report.record(
            "a.png".into(),
            Outcome::Moved {
                folder: "images".into(),
                destination: PathBuf::from("/base/files/images/a.png"),
            },
        );
        report.record(
            "b.png".into(),
            Outcome::Moved {
                folder: "images".into(),
                destination: PathBuf::from("/base/files/images/b.png"),
            },
        );
        report.record("dir".into(), Outcome::SkippedDirectory);
        report.record(
            "c.xyz".into(),
            Outcome::Failed(OrganizeError::MoveFailure {
                from: PathBuf::from("/base/c.xyz"),
                to: PathBuf::from("/base/files/others/c.xyz"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            }),
        );

        assert_eq!(report.moved_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.folder_counts().get("images"), Some(&2));
        assert!(matches!(
            report.outcome_of("dir"),
            Some(Outcome::SkippedDirectory)
        ));
        assert!(report.outcome_of("missing").is_none());
    }
}

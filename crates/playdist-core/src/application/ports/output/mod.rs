//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `playdist-adapters` crate provides implementations.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::ArtifactKey;
use crate::error::PlaydistResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

/// What `stat` reports about an existing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    pub kind: FileKind,
    pub modified: SystemTime,
}

impl EntryInfo {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `playdist_adapters::filesystem::LocalFilesystem` (production)
/// - `playdist_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// `None` when nothing exists at `path`.
    fn stat(&self, path: &Path) -> PlaydistResult<Option<EntryInfo>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> PlaydistResult<()>;

    fn remove_file(&self, path: &Path) -> PlaydistResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> PlaydistResult<()>;

    fn is_empty_dir(&self, path: &Path) -> PlaydistResult<bool>;

    /// Copy one file, replacing the destination and keeping the source's
    /// modification time.
    fn copy_file(&self, from: &Path, to: &Path) -> PlaydistResult<()>;

    fn set_modified(&self, path: &Path, time: SystemTime) -> PlaydistResult<()>;

    fn read_to_string(&self, path: &Path) -> PlaydistResult<String>;

    /// All regular files below `root`, relative to it, sorted.
    fn list_files(&self, root: &Path) -> PlaydistResult<Vec<PathBuf>>;
}

/// Port for reading archives.
///
/// Implemented by `playdist_adapters::archive::ZipUnarchiver`.
#[cfg_attr(test, mockall::automock)]
pub trait Unarchiver: Send + Sync {
    /// File entries of the archive, relative to its root.
    fn entries(&self, archive: &Path) -> PlaydistResult<Vec<PathBuf>>;

    /// Unpack into `destination`, which must already exist. Files that
    /// already exist are left untouched. Returns the number of files written.
    fn extract(&self, archive: &Path, destination: &Path) -> PlaydistResult<usize>;
}

/// One file headed for the packaged archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub source: PathBuf,
    /// `/`-separated name inside the archive.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: usize,
}

/// Port for writing the packaged distribution.
///
/// Implementations must fail with `DuplicateArchiveEntry` instead of
/// writing the same entry name twice.
#[cfg_attr(test, mockall::automock)]
pub trait Archiver: Send + Sync {
    fn create(&self, destination: &Path, entries: &[ArchiveEntry]) -> PlaydistResult<ArchiveSummary>;
}

/// Port onto the resolved dependency graph.
///
/// Implemented by `playdist_adapters::graph::DependencyGraph`, filled by the manifest loader.
#[cfg_attr(test, mockall::automock)]
pub trait DependencyTree: Send + Sync {
    /// Direct dependencies of `artifact`. Unknown keys have none.
    fn dependencies(&self, artifact: &ArtifactKey) -> PlaydistResult<Vec<ArtifactKey>>;

    /// The project's own direct dependencies, in declaration order.
    /// Empty when the source did not record them.
    fn roots(&self) -> PlaydistResult<Vec<ArtifactKey>>;
}

//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;
use walkdir::WalkDir;

use playdist_core::{
    application::{
        ApplicationError,
        ports::{EntryInfo, FileKind, Filesystem},
    },
    error::{PlaydistError, PlaydistResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn stat(&self, path: &Path) -> PlaydistResult<Option<EntryInfo>> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(map_io_error(path, e, "get metadata")),
        };
        let modified = metadata
            .modified()
            .map_err(|e| map_io_error(path, e, "read modification time"))?;
        let kind = if metadata.is_dir() {
            FileKind::Directory
        } else {
            FileKind::File
        };
        Ok(Some(EntryInfo { kind, modified }))
    }

    fn create_dir_all(&self, path: &Path) -> PlaydistResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_file(&self, path: &Path) -> PlaydistResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> PlaydistResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn is_empty_dir(&self, path: &Path) -> PlaydistResult<bool> {
        let mut entries =
            std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        Ok(entries.next().is_none())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> PlaydistResult<()> {
        std::fs::copy(from, to).map_err(|e| map_io_error(to, e, "copy file"))?;
        let metadata = std::fs::metadata(from).map_err(|e| map_io_error(from, e, "get metadata"))?;
        filetime::set_file_mtime(to, FileTime::from_last_modification_time(&metadata))
            .map_err(|e| map_io_error(to, e, "preserve modification time"))
    }

    fn set_modified(&self, path: &Path, time: SystemTime) -> PlaydistResult<()> {
        filetime::set_file_mtime(path, FileTime::from_system_time(time))
            .map_err(|e| map_io_error(path, e, "set modification time"))
    }

    fn read_to_string(&self, path: &Path) -> PlaydistResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn list_files(&self, root: &Path) -> PlaydistResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: e.path().unwrap_or(root).to_path_buf(),
                reason: format!("Failed to walk directory: {e}"),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
        Ok(files)
    }
}

pub(crate) fn map_io_error(path: &Path, e: io::Error, operation: &str) -> PlaydistError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

//! In-memory filesystem adapter for testing.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::SystemTime,
};

use playdist_core::{
    application::{
        ApplicationError,
        ports::{EntryInfo, FileKind, Filesystem},
    },
    error::PlaydistResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug)]
struct MemoryFile {
    content: Vec<u8>,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, MemoryFile>,
    directories: BTreeMap<PathBuf, SystemTime>,
}

impl MemoryFilesystemInner {
    fn add_parents(&mut self, path: &Path, now: SystemTime) {
        let mut current = PathBuf::new();
        if let Some(parent) = path.parent() {
            for component in parent.components() {
                current.push(component);
                self.directories.entry(current.clone()).or_insert(now);
            }
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Add a file with the given content and modification time, creating
    /// its parents (testing helper).
    pub fn insert_file(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) -> PlaydistResult<()> {
        let path = path.as_ref();
        let mut inner = self.write()?;
        inner.add_parents(path, modified);
        inner.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
        Ok(())
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).map(|f| f.content.clone())
    }

    /// Every file path, sorted.
    pub fn all_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> PlaydistResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| lock_error())
    }

    fn write(&self) -> PlaydistResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| lock_error())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn stat(&self, path: &Path) -> PlaydistResult<Option<EntryInfo>> {
        let inner = self.read()?;
        if let Some(file) = inner.files.get(path) {
            return Ok(Some(EntryInfo {
                kind: FileKind::File,
                modified: file.modified,
            }));
        }
        Ok(inner.directories.get(path).map(|&modified| EntryInfo {
            kind: FileKind::Directory,
            modified,
        }))
    }

    fn create_dir_all(&self, path: &Path) -> PlaydistResult<()> {
        let mut inner = self.write()?;
        let now = SystemTime::now();

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(not_found(&current, "a file is in the way"));
            }
            inner.directories.entry(current.clone()).or_insert(now);
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> PlaydistResult<()> {
        let mut inner = self.write()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path, "no such file"))
    }

    fn remove_dir_all(&self, path: &Path) -> PlaydistResult<()> {
        let mut inner = self.write()?;
        if inner.directories.remove(path).is_none() {
            return Err(not_found(path, "no such directory"));
        }
        inner.directories.retain(|p, _| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn is_empty_dir(&self, path: &Path) -> PlaydistResult<bool> {
        let inner = self.read()?;
        if !inner.directories.contains_key(path) {
            return Err(not_found(path, "no such directory"));
        }
        let has_child = inner.files.keys().any(|p| p.parent() == Some(path))
            || inner.directories.keys().any(|p| p.parent() == Some(path));
        Ok(!has_child)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> PlaydistResult<()> {
        let mut inner = self.write()?;
        let (content, modified) = match inner.files.get(from) {
            Some(file) => (file.content.clone(), file.modified),
            None => return Err(not_found(from, "no such file")),
        };
        if let Some(parent) = to.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains_key(parent) {
                return Err(not_found(to, "Parent directory does not exist"));
            }
        }
        inner
            .files
            .insert(to.to_path_buf(), MemoryFile { content, modified });
        Ok(())
    }

    fn set_modified(&self, path: &Path, time: SystemTime) -> PlaydistResult<()> {
        let mut inner = self.write()?;
        if let Some(file) = inner.files.get_mut(path) {
            file.modified = time;
            return Ok(());
        }
        match inner.directories.get_mut(path) {
            Some(modified) => {
                *modified = time;
                Ok(())
            }
            None => Err(not_found(path, "no such file or directory")),
        }
    }

    fn read_to_string(&self, path: &Path) -> PlaydistResult<String> {
        let inner = self.read()?;
        let file = inner
            .files
            .get(path)
            .ok_or_else(|| not_found(path, "no such file"))?;
        String::from_utf8(file.content.clone()).map_err(|e| not_found(path, &e.to_string()))
    }

    fn list_files(&self, root: &Path) -> PlaydistResult<Vec<PathBuf>> {
        let inner = self.read()?;
        Ok(inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(root).ok())
            .map(Path::to_path_buf)
            .collect())
    }
}

fn not_found(path: &Path, reason: &str) -> playdist_core::error::PlaydistError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

fn lock_error() -> playdist_core::error::PlaydistError {
    playdist_core::error::PlaydistError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

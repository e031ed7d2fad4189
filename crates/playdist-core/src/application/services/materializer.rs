//! Idempotent filesystem primitives.
//!
//! Both primitives report what they did, so a re-run that changes nothing
//! is observable as `Skipped` / `UpToDate`.

use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{FileKind, Filesystem, Unarchiver},
    },
    domain::Artifact,
    error::PlaydistResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Materialized {
    Extracted { files: usize },
    Skipped,
    Copied,
    UpToDate,
}

impl Materialized {
    pub fn wrote(&self) -> bool {
        matches!(self, Self::Extracted { .. } | Self::Copied)
    }
}

pub struct Materializer<'a> {
    filesystem: &'a dyn Filesystem,
    unarchiver: &'a dyn Unarchiver,
}

impl<'a> Materializer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, unarchiver: &'a dyn Unarchiver) -> Self {
        Self {
            filesystem,
            unarchiver,
        }
    }

    /// An artifact whose file is a directory was substituted by a reactor
    /// build and cannot be placed.
    pub fn check_reactor(&self, artifact: &Artifact) -> PlaydistResult<()> {
        match self.filesystem.stat(artifact.file())? {
            Some(info) if info.is_dir() => Err(ApplicationError::ReactorProblem {
                coordinates: artifact.coordinates(),
                path: artifact.file().to_path_buf(),
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// Extract a module archive into `dest`.
    ///
    /// A plain file at `dest` is removed. An existing directory is cleared
    /// when `force` is set or when it is older than the archive; extraction
    /// only ever happens into an empty directory, which is then stamped with
    /// the current time.
    #[instrument(skip_all, fields(archive = %module.file().display(), dest = %dest.display()))]
    pub fn extract_module(
        &self,
        module: &Artifact,
        dest: &Path,
        force: bool,
    ) -> PlaydistResult<Materialized> {
        self.check_reactor(module)?;

        let existing = self.filesystem.stat(dest)?;
        if let Some(info) = existing {
            if info.kind == FileKind::File {
                debug!("Removing file in the way of the module directory");
                self.filesystem.remove_file(dest)?;
            } else if force || self.is_stale(info.modified, module.file())? {
                debug!(force, "Clearing module directory");
                self.filesystem.remove_dir_all(dest)?;
            }
        }
        self.filesystem.create_dir_all(dest)?;

        if !self.filesystem.is_empty_dir(dest)? {
            debug!("Module directory up to date");
            return Ok(Materialized::Skipped);
        }

        let files = self.unarchiver.extract(module.file(), dest)?;
        self.filesystem.set_modified(dest, SystemTime::now())?;
        debug!(files, "Module extracted");
        Ok(Materialized::Extracted { files })
    }

    /// Copy a library into `dest_dir` under `file_name`.
    ///
    /// Without `force` the copy is skipped when the destination exists and
    /// is not older than the source.
    pub fn copy_library(
        &self,
        library: &Artifact,
        dest_dir: &Path,
        file_name: &str,
        force: bool,
    ) -> PlaydistResult<Materialized> {
        self.check_reactor(library)?;
        let outcome = self.copy_into(library.file(), dest_dir, file_name, force)?;
        debug!(library = %library.coordinates(), ?outcome, "Library placed");
        Ok(outcome)
    }

    /// Copy any file into `dest_dir`, with the same freshness rule.
    pub fn copy_into(
        &self,
        source: &Path,
        dest_dir: &Path,
        file_name: &str,
        force: bool,
    ) -> PlaydistResult<Materialized> {
        self.ensure_dir(dest_dir)?;

        let dest = dest_dir.join(file_name);
        if !force {
            if let Some(existing) = self.filesystem.stat(&dest)? {
                if !self.is_stale(existing.modified, source)? {
                    return Ok(Materialized::UpToDate);
                }
            }
        }

        self.filesystem.copy_file(source, &dest)?;
        Ok(Materialized::Copied)
    }

    /// Unpack without any freshness logic, for building a fresh tree.
    pub fn unpack(&self, archive: &Path, dest: &Path) -> PlaydistResult<usize> {
        self.ensure_dir(dest)?;
        self.unarchiver.extract(archive, dest)
    }

    /// Create `dir` unless it already is a directory.
    pub fn ensure_dir(&self, dir: &Path) -> PlaydistResult<()> {
        match self.filesystem.stat(dir)? {
            Some(info) if info.is_dir() => Ok(()),
            Some(_) => Err(ApplicationError::NotADirectory {
                path: dir.to_path_buf(),
            }
            .into()),
            None => self.filesystem.create_dir_all(dir),
        }
    }

    fn is_stale(&self, modified: SystemTime, source: &Path) -> PlaydistResult<bool> {
        Ok(match self.filesystem.stat(source)? {
            Some(info) => modified < info.modified,
            None => false,
        })
    }
}

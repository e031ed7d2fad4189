//! Zip adapters for the archive ports.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use playdist_core::{
    application::{
        ApplicationError,
        ports::{ArchiveEntry, ArchiveSummary, Archiver, Unarchiver},
    },
    error::{PlaydistError, PlaydistResult},
};

/// Reads module, framework and fixture archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipUnarchiver;

impl ZipUnarchiver {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, archive: &Path) -> PlaydistResult<ZipArchive<File>> {
        let file = File::open(archive).map_err(|e| extraction_error(archive, e))?;
        ZipArchive::new(file).map_err(|e| extraction_error(archive, e))
    }
}

impl Unarchiver for ZipUnarchiver {
    fn entries(&self, archive: &Path) -> PlaydistResult<Vec<PathBuf>> {
        let mut zip = self.open(archive)?;
        let mut entries = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let entry = zip.by_index(index).map_err(|e| extraction_error(archive, e))?;
            if entry.is_dir() {
                continue;
            }
            entries.push(enclosed(archive, entry.enclosed_name(), entry.name())?);
        }
        Ok(entries)
    }

    #[instrument(skip_all, fields(archive = %archive.display()))]
    fn extract(&self, archive: &Path, destination: &Path) -> PlaydistResult<usize> {
        let mut zip = self.open(archive)?;
        let mut written = 0;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index).map_err(|e| extraction_error(archive, e))?;
            let target = destination.join(enclosed(archive, entry.enclosed_name(), entry.name())?);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| extraction_error(archive, e))?;
                continue;
            }
            if target.exists() {
                debug!(path = %target.display(), "Keeping existing file");
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| extraction_error(archive, e))?;
            }
            let mut out = File::create(&target).map_err(|e| extraction_error(archive, e))?;
            io::copy(&mut entry, &mut out).map_err(|e| extraction_error(archive, e))?;
            written += 1;
        }

        debug!(files = written, "Archive extracted");
        Ok(written)
    }
}

/// Writes the packaged distribution, refusing duplicate entry names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ZipArchiver {
    #[instrument(skip_all, fields(archive = %destination.display(), entries = entries.len()))]
    fn create(&self, destination: &Path, entries: &[ArchiveEntry]) -> PlaydistResult<ArchiveSummary> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ApplicationError::DuplicateArchiveEntry {
                    entry: entry.name.clone(),
                }
                .into());
            }
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| archive_error(destination, e))?;
        }
        let file = File::create(destination).map_err(|e| archive_error(destination, e))?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in entries {
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(|e| archive_error(destination, e))?;
            let mut source = File::open(&entry.source).map_err(|e| archive_error(destination, e))?;
            io::copy(&mut source, &mut writer).map_err(|e| archive_error(destination, e))?;
        }
        writer.finish().map_err(|e| archive_error(destination, e))?;

        Ok(ArchiveSummary {
            path: destination.to_path_buf(),
            entries: entries.len(),
        })
    }
}

fn enclosed<P: AsRef<Path>>(archive: &Path, name: Option<P>, raw: &str) -> PlaydistResult<PathBuf> {
    name.map(|p| p.as_ref().to_path_buf()).ok_or_else(|| {
        ApplicationError::ExtractionFailed {
            archive: archive.to_path_buf(),
            reason: format!("entry '{raw}' escapes the destination"),
        }
        .into()
    })
}

fn extraction_error(archive: &Path, e: impl std::fmt::Display) -> PlaydistError {
    ApplicationError::ExtractionFailed {
        archive: archive.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

fn archive_error(archive: &Path, e: impl std::fmt::Display) -> PlaydistError {
    ApplicationError::ArchiveFailed {
        archive: archive.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

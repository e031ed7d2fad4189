//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Something other than a directory occupies a directory destination.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A resolved artifact points at a directory, typically a sibling
    /// reactor module that was never packaged.
    #[error("Artifact {coordinates} resolves to a directory ({path}), not a packaged file")]
    ReactorProblem { coordinates: String, path: PathBuf },

    /// Archive could not be read or unpacked.
    #[error("Cannot extract {archive}: {reason}")]
    ExtractionFailed { archive: PathBuf, reason: String },

    /// Archive could not be written.
    #[error("Cannot create archive {archive}: {reason}")]
    ArchiveFailed { archive: PathBuf, reason: String },

    /// Two files map to the same entry of the packaged archive.
    #[error("Duplicate archive entry: {entry}")]
    DuplicateArchiveEntry { entry: String },

    /// The dependency graph could not answer a query.
    #[error("Dependency tree error: {reason}")]
    DependencyTree { reason: String },

    /// The profile configuration file could not be read.
    #[error("Cannot read configuration {path}: {reason}")]
    ConfigurationUnreadable { path: PathBuf, reason: String },

    /// The resolved dependency manifest could not be loaded.
    #[error("Invalid dependency manifest {path}: {reason}")]
    ManifestInvalid { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::NotADirectory { path } => vec![
                format!("Remove or rename the file at {}", path.display()),
                "Or run with --clean".into(),
            ],
            Self::ReactorProblem { coordinates, .. } => vec![
                format!("{coordinates} is a module of the current multi-module build"),
                "Package it first so the resolver supplies a file, not a classes directory".into(),
            ],
            Self::DuplicateArchiveEntry { entry } => vec![
                format!("Two files target '{entry}'"),
                "Exclude one of the colliding dependencies".into(),
            ],
            Self::ConfigurationUnreadable { path, .. } => vec![
                format!("Check that {} exists and is readable", path.display()),
                "Use --base-dir to point at the application root".into(),
            ],
            Self::ManifestInvalid { .. } => vec![
                "The manifest must contain [[artifacts]] entries".into(),
                "Each entry needs group, name, version, type and file".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. }
            | Self::ExtractionFailed { .. }
            | Self::ArchiveFailed { .. }
            | Self::DependencyTree { .. } => ErrorCategory::Internal,
            Self::NotADirectory { .. } | Self::ReactorProblem { .. } => ErrorCategory::Validation,
            Self::DuplicateArchiveEntry { .. } => ErrorCategory::Conflict,
            Self::ConfigurationUnreadable { .. } => ErrorCategory::Configuration,
            Self::ManifestInvalid { .. } => ErrorCategory::Validation,
        }
    }
}

// ============================================================================
// domain/error.rs - RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports can carry them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Invalid artifact key '{key}': {reason}")]
    InvalidArtifactKey { key: String, reason: String },

    #[error("Duplicate artifact in resolved set: {key}")]
    DuplicateArtifact { key: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A name that becomes a directory or file name is not a single segment.
    #[error("Unsafe {what} '{value}': must not contain '/', '\\' or be '..'")]
    UnsafeName { what: String, value: String },

    #[error("Configuration syntax error at line {line}: {message}")]
    ConfigSyntax { line: usize, message: String },

    #[error("Invalid value for '{key}': {value}")]
    InvalidConfigValue { key: String, value: String },

    // ========================================================================
    // Conflicts
    // ========================================================================
    #[error("Module '{name}' is provided by both {first} and {second}")]
    ModuleConflict {
        name: String,
        first: String,
        second: String,
    },

    #[error("Duplicate destination entry '{path}': {first} and {second}")]
    DuplicateEntry {
        path: String,
        first: String,
        second: String,
    },

    // ========================================================================
    // Not Found
    // ========================================================================
    #[error("Required artifact not found: {what}")]
    MissingArtifact { what: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigSyntax { line, .. } => vec![
                format!("Check line {line} of conf/application.conf"),
                "Unicode escapes must be written as \\uXXXX".into(),
            ],
            Self::ModuleConflict { name, .. } => vec![
                format!("Two artifacts resolve to module '{name}'"),
                "Exclude one of them from the dependency list".into(),
                "Or run without --strict to keep the last one".into(),
            ],
            Self::DuplicateEntry { path, .. } => vec![
                format!("Two artifacts target '{path}'"),
                "This usually means two jars share a file name".into(),
            ],
            Self::MissingArtifact { what } => vec![
                format!("The resolved dependency set lacks {what}"),
                "Check that the dependency manifest is complete".into(),
            ],
            Self::InvalidPattern { .. } => vec![
                "Patterns look like group:name:type:version with '*' wildcards".into(),
            ],
            Self::UnsafeName { what, .. } => vec![
                format!("The {what} is used as a file name inside the output tree"),
                "Use a plain name without path separators".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArtifact(_)
            | Self::InvalidArtifactKey { .. }
            | Self::DuplicateArtifact { .. }
            | Self::InvalidPattern { .. }
            | Self::UnsafeName { .. } => ErrorCategory::Validation,
            Self::ConfigSyntax { .. } | Self::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            Self::ModuleConflict { .. } | Self::DuplicateEntry { .. } => ErrorCategory::Conflict,
            Self::MissingArtifact { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Conflict,
    NotFound,
    Internal,
}

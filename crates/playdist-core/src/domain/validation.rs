use crate::domain::{
    entities::artifact::{Artifact, ResolvedArtifacts},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Checks a resolved set before any classification runs, so later stages can
/// assume well-formed artifacts.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_artifact(artifact: &Artifact) -> Result<(), DomainError> {
        let invalid = |what: &str| {
            Err(DomainError::InvalidArtifact(format!(
                "{}: {what}",
                artifact.key()
            )))
        };

        if artifact.group().trim().is_empty() || artifact.name().trim().is_empty() {
            return invalid("group and name must not be empty");
        }
        if artifact.version().trim().is_empty() {
            return invalid("version must not be empty");
        }
        if artifact.file().as_os_str().is_empty() {
            return invalid("no resolved file");
        }
        // Both end up in `<name>-<version>` directory and file names.
        Self::validate_segment("artifact name", artifact.name())?;
        Self::validate_segment("artifact version", artifact.version())?;
        Ok(())
    }

    pub fn validate_resolved(artifacts: &ResolvedArtifacts) -> Result<(), DomainError> {
        artifacts
            .iter()
            .try_for_each(|(_, artifact)| Self::validate_artifact(artifact))
    }

    /// `value` must stay a single path segment below its parent directory.
    pub fn validate_segment(what: &str, value: &str) -> Result<(), DomainError> {
        if value.contains(['/', '\\']) || value == "." || value == ".." {
            return Err(DomainError::UnsafeName {
                what: what.to_string(),
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

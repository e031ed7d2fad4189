pub mod artifact;
pub mod assembly_plan;

pub use crate::domain::DomainError;
pub use artifact::{Artifact, ArtifactId, ArtifactKey, ResolvedArtifacts};
pub use assembly_plan::{AssemblyPlan, EntryKind, PlannedEntry, PlannedExtraction};

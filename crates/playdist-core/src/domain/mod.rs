// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for playdist.
//!
//! This module contains pure business logic. All filesystem, archive and
//! dependency-graph concerns are handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few external crates**: std, thiserror, serde, glob, tracing events
//! - **Immutable entities**: Artifacts never change once resolved
//! - **Handles, not references**: Assembly works on `ArtifactId`s
//!
// Public API - what the world sees
pub mod activation;
pub mod classifier;
pub mod entities;
pub mod error;
pub mod filter;
pub mod layout;
pub mod pool;
pub mod profile;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use activation::{Activation, ActivationResolver, Mode, ModuleEntry, Placement};
pub use classifier::{
    Classification, FrameworkArtifacts, ModuleArtifactMap, ModuleClassifier, ModuleConflict,
    find_framework, zip_module_name,
};
pub use entities::{
    Artifact, ArtifactId, ArtifactKey, AssemblyPlan, EntryKind, PlannedEntry, PlannedExtraction,
    ResolvedArtifacts,
};
pub use error::{DomainError, ErrorCategory};
pub use filter::{ArtifactPattern, DependencyFilter, PathFilter};
pub use layout::{DestinationLayout, dist_file_name, framework_jar_name, library_file_name};
pub use pool::{Claim, WorkingArtifactPool};
pub use profile::ProfileConfig;
pub use validation::DomainValidator;
pub use value_objects::{ArtifactType, Classifier, Scope};

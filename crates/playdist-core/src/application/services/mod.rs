//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "extract dependencies" or "assemble a dist".

pub mod dependencies_service;
pub mod dist_service;
pub mod materializer;
pub mod module_service;
pub mod partitioner;
pub mod pipeline;

pub use dependencies_service::{
    DependenciesOptions, DependenciesReport, DependenciesService, ModulePlacement,
};
pub use dist_service::{DEFAULT_APPLICATION_INCLUDES, DistModule, DistReport, DistRequest, DistService};
pub use materializer::{Materialized, Materializer};
pub use module_service::{ModuleInfo, ModuleListing, ModuleService, ModuleStatus};
pub use partitioner::SubtreePartitioner;
pub use pipeline::{CONFIGURATION_FILE, DEFAULT_EXCLUDED_ARTIFACT};

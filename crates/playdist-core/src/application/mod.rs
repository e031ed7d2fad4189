//! Application layer for Playdist.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (DependenciesService, DistService, ModuleService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Classification, activation and layout rules
//! live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DependenciesOptions, DependenciesReport, DependenciesService, DistReport, DistRequest,
    DistService, Materialized, ModuleInfo, ModuleListing, ModuleService, ModuleStatus,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Archiver, DependencyTree, Filesystem, Unarchiver};

pub use error::ApplicationError;

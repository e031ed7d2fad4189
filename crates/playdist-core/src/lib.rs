//! Playdist Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Playdist,
//! which lays out the resolved dependencies of a Play! 1.x application
//! either in place (`modules/`, `lib/`) or as a standalone distribution.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           playdist-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (DependenciesService, DistService)     │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Unarchiver, Archiver, Tree)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    playdist-adapters (Infrastructure)   │
//! │(LocalFilesystem, Zip*, DependencyGraph) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Artifact, ProfileConfig, Classifier,   │
//! │  WorkingArtifactPool, AssemblyPlan)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use playdist_core::application::{DependenciesOptions, DependenciesService};
//!
//! // Adapters come from playdist-adapters
//! let service = DependenciesService::new(Box::new(filesystem), Box::new(unarchiver));
//! let report = service.run(base_dir, &artifacts, &graph, &DependenciesOptions::default())?;
//! println!("{} modules placed", report.modules.len());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DependenciesOptions, DependenciesReport, DependenciesService, DistReport, DistRequest,
        DistService, ModuleListing, ModuleService,
        ports::{Archiver, DependencyTree, Filesystem, Unarchiver},
    };
    pub use crate::domain::{
        Artifact, ArtifactKey, ArtifactType, Mode, ProfileConfig, ResolvedArtifacts, Scope,
    };
    pub use crate::error::{PlaydistError, PlaydistResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

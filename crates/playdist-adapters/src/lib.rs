//! Infrastructure adapters for Playdist.
//!
//! This crate implements the ports defined in `playdist-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod archive;
pub mod filesystem;
pub mod graph;
pub mod manifest;

// Re-export commonly used adapters
pub use archive::{ZipArchiver, ZipUnarchiver};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use graph::DependencyGraph;
pub use manifest::{ResolvedManifest, load_manifest, parse_manifest};

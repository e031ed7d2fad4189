//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `playdist-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `Unarchiver` / `Archiver`: Zip reading and writing
//!   - `DependencyTree`: Edges and roots of the resolved dependency graph
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ArchiveEntry, ArchiveSummary, Archiver, DependencyTree, EntryInfo, FileKind, Filesystem,
    Unarchiver,
};

#[cfg(test)]
pub use output::{MockArchiver, MockDependencyTree, MockFilesystem, MockUnarchiver};

//! In-memory dependency graph.

use std::collections::HashMap;

use playdist_core::{application::ports::DependencyTree, domain::ArtifactKey, error::PlaydistResult};

/// Direct edges keyed by artifact, as reported by the resolver, plus the
/// project's own direct dependencies.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: HashMap<ArtifactKey, Vec<ArtifactKey>>,
    roots: Vec<ArtifactKey>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `from` depends directly on `to`. Repeated edges are kept once.
    pub fn add_edge(&mut self, from: ArtifactKey, to: ArtifactKey) {
        let targets = self.edges.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    /// Builder form of [`add_edge`](Self::add_edge).
    pub fn with_edge(mut self, from: ArtifactKey, to: ArtifactKey) -> Self {
        self.add_edge(from, to);
        self
    }

    /// Record a direct dependency of the project itself.
    pub fn add_root(&mut self, key: ArtifactKey) {
        if !self.roots.contains(&key) {
            self.roots.push(key);
        }
    }

    pub fn with_root(mut self, key: ArtifactKey) -> Self {
        self.add_root(key);
        self
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}

impl DependencyTree for DependencyGraph {
    fn dependencies(&self, artifact: &ArtifactKey) -> PlaydistResult<Vec<ArtifactKey>> {
        Ok(self.edges.get(artifact).cloned().unwrap_or_default())
    }

    fn roots(&self) -> PlaydistResult<Vec<ArtifactKey>> {
        Ok(self.roots.clone())
    }
}

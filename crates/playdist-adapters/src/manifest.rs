//! Resolved-dependency manifest loader.
//!
//! The manifest is written by the external resolver and lists every
//! resolved artifact with its direct dependencies. The top-level
//! `dependencies` names the project's own direct dependencies; they anchor
//! the resolved tree, so a library the project uses itself never lands
//! with a module. JSON and TOML are both accepted; the format follows the
//! file extension.
//!
//! ```toml
//! dependencies = [
//!     "com.google.code.maven-play-plugin.org.playframework:play",
//!     "com.example:play-pdf:zip:module",
//! ]
//!
//! [[artifacts]]
//! group        = "com.google.code.maven-play-plugin.org.playframework"
//! name         = "play"
//! version      = "1.2.5"
//! type         = "jar"            # default "jar"
//! scope        = "compile"        # default "compile"
//! file         = "repo/play-1.2.5.jar"
//! dependencies = ["org.apache.commons:commons-lang:jar"]
//!
//! [[artifacts]]
//! group      = "com.example"
//! name       = "play-pdf"
//! version    = "0.9"
//! type       = "zip"
//! classifier = "module"
//! scope      = "provided"
//! file       = "repo/play-pdf-0.9-module.zip"
//! ```
//!
//! Relative `file` paths are resolved against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use playdist_core::{
    application::ApplicationError,
    domain::{Artifact, ArtifactKey, ArtifactType, ResolvedArtifacts, Scope},
    error::{PlaydistError, PlaydistResult},
};

use crate::graph::DependencyGraph;

/// Deserialised representation of a manifest file.
#[derive(Debug, Deserialize, Clone)]
pub struct Manifest {
    /// The project's direct dependencies, in declaration order.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub artifacts: Vec<ManifestEntry>,
}

/// One entry under `[[artifacts]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct ManifestEntry {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    pub classifier: Option<String>,
    #[serde(default)]
    pub scope: Scope,
    pub file: PathBuf,
    /// Overrides the type-based classpath default.
    pub classpath: Option<bool>,
    /// Direct dependencies as `group:name[:type[:classifier]]` keys.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_type() -> String {
    ArtifactType::Jar.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// A loaded manifest: the resolved set and its edges.
#[derive(Debug, Clone)]
pub struct ResolvedManifest {
    pub artifacts: ResolvedArtifacts,
    pub graph: DependencyGraph,
}

/// Load and validate the manifest at `path`.
#[instrument(fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> PlaydistResult<ResolvedManifest> {
    let raw = fs::read_to_string(path).map_err(|e| invalid(path, format!("failed to read: {e}")))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    parse_manifest(&raw, ManifestFormat::of(path) == ManifestFormat::Toml, base)
        .map_err(|e| match e {
            PlaydistError::Application(ApplicationError::ManifestInvalid { reason, .. }) => {
                invalid(path, reason)
            }
            other => other,
        })
}

/// Parse manifest text. Relative files are joined onto `base`.
pub fn parse_manifest(raw: &str, toml_format: bool, base: &Path) -> PlaydistResult<ResolvedManifest> {
    let manifest: Manifest = if toml_format {
        toml::from_str(raw).map_err(|e| invalid(base, e.to_string()))?
    } else {
        serde_json::from_str(raw).map_err(|e| invalid(base, e.to_string()))?
    };

    let mut graph = DependencyGraph::new();
    for dep in &manifest.dependencies {
        graph.add_root(dep.parse()?);
    }
    let mut artifacts = Vec::with_capacity(manifest.artifacts.len());

    for entry in manifest.artifacts {
        let mut key = ArtifactKey::new(entry.group, entry.name, ArtifactType::from(entry.kind));
        if let Some(classifier) = entry.classifier.filter(|c| !c.is_empty()) {
            key = key.with_classifier(classifier);
        }
        for dep in &entry.dependencies {
            let to: ArtifactKey = dep.parse()?;
            graph.add_edge(key.clone(), to);
        }

        let file = if entry.file.is_absolute() {
            entry.file
        } else {
            base.join(entry.file)
        };
        let mut artifact = Artifact::new(key, entry.version, entry.scope, file);
        if let Some(classpath) = entry.classpath {
            artifact = artifact.with_classpath(classpath);
        }
        artifacts.push(artifact);
    }

    let artifacts = ResolvedArtifacts::new(artifacts)?;
    debug!(artifacts = artifacts.len(), edges = graph.edge_count(), "Manifest loaded");
    Ok(ResolvedManifest { artifacts, graph })
}

fn invalid(path: &Path, reason: String) -> PlaydistError {
    ApplicationError::ManifestInvalid {
        path: path.to_path_buf(),
        reason,
    }
    .into()
}

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{ArtifactType, Classifier, Scope},
};

/// Resolution identity of an artifact: `group:name:type[:classifier]`.
///
/// The version is not part of the key; a resolved set holds at most one
/// version per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub group: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    pub classifier: Option<Classifier>,
}

impl ArtifactKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>, kind: ArtifactType) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            kind,
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<Classifier>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Key of the jar sharing this key's group and name.
    pub fn sibling_jar(&self) -> Self {
        Self::new(self.group.clone(), self.name.clone(), ArtifactType::Jar)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.kind)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let invalid = |reason: &str| DomainError::InvalidArtifactKey {
            key: s.to_string(),
            reason: reason.to_string(),
        };

        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid("empty segment"));
        }

        match parts.as_slice() {
            [group, name] => Ok(Self::new(*group, *name, ArtifactType::Jar)),
            [group, name, kind] => Ok(Self::new(*group, *name, ArtifactType::from(*kind))),
            [group, name, kind, classifier] => {
                Ok(Self::new(*group, *name, ArtifactType::from(*kind)).with_classifier(*classifier))
            }
            _ => Err(invalid("expected group:name[:type[:classifier]]")),
        }
    }
}

/// One resolved dependency with a concrete local file.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    key: ArtifactKey,
    version: String,
    scope: Scope,
    file: PathBuf,
    classpath: bool,
}

impl Artifact {
    pub fn new(key: ArtifactKey, version: impl Into<String>, scope: Scope, file: impl Into<PathBuf>) -> Self {
        let classpath = key.kind.is_classpath_default();
        Self {
            key,
            version: version.into(),
            scope,
            file: file.into(),
            classpath,
        }
    }

    /// Override the classpath flag reported by the resolver.
    pub fn with_classpath(mut self, classpath: bool) -> Self {
        self.classpath = classpath;
        self
    }

    pub fn key(&self) -> &ArtifactKey {
        &self.key
    }

    pub fn group(&self) -> &str {
        &self.key.group
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn kind(&self) -> &ArtifactType {
        &self.key.kind
    }

    pub fn classifier(&self) -> Option<&Classifier> {
        self.key.classifier.as_ref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// File name of the resolved file, as placed in library directories.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}-{}.{}", self.key.name, self.version, self.key.kind))
    }

    pub fn is_classpath_eligible(&self) -> bool {
        self.classpath
    }

    /// `group:name:type:version` for diagnostics.
    pub fn coordinates(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.key.group, self.key.name, self.key.kind, self.version
        )
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.key, self.version, self.scope)
    }
}

/// Handle into a [`ResolvedArtifacts`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(usize);

impl ArtifactId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The whole resolved dependency set of one build.
///
/// Owned by the caller and never mutated by the core. Assembly works on
/// [`ArtifactId`] handles into this arena.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArtifacts {
    artifacts: Vec<Artifact>,
    by_key: HashMap<ArtifactKey, ArtifactId>,
}

impl ResolvedArtifacts {
    pub fn new(artifacts: impl IntoIterator<Item = Artifact>) -> Result<Self, DomainError> {
        let mut set = Self::default();
        for artifact in artifacts {
            set.push(artifact)?;
        }
        Ok(set)
    }

    fn push(&mut self, artifact: Artifact) -> Result<ArtifactId, DomainError> {
        if self.by_key.contains_key(artifact.key()) {
            return Err(DomainError::DuplicateArtifact {
                key: artifact.key().to_string(),
            });
        }
        let id = ArtifactId(self.artifacts.len());
        self.by_key.insert(artifact.key().clone(), id);
        self.artifacts.push(artifact);
        Ok(id)
    }

    /// Look an artifact up by handle.
    ///
    /// Handles are only minted by this arena, so indexing cannot go out of
    /// bounds for a handle obtained from the same set.
    pub fn get(&self, id: ArtifactId) -> &Artifact {
        &self.artifacts[id.0]
    }

    pub fn find(&self, key: &ArtifactKey) -> Option<ArtifactId> {
        self.by_key.get(key).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = ArtifactId> + '_ {
        (0..self.artifacts.len()).map(ArtifactId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &Artifact)> {
        self.artifacts
            .iter()
            .enumerate()
            .map(|(i, a)| (ArtifactId(i), a))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

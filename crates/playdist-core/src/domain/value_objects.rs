//! Domain value objects: ArtifactType, Scope, Classifier.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. This
//! file's only job is to define the types, their string representations,
//! and their `FromStr` parsers. Unknown type and classifier strings are kept
//! verbatim in an `Other` variant because resolvers emit arbitrary values.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ArtifactType ─────────────────────────────────────────────────────────────

/// Packaging type of a resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ArtifactType {
    Jar,
    Zip,
    Play,
    Other(String),
}

impl ArtifactType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Jar => "jar",
            Self::Zip => "zip",
            Self::Play => "play",
            Self::Other(s) => s,
        }
    }

    /// Whether artifacts of this type go on the runtime classpath when the
    /// resolver did not say explicitly.
    pub fn is_classpath_default(&self) -> bool {
        matches!(self, Self::Jar) || matches!(self, Self::Other(s) if s == "test-jar" || s == "ejb")
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ArtifactType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "jar" => Self::Jar,
            "zip" => Self::Zip,
            "play" => Self::Play,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ArtifactType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ArtifactType> for String {
    fn from(t: ArtifactType) -> Self {
        t.as_str().to_string()
    }
}

// ── Classifier ───────────────────────────────────────────────────────────────

/// Artifact classifier. Absence of a classifier is `Option::None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Classifier {
    Module,
    ModuleMin,
    Framework,
    FrameworkMin,
    Other(String),
}

impl Classifier {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Module => "module",
            Self::ModuleMin => "module-min",
            Self::Framework => "framework",
            Self::FrameworkMin => "framework-min",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Classifier {
    fn from(s: String) -> Self {
        match s.as_str() {
            "module" => Self::Module,
            "module-min" => Self::ModuleMin,
            "framework" => Self::Framework,
            "framework-min" => Self::FrameworkMin,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Classifier {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Classifier> for String {
    fn from(c: Classifier) -> Self {
        c.as_str().to_string()
    }
}

// ── Scope ────────────────────────────────────────────────────────────────────

/// Dependency scope as reported by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
}

impl Scope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::Test => "test",
            Self::System => "system",
        }
    }

    pub const fn is_provided(self) -> bool {
        matches!(self, Self::Provided)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compile" => Ok(Self::Compile),
            "runtime" => Ok(Self::Runtime),
            "provided" => Ok(Self::Provided),
            "test" => Ok(Self::Test),
            "system" => Ok(Self::System),
            other => Err(DomainError::InvalidArtifact(format!("unknown scope: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_parse_to_variants() {
        assert_eq!(ArtifactType::from("jar"), ArtifactType::Jar);
        assert_eq!(ArtifactType::from("play"), ArtifactType::Play);
        assert_eq!(ArtifactType::from("pom"), ArtifactType::Other("pom".into()));
    }

    #[test]
    fn only_jar_like_types_default_to_classpath() {
        assert!(ArtifactType::Jar.is_classpath_default());
        assert!(ArtifactType::from("test-jar").is_classpath_default());
        assert!(!ArtifactType::Zip.is_classpath_default());
        assert!(!ArtifactType::Play.is_classpath_default());
    }

    #[test]
    fn classifier_keeps_unknown_values() {
        assert_eq!(Classifier::from("module-min"), Classifier::ModuleMin);
        assert_eq!(Classifier::from("sources").as_str(), "sources");
    }

    #[test]
    fn scope_parses_case_insensitively() {
        assert_eq!("Provided".parse::<Scope>().unwrap(), Scope::Provided);
        assert!("weird".parse::<Scope>().is_err());
    }

    #[test]
    fn type_serializes_as_plain_string() {
        let json = serde_json::to_string(&ArtifactType::Zip).unwrap();
        assert_eq!(json, "\"zip\"");
        let back: ArtifactType = serde_json::from_str("\"war\"").unwrap();
        assert_eq!(back, ArtifactType::Other("war".into()));
    }
}

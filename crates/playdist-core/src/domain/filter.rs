//! Include/exclude filters.
//!
//! Two flavours share the comma-separated pattern syntax:
//! - [`DependencyFilter`] matches artifacts by `group:name:type:version`
//!   with `*` wildcards inside each segment. It acts transitively: an
//!   artifact counts as matched when it or anything depending on it matches.
//! - [`PathFilter`] matches application resource paths with Ant-style globs
//!   (`app/**`, `conf/*.conf`).

use glob::{MatchOptions, Pattern};

use crate::domain::{entities::artifact::Artifact, error::DomainError};

const PATH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Split a comma-separated list, dropping blanks.
pub fn split_patterns(list: &str) -> Vec<&str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn compile(pattern: &str) -> Result<Pattern, DomainError> {
    Pattern::new(pattern).map_err(|e| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })
}

// ── Artifact patterns ─────────────────────────────────────────────────────────

/// `group[:name[:type[:version]]]`, or with a classifier before the version.
#[derive(Debug, Clone)]
pub struct ArtifactPattern {
    source: String,
    tokens: Vec<Pattern>,
}

impl ArtifactPattern {
    pub fn parse(pattern: &str) -> Result<Self, DomainError> {
        let segments: Vec<&str> = pattern.split(':').collect();
        if segments.len() > 5 || segments.iter().any(|s| s.is_empty()) {
            return Err(DomainError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "expected group[:name[:type[:classifier]:version]]".into(),
            });
        }
        let tokens = segments
            .into_iter()
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, artifact: &Artifact) -> bool {
        let plain = [
            artifact.group(),
            artifact.name(),
            artifact.kind().as_str(),
            artifact.version(),
        ];
        if self.matches_tokens(&plain) {
            return true;
        }
        match artifact.classifier() {
            Some(classifier) => self.matches_tokens(&[
                artifact.group(),
                artifact.name(),
                artifact.kind().as_str(),
                classifier.as_str(),
                artifact.version(),
            ]),
            None => false,
        }
    }

    fn matches_tokens(&self, candidate: &[&str]) -> bool {
        self.tokens.len() <= candidate.len()
            && self
                .tokens
                .iter()
                .zip(candidate)
                .all(|(p, value)| p.matches(value))
    }
}

/// Include/exclude filter over dependency artifacts.
#[derive(Debug, Clone, Default)]
pub struct DependencyFilter {
    includes: Vec<ArtifactPattern>,
    excludes: Vec<ArtifactPattern>,
}

impl DependencyFilter {
    pub fn new(includes: &str, excludes: &str) -> Result<Self, DomainError> {
        let parse = |list: &str| {
            split_patterns(list)
                .into_iter()
                .map(ArtifactPattern::parse)
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            includes: parse(includes)?,
            excludes: parse(excludes)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }

    /// `trail` is the artifact itself followed by every artifact that
    /// depends on it, directly or transitively.
    pub fn allows(&self, trail: &[&Artifact]) -> bool {
        let hit = |patterns: &[ArtifactPattern]| {
            trail
                .iter()
                .any(|artifact| patterns.iter().any(|p| p.matches(artifact)))
        };
        let included = self.includes.is_empty() || hit(&self.includes);
        included && !hit(&self.excludes)
    }
}

// ── Path patterns ─────────────────────────────────────────────────────────────

/// Include/exclude filter over `/`-separated relative paths.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PathFilter {
    pub fn new(includes: &str, excludes: &str) -> Result<Self, DomainError> {
        let parse = |list: &str| {
            split_patterns(list)
                .into_iter()
                .map(|p| {
                    // Ant: a trailing slash means everything below.
                    if p.ends_with('/') {
                        compile(&format!("{p}**"))
                    } else {
                        compile(p)
                    }
                })
                .collect::<Result<Vec<_>, _>>()
        };
        Ok(Self {
            includes: parse(includes)?,
            excludes: parse(excludes)?,
        })
    }

    pub fn matches(&self, relative: &str) -> bool {
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| p.matches_with(relative, PATH_MATCH));
        included
            && !self
                .excludes
                .iter()
                .any(|p| p.matches_with(relative, PATH_MATCH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::artifact::ArtifactKey,
        value_objects::{ArtifactType, Scope},
    };

    fn artifact(group: &str, name: &str, version: &str) -> Artifact {
        Artifact::new(
            ArtifactKey::new(group, name, ArtifactType::Jar),
            version,
            Scope::Compile,
            format!("/{name}.jar"),
        )
    }

    #[test]
    fn pattern_prefix_matching() {
        let a = artifact("org.hibernate", "hibernate-core", "3.6.1");
        assert!(ArtifactPattern::parse("org.hibernate").unwrap().matches(&a));
        assert!(ArtifactPattern::parse("org.*:*-core").unwrap().matches(&a));
        assert!(ArtifactPattern::parse("*:*:jar:3.6.*").unwrap().matches(&a));
        assert!(!ArtifactPattern::parse("org.hibernate:*:zip").unwrap().matches(&a));
    }

    #[test]
    fn pattern_with_classifier_segment() {
        let a = Artifact::new(
            ArtifactKey::new("g", "ext", ArtifactType::Zip).with_classifier("module"),
            "1.0",
            Scope::Compile,
            "/ext.zip",
        );
        assert!(ArtifactPattern::parse("g:ext:zip:module:1.0").unwrap().matches(&a));
        assert!(!ArtifactPattern::parse("g:ext:zip:module-min:1.0").unwrap().matches(&a));
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        assert!(ArtifactPattern::parse("a::b").is_err());
        assert!(ArtifactPattern::parse("a:b:c:d:e:f").is_err());
        assert!(ArtifactPattern::parse("[").is_err());
    }

    #[test]
    fn empty_filter_allows_everything() {
        let f = DependencyFilter::new("", " , ").unwrap();
        assert!(f.is_empty());
        assert!(f.allows(&[&artifact("g", "a", "1")]));
    }

    #[test]
    fn excludes_act_transitively() {
        let f = DependencyFilter::new("", "com.acme:parent").unwrap();
        let child = artifact("org.lib", "child", "1");
        let parent = artifact("com.acme", "parent", "1");
        assert!(f.allows(&[&child]));
        assert!(!f.allows(&[&child, &parent]));
    }

    #[test]
    fn includes_act_transitively() {
        let f = DependencyFilter::new("com.acme:*", "").unwrap();
        let child = artifact("org.lib", "child", "1");
        let parent = artifact("com.acme", "parent", "1");
        assert!(!f.allows(&[&child]));
        assert!(f.allows(&[&child, &parent]));
    }

    #[test]
    fn path_filter_globs() {
        let f = PathFilter::new("app/**,conf/**,public/", "conf/*.bak").unwrap();
        assert!(f.matches("app/controllers/Application.java"));
        assert!(f.matches("conf/application.conf"));
        assert!(f.matches("public/images/logo.png"));
        assert!(!f.matches("conf/old.bak"));
        assert!(!f.matches("target/classes/x.class"));
    }

    #[test]
    fn path_filter_star_does_not_cross_directories() {
        let f = PathFilter::new("conf/*", "").unwrap();
        assert!(f.matches("conf/routes"));
        assert!(!f.matches("conf/sub/routes"));
    }
}

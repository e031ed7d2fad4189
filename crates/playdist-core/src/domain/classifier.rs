//! Module classification.
//!
//! Turns the resolved artifact set into the canonical `module name → module
//! artifact` map, and locates the framework artifacts.
//!
//! Precedence is an explicit three-pass reduction, so the result never
//! depends on where an artifact sits in the input:
//!
//! 1. `zip` + `module`: first one per name wins.
//! 2. `zip` + `module-min`: overwrites whatever pass 1 chose.
//! 3. `play`: name is the artifact name verbatim, overwrites.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{
    entities::artifact::{Artifact, ArtifactId, ResolvedArtifacts},
    error::DomainError,
    validation::DomainValidator,
    value_objects::{ArtifactType, Classifier},
};

const MODULE_NAME_PREFIX: &str = "play-";

/// Module name → chosen module artifact. At most one entry per name,
/// iterated in lexicographic name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleArtifactMap {
    entries: BTreeMap<String, ArtifactId>,
}

impl ModuleArtifactMap {
    pub fn get(&self, name: &str) -> Option<ArtifactId> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ArtifactId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two distinct artifacts competing for one module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleConflict {
    pub name: String,
    pub kept: String,
    pub discarded: String,
}

/// Result of one classification pass.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub modules: ModuleArtifactMap,
    pub conflicts: Vec<ModuleConflict>,
}

/// Builds [`ModuleArtifactMap`]s.
///
/// In strict mode the first conflict is an error instead of a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleClassifier {
    strict: bool,
}

impl ModuleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(strict: bool) -> Self {
        Self { strict }
    }

    pub fn classify(&self, artifacts: &ResolvedArtifacts) -> Result<Classification, DomainError> {
        let mut entries: BTreeMap<String, ArtifactId> = BTreeMap::new();
        let mut conflicts = Vec::new();

        // Pass 1: plain module zips, first wins.
        for (id, artifact) in zips_with(artifacts, &Classifier::Module) {
            let name = module_name(zip_module_name(artifact))?;
            match entries.get(&name) {
                None => {
                    entries.insert(name, id);
                }
                Some(&existing) => conflicts.push(conflict(artifacts, name, existing, id)),
            }
        }

        // Pass 2: module-min always replaces a plain module.
        for (id, artifact) in zips_with(artifacts, &Classifier::ModuleMin) {
            let name = module_name(zip_module_name(artifact))?;
            if let Some(previous) = entries.insert(name.clone(), id) {
                let previous_is_min =
                    artifacts.get(previous).classifier() == Some(&Classifier::ModuleMin);
                if previous_is_min {
                    conflicts.push(conflict(artifacts, name, id, previous));
                }
            }
        }

        // Pass 3: play-typed artifacts, last write wins.
        for (id, artifact) in artifacts.iter() {
            if *artifact.kind() != ArtifactType::Play {
                continue;
            }
            let name = module_name(artifact.name().to_string())?;
            if let Some(previous) = entries.insert(name.clone(), id) {
                conflicts.push(conflict(artifacts, name, id, previous));
            }
        }

        for c in &conflicts {
            warn!(
                module = %c.name,
                kept = %c.kept,
                discarded = %c.discarded,
                "Module name conflict"
            );
        }

        if self.strict {
            if let Some(c) = conflicts.first() {
                return Err(DomainError::ModuleConflict {
                    name: c.name.clone(),
                    first: c.kept.clone(),
                    second: c.discarded.clone(),
                });
            }
        }

        Ok(Classification {
            modules: ModuleArtifactMap { entries },
            conflicts,
        })
    }
}

/// Module name of a zip module artifact: the artifact name without a
/// leading `play-`.
pub fn zip_module_name(artifact: &Artifact) -> String {
    artifact
        .name()
        .strip_prefix(MODULE_NAME_PREFIX)
        .unwrap_or(artifact.name())
        .to_string()
}

/// Module names become `modules/<name>/` directories.
fn module_name(name: String) -> Result<String, DomainError> {
    DomainValidator::validate_segment("module name", &name)?;
    Ok(name)
}

fn zips_with<'a>(
    artifacts: &'a ResolvedArtifacts,
    classifier: &'a Classifier,
) -> impl Iterator<Item = (ArtifactId, &'a Artifact)> + 'a {
    artifacts.iter().filter(move |(_, a)| {
        *a.kind() == ArtifactType::Zip && a.classifier() == Some(classifier)
    })
}

fn conflict(
    artifacts: &ResolvedArtifacts,
    name: String,
    kept: ArtifactId,
    discarded: ArtifactId,
) -> ModuleConflict {
    ModuleConflict {
        name,
        kept: artifacts.get(kept).coordinates(),
        discarded: artifacts.get(discarded).coordinates(),
    }
}

// ── Framework ────────────────────────────────────────────────────────────────

/// The framework distribution zip (if resolved) and its runtime jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkArtifacts {
    pub zip: ArtifactId,
    pub jar: ArtifactId,
}

/// Locate the framework zip (`framework-min` preferred over `framework`)
/// and the jar sharing its group and name.
pub fn find_framework(artifacts: &ResolvedArtifacts) -> Result<FrameworkArtifacts, DomainError> {
    let zip = zips_with(artifacts, &Classifier::FrameworkMin)
        .chain(zips_with(artifacts, &Classifier::Framework))
        .map(|(id, _)| id)
        .next()
        .ok_or_else(|| DomainError::MissingArtifact {
            what: "the framework zip (type zip, classifier framework)".into(),
        })?;

    let jar_key = artifacts.get(zip).key().sibling_jar();
    let jar = artifacts
        .find(&jar_key)
        .ok_or_else(|| DomainError::MissingArtifact {
            what: format!("the framework jar {jar_key}"),
        })?;

    Ok(FrameworkArtifacts { zip, jar })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{entities::artifact::ArtifactKey, value_objects::Scope};

    fn zip(name: &str, classifier: &str, version: &str) -> Artifact {
        Artifact::new(
            ArtifactKey::new("org.example", name, ArtifactType::Zip).with_classifier(classifier),
            version,
            Scope::Compile,
            format!("/repo/{name}-{version}-{classifier}.zip"),
        )
    }

    fn play(group: &str, name: &str) -> Artifact {
        Artifact::new(
            ArtifactKey::new(group, name, ArtifactType::Play),
            "1.0",
            Scope::Compile,
            format!("/repo/{name}.play"),
        )
    }

    fn jar(name: &str) -> Artifact {
        Artifact::new(
            ArtifactKey::new("org.example", name, ArtifactType::Jar),
            "1.0",
            Scope::Compile,
            format!("/repo/{name}-1.0.jar"),
        )
    }

    fn classify(list: Vec<Artifact>) -> (ResolvedArtifacts, Classification) {
        let set = ResolvedArtifacts::new(list).unwrap();
        let result = ModuleClassifier::new().classify(&set).unwrap();
        (set, result)
    }

    #[test]
    fn play_prefix_is_stripped_from_zip_modules() {
        let (set, c) = classify(vec![zip("play-crud", "module", "1.0")]);
        let id = c.modules.get("crud").unwrap();
        assert_eq!(set.get(id).name(), "play-crud");
    }

    #[test]
    fn play_typed_artifacts_keep_their_name() {
        let (_, c) = classify(vec![play("g", "play-secure")]);
        assert!(c.modules.contains("play-secure"));
    }

    #[test]
    fn non_module_artifacts_are_ignored() {
        let (_, c) = classify(vec![jar("core"), zip("docs", "sources", "1.0")]);
        assert!(c.modules.is_empty());
    }

    #[test]
    fn module_names_that_escape_their_directory_are_rejected() {
        let set = ResolvedArtifacts::new(vec![zip("play-..", "module", "1.0")]).unwrap();
        let err = ModuleClassifier::new().classify(&set).unwrap_err();
        assert!(matches!(err, DomainError::UnsafeName { .. }));
    }

    #[test]
    fn module_min_wins_in_either_order() {
        for list in [
            vec![zip("play-ext", "module", "1.0"), zip("ext", "module-min", "1.0")],
            vec![zip("ext", "module-min", "1.0"), zip("play-ext", "module", "1.0")],
        ] {
            let (set, c) = classify(list);
            let chosen = set.get(c.modules.get("ext").unwrap());
            assert_eq!(chosen.classifier(), Some(&Classifier::ModuleMin));
            assert!(c.conflicts.is_empty());
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let set = ResolvedArtifacts::new(vec![
            zip("play-a", "module", "1.0"),
            zip("b", "module-min", "2.0"),
            play("g", "c"),
        ])
        .unwrap();
        let classifier = ModuleClassifier::new();
        let first = classifier.classify(&set).unwrap();
        let second = classifier.classify(&set).unwrap();
        assert_eq!(first.modules, second.modules);
    }

    #[test]
    fn modules_iterate_in_name_order() {
        let (_, c) = classify(vec![
            zip("zeta", "module", "1.0"),
            zip("alpha", "module", "1.0"),
            play("g", "mid"),
        ]);
        assert_eq!(c.modules.names().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn duplicate_play_modules_are_reported() {
        let (set, c) = classify(vec![play("g1", "secure"), play("g2", "secure")]);
        assert_eq!(c.conflicts.len(), 1);
        assert_eq!(set.get(c.modules.get("secure").unwrap()).group(), "g2");
        assert_eq!(c.conflicts[0].discarded, "g1:secure:play:1.0");
    }

    #[test]
    fn strict_mode_fails_on_conflict() {
        let set = ResolvedArtifacts::new(vec![play("g1", "secure"), play("g2", "secure")]).unwrap();
        let result = ModuleClassifier::strict(true).classify(&set);
        assert!(matches!(result, Err(DomainError::ModuleConflict { name, .. }) if name == "secure"));
    }

    #[test]
    fn framework_min_is_preferred() {
        let set = ResolvedArtifacts::new(vec![
            zip("play", "framework", "1.2.4"),
            zip("play", "framework-min", "1.2.4"),
            jar("play"),
        ])
        .unwrap();
        let fw = find_framework(&set).unwrap();
        assert_eq!(set.get(fw.zip).classifier(), Some(&Classifier::FrameworkMin));
        assert_eq!(set.get(fw.jar).kind(), &ArtifactType::Jar);
    }

    #[test]
    fn missing_framework_jar_is_an_error() {
        let set = ResolvedArtifacts::new(vec![zip("play", "framework", "1.2.4")]).unwrap();
        assert!(matches!(
            find_framework(&set),
            Err(DomainError::MissingArtifact { .. })
        ));
    }
}

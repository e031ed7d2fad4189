//! Module activation.
//!
//! Decides which classified modules end up in the output. Modules owned by
//! the application (any scope but `provided`) are always active. A
//! `provided` module is active only when assembling a distribution and the
//! selected profile lists it under `module.<name>`.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{
    classifier::ModuleArtifactMap,
    entities::artifact::{ArtifactId, ResolvedArtifacts},
    profile::ProfileConfig,
};

/// Which pipeline the activation is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Archive assembly; provided modules may be activated by the profile.
    Dist,
    /// Plain extraction into the project; provided modules are skipped.
    Dependencies,
}

/// Where an active module is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Shipped with the framework: `modules/<name>/`.
    Provided,
    /// Owned by the application: `<name>-<version>/` under the modules dir.
    Application,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub name: String,
    pub artifact: ArtifactId,
    pub placement: Placement,
}

/// Partition of the classified modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    /// Application modules first, then activated provided modules; each
    /// group in name order.
    pub active: Vec<ModuleEntry>,
    /// Provided modules the profile does not activate. Their private
    /// dependency subtrees must still be claimed and discarded.
    pub inactive_provided: Vec<ModuleEntry>,
}

impl Activation {
    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|m| m.name == name)
    }
}

pub struct ActivationResolver;

impl ActivationResolver {
    pub fn resolve(
        modules: &ModuleArtifactMap,
        artifacts: &ResolvedArtifacts,
        config: &ProfileConfig,
        mode: Mode,
    ) -> Activation {
        let activated: BTreeSet<String> = config.active_module_names();

        let mut application = Vec::new();
        let mut provided = Vec::new();
        let mut inactive_provided = Vec::new();

        for (name, id) in modules.iter() {
            let artifact = artifacts.get(id);
            if !artifact.scope().is_provided() {
                application.push(ModuleEntry {
                    name: name.to_string(),
                    artifact: id,
                    placement: Placement::Application,
                });
                continue;
            }

            if mode == Mode::Dependencies {
                continue;
            }

            let entry = ModuleEntry {
                name: name.to_string(),
                artifact: id,
                placement: Placement::Provided,
            };
            if activated.contains(name) {
                provided.push(entry);
            } else {
                inactive_provided.push(entry);
            }
        }

        application.extend(provided);
        Activation {
            active: application,
            inactive_provided,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        classifier::ModuleClassifier,
        entities::artifact::{Artifact, ArtifactKey},
        value_objects::{ArtifactType, Scope},
    };

    fn module(name: &str, scope: Scope) -> Artifact {
        Artifact::new(
            ArtifactKey::new("g", format!("play-{name}"), ArtifactType::Zip).with_classifier("module"),
            "1.0",
            scope,
            format!("/repo/{name}.zip"),
        )
    }

    fn setup(conf: &str, mode: Mode) -> Activation {
        let set = ResolvedArtifacts::new(vec![
            module("crud", Scope::Provided),
            module("secure", Scope::Provided),
            module("pdf", Scope::Compile),
            module("excel", Scope::Runtime),
        ])
        .unwrap();
        let classified = ModuleClassifier::new().classify(&set).unwrap();
        let config = ProfileConfig::parse(conf, Some("prod")).unwrap();
        ActivationResolver::resolve(&classified.modules, &set, &config, mode)
    }

    fn names(entries: &[ModuleEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn non_provided_modules_are_always_active() {
        let a = setup("", Mode::Dist);
        assert_eq!(names(&a.active), vec!["excel", "pdf"]);
        assert_eq!(names(&a.inactive_provided), vec!["crud", "secure"]);
    }

    #[test]
    fn profile_activates_provided_modules_in_dist_mode() {
        let a = setup("%prod.module.crud=x", Mode::Dist);
        assert_eq!(names(&a.active), vec!["excel", "pdf", "crud"]);
        assert_eq!(a.active[2].placement, Placement::Provided);
        assert_eq!(names(&a.inactive_provided), vec!["secure"]);
    }

    #[test]
    fn other_profile_does_not_activate() {
        let a = setup("%test.module.crud=x", Mode::Dist);
        assert!(!a.is_active("crud"));
    }

    #[test]
    fn dependencies_mode_skips_provided_modules_entirely() {
        let a = setup("module.crud=x\nmodule.secure=y", Mode::Dependencies);
        assert_eq!(names(&a.active), vec!["excel", "pdf"]);
        assert!(a.inactive_provided.is_empty());
        assert!(a.active.iter().all(|m| m.placement == Placement::Application));
    }
}

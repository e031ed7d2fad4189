//! Module Service - read-only view of classification and activation.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::instrument;

use crate::{
    application::{ports::Filesystem, services::pipeline::read_profile_config},
    domain::{
        ActivationResolver, DestinationLayout, Mode, ModuleClassifier, ModuleConflict,
        ResolvedArtifacts, Scope,
    },
    error::PlaydistResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Active,
    /// Provided and not listed by the profile.
    Inactive,
    /// Provided, and the mode never extracts provided modules.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub coordinates: String,
    pub scope: Scope,
    pub status: ModuleStatus,
    /// Relative destination when active.
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleListing {
    pub profile: Option<String>,
    pub modules: Vec<ModuleInfo>,
    pub conflicts: Vec<ModuleConflict>,
}

pub struct ModuleService {
    filesystem: Box<dyn Filesystem>,
}

impl ModuleService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Classify and activate modules as `mode` would, without writing.
    ///
    /// In dist mode the application's configuration must be readable.
    #[instrument(skip_all, fields(base_dir = %base_dir.display(), ?mode))]
    pub fn list(
        &self,
        base_dir: &Path,
        profile: Option<&str>,
        artifacts: &ResolvedArtifacts,
        mode: Mode,
        strict: bool,
    ) -> PlaydistResult<ModuleListing> {
        let config = match mode {
            Mode::Dist => read_profile_config(self.filesystem.as_ref(), base_dir, profile, None)?,
            Mode::Dependencies => Default::default(),
        };
        let classification = ModuleClassifier::strict(strict).classify(artifacts)?;
        let activation =
            ActivationResolver::resolve(&classification.modules, artifacts, &config, mode);
        let layout = DestinationLayout::new(mode);

        let modules = classification
            .modules
            .iter()
            .map(|(name, id)| {
                let artifact = artifacts.get(id);
                let active = activation.active.iter().find(|m| m.name == name);
                let status = match active {
                    Some(_) => ModuleStatus::Active,
                    None if mode == Mode::Dependencies => ModuleStatus::Skipped,
                    None => ModuleStatus::Inactive,
                };
                ModuleInfo {
                    name: name.to_string(),
                    coordinates: artifact.coordinates(),
                    scope: artifact.scope(),
                    status,
                    destination: active
                        .map(|m| layout.module_dir(name, artifact.version(), m.placement)),
                }
            })
            .collect();

        Ok(ModuleListing {
            profile: config.profile().map(str::to_string),
            modules,
            conflicts: classification.conflicts,
        })
    }
}

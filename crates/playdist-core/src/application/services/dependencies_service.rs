//! Dependencies Service - bare extraction into the application directory.
//!
//! Workflow:
//! 1. Classify modules, then optionally clean `modules/` and `lib/`
//! 2. Extract every non-provided module to `modules/<name>-<version>/`
//! 3. Copy each module's private libraries into its own `lib/`
//! 4. Copy everything left into `lib/`
//!
//! Re-running against an up-to-date tree writes nothing.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{
        ports::{DependencyTree, Filesystem, Unarchiver},
        services::{
            materializer::{Materialized, Materializer},
            partitioner::SubtreePartitioner,
            pipeline::{DEFAULT_EXCLUDED_ARTIFACT, PoolOptions, build_pool},
        },
    },
    domain::{
        ActivationResolver, ArtifactKey, DestinationLayout, DomainValidator, Mode, ModuleClassifier,
        ModuleConflict, Placement, ProfileConfig, ResolvedArtifacts,
    },
    error::PlaydistResult,
};

#[derive(Debug, Clone)]
pub struct DependenciesOptions {
    /// Remove `modules/` (and `lib/` unless skipping jars) first.
    pub clean: bool,
    /// Re-extract and re-copy regardless of timestamps.
    pub overwrite: bool,
    /// Only extract modules; leave libraries alone.
    pub skip_jars: bool,
    /// Fail on the first module name conflict.
    pub strict: bool,
    pub excluded_artifacts: Vec<ArtifactKey>,
}

impl Default for DependenciesOptions {
    fn default() -> Self {
        Self {
            clean: false,
            overwrite: false,
            skip_jars: false,
            strict: false,
            excluded_artifacts: DEFAULT_EXCLUDED_ARTIFACT
                .parse::<ArtifactKey>()
                .into_iter()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulePlacement {
    pub name: String,
    pub directory: PathBuf,
    pub extraction: Materialized,
    pub libraries: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependenciesReport {
    pub modules: Vec<ModulePlacement>,
    pub shared_libraries: usize,
    /// Files actually written (extractions count once).
    pub written: usize,
    /// Placements skipped as already up to date.
    pub unchanged: usize,
    pub conflicts: Vec<ModuleConflict>,
}

impl DependenciesReport {
    fn record(&mut self, outcome: Materialized) {
        if outcome.wrote() {
            self.written += 1;
        } else {
            self.unchanged += 1;
        }
    }
}

pub struct DependenciesService {
    filesystem: Box<dyn Filesystem>,
    unarchiver: Box<dyn Unarchiver>,
}

impl DependenciesService {
    pub fn new(filesystem: Box<dyn Filesystem>, unarchiver: Box<dyn Unarchiver>) -> Self {
        Self {
            filesystem,
            unarchiver,
        }
    }

    #[instrument(skip_all, fields(base_dir = %base_dir.display()))]
    pub fn run(
        &self,
        base_dir: &Path,
        artifacts: &ResolvedArtifacts,
        tree: &dyn DependencyTree,
        options: &DependenciesOptions,
    ) -> PlaydistResult<DependenciesReport> {
        DomainValidator::validate_resolved(artifacts)?;

        let layout = DestinationLayout::dependencies();
        let materializer = Materializer::new(self.filesystem.as_ref(), self.unarchiver.as_ref());
        let mut report = DependenciesReport::default();

        // The profile plays no part here: provided modules are never extracted.
        let classification = ModuleClassifier::strict(options.strict).classify(artifacts)?;
        report.conflicts = classification.conflicts.clone();
        let activation = ActivationResolver::resolve(
            &classification.modules,
            artifacts,
            &ProfileConfig::default(),
            Mode::Dependencies,
        );

        if options.clean {
            self.clean(base_dir, &layout, options.skip_jars)?;
        }

        let mut module_dirs = Vec::with_capacity(activation.active.len());
        for entry in &activation.active {
            let module = artifacts.get(entry.artifact);
            let dir = base_dir.join(layout.module_dir(
                &entry.name,
                module.version(),
                Placement::Application,
            ));
            let extraction = materializer.extract_module(module, &dir, options.overwrite)?;
            report.record(extraction);
            info!(module = %entry.name, ?extraction, "Module placed");
            report.modules.push(ModulePlacement {
                name: entry.name.clone(),
                directory: dir.clone(),
                extraction,
                libraries: 0,
            });
            module_dirs.push(dir);
        }

        if options.skip_jars {
            info!("Library processing skipped");
            return Ok(report);
        }

        let pool_options = PoolOptions {
            exclude_provided: true,
            excluded_artifacts: options.excluded_artifacts.clone(),
            ..PoolOptions::default()
        };
        let partitioner = SubtreePartitioner::build(tree, artifacts)?;
        let mut pool = build_pool(artifacts, &partitioner, &pool_options);

        for (index, (entry, dir)) in activation.active.iter().zip(&module_dirs).enumerate() {
            let claim = partitioner.claim_module(&mut pool, &entry.name, entry.artifact);
            if claim.is_empty() {
                continue;
            }
            let lib_dir = dir.join("lib");
            for &id in claim.members() {
                let library = artifacts.get(id);
                let outcome = materializer.copy_library(
                    library,
                    &lib_dir,
                    &library.file_name(),
                    options.overwrite,
                )?;
                report.record(outcome);
            }
            report.modules[index].libraries = claim.len();
        }

        let shared = pool.release("lib");
        if !shared.is_empty() {
            let lib_dir = base_dir.join(layout.shared_lib_dir());
            for &id in shared.members() {
                let library = artifacts.get(id);
                let outcome = materializer.copy_library(
                    library,
                    &lib_dir,
                    &library.file_name(),
                    options.overwrite,
                )?;
                report.record(outcome);
            }
        }
        report.shared_libraries = shared.len();

        info!(
            modules = report.modules.len(),
            shared = report.shared_libraries,
            written = report.written,
            unchanged = report.unchanged,
            "Dependencies placed"
        );
        Ok(report)
    }

    fn clean(&self, base_dir: &Path, layout: &DestinationLayout, skip_jars: bool) -> PlaydistResult<()> {
        let mut targets = vec![base_dir.join(layout.modules_root(Placement::Application))];
        if !skip_jars {
            targets.push(base_dir.join(layout.shared_lib_dir()));
        }
        for target in targets {
            if self.filesystem.stat(&target)?.is_some() {
                info!(path = %target.display(), "Cleaning");
                self.filesystem.remove_dir_all(&target)?;
            }
        }
        Ok(())
    }
}

//! Dist Service - standalone distribution assembly.
//!
//! Workflow:
//! 1. Parse the profile configuration, classify and activate modules
//! 2. Build the working pool (classpath, exclusions, filters)
//! 3. Plan: application resources, framework, modules, shared libraries
//! 4. Write the plan into a fresh staging tree
//! 5. Optionally package the tree through the archiver
//!
//! Planning happens entirely before the first write, so duplicate
//! destinations abort the run with nothing on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ports::{ArchiveEntry, Archiver, DependencyTree, Filesystem, Unarchiver},
        services::{
            materializer::Materializer,
            partitioner::SubtreePartitioner,
            pipeline::{
                DEFAULT_EXCLUDED_ARTIFACT, PoolOptions, application_files, build_pool, entry_name,
                read_profile_config,
            },
        },
    },
    domain::{
        ActivationResolver, ArtifactKey, AssemblyPlan, DependencyFilter, DestinationLayout,
        DomainError, DomainValidator, Mode, ModuleClassifier, ModuleConflict, PathFilter,
        Placement, ResolvedArtifacts, dist_file_name, find_framework, library_file_name,
    },
    error::PlaydistResult,
};

pub const DEFAULT_APPLICATION_INCLUDES: &str = "app/**,conf/**,public/**,tags/**,test/**";
const DEFAULT_ARCHIVE_NAME: &str = "dist";
/// Directory below the output dir that holds staging trees.
pub const STAGING_DIR: &str = "dist-staging";

#[derive(Debug, Clone)]
pub struct DistRequest {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Profile id selecting `%<id>.` keys.
    pub profile: Option<String>,
    /// Substituted for `${play.path}` in module paths.
    pub framework_home: Option<PathBuf>,
    /// Falls back to `application.name`, then `dist`.
    pub archive_name: Option<String>,
    pub classifier: Option<String>,
    pub application_includes: String,
    pub application_excludes: String,
    pub dependency_includes: String,
    pub dependency_excludes: String,
    pub excluded_artifacts: Vec<ArtifactKey>,
    /// Package the tree into a zip; otherwise the tree is the deliverable.
    pub create_archive: bool,
    pub strict: bool,
}

impl DistRequest {
    pub fn new(base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            output_dir: output_dir.into(),
            profile: None,
            framework_home: None,
            archive_name: None,
            classifier: None,
            application_includes: DEFAULT_APPLICATION_INCLUDES.to_string(),
            application_excludes: String::new(),
            dependency_includes: String::new(),
            dependency_excludes: String::new(),
            excluded_artifacts: DEFAULT_EXCLUDED_ARTIFACT
                .parse::<ArtifactKey>()
                .into_iter()
                .collect(),
            create_archive: true,
            strict: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistModule {
    pub name: String,
    pub placement: Placement,
    pub directory: PathBuf,
    pub libraries: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistReport {
    pub staging_dir: PathBuf,
    pub archive: Option<PathBuf>,
    pub framework_libraries: usize,
    pub modules: Vec<DistModule>,
    /// Libraries private to inactive provided modules, left out.
    pub discarded_libraries: usize,
    pub shared_libraries: usize,
    pub application_files: usize,
    pub total_files: usize,
    pub conflicts: Vec<ModuleConflict>,
}

pub struct DistService {
    filesystem: Box<dyn Filesystem>,
    unarchiver: Box<dyn Unarchiver>,
    archiver: Box<dyn Archiver>,
}

impl DistService {
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        unarchiver: Box<dyn Unarchiver>,
        archiver: Box<dyn Archiver>,
    ) -> Self {
        Self {
            filesystem,
            unarchiver,
            archiver,
        }
    }

    #[instrument(skip_all, fields(base_dir = %request.base_dir.display()))]
    pub fn run(
        &self,
        request: &DistRequest,
        artifacts: &ResolvedArtifacts,
        tree: &dyn DependencyTree,
    ) -> PlaydistResult<DistReport> {
        DomainValidator::validate_resolved(artifacts)?;

        // 1. Configuration and activation
        let config = read_profile_config(
            self.filesystem.as_ref(),
            &request.base_dir,
            request.profile.as_deref(),
            request.framework_home.as_deref(),
        )?;
        let classification = ModuleClassifier::strict(request.strict).classify(artifacts)?;
        let activation =
            ActivationResolver::resolve(&classification.modules, artifacts, &config, Mode::Dist);

        let archive_name = request
            .archive_name
            .clone()
            .or_else(|| config.application_name().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
        DomainValidator::validate_segment("archive name", &archive_name)?;
        if let Some(classifier) = request.classifier.as_deref().filter(|c| !c.is_empty()) {
            DomainValidator::validate_segment("archive classifier", classifier)?;
        }
        let staging_dir = request.output_dir.join(STAGING_DIR).join(&archive_name);

        // 2. Working pool
        let pool_options = PoolOptions {
            exclude_provided: false,
            excluded_artifacts: request.excluded_artifacts.clone(),
            filter: DependencyFilter::new(
                &request.dependency_includes,
                &request.dependency_excludes,
            )?,
        };
        let partitioner = SubtreePartitioner::build(tree, artifacts)?;
        let mut pool = build_pool(artifacts, &partitioner, &pool_options);
        let materializer = Materializer::new(self.filesystem.as_ref(), self.unarchiver.as_ref());
        let layout = DestinationLayout::dist();
        let mut plan = AssemblyPlan::new();

        // 3a. Application resources
        let resources = PathFilter::new(
            &request.application_includes,
            &request.application_excludes,
        )?;
        let mut application_count = 0;
        for rel in application_files(self.filesystem.as_ref(), &request.base_dir, &request.output_dir)? {
            if !resources.matches(&entry_name(&rel)) {
                continue;
            }
            plan.add_copy(
                layout.application_dir().join(&rel),
                request.base_dir.join(&rel),
                "application",
            )?;
            application_count += 1;
        }
        debug!(files = application_count, "Application resources planned");

        // 3b. Framework first
        let framework = find_framework(artifacts)?;
        let framework_zip = artifacts.get(framework.zip);
        let framework_jar = artifacts.get(framework.jar);
        materializer.check_reactor(framework_zip)?;
        plan.add_extraction(
            PathBuf::new(),
            framework_zip.file(),
            framework_zip.coordinates(),
            self.unarchiver.entries(framework_zip.file())?,
        )?;

        let jar_claim = pool.claim("framework", [framework.jar]);
        if jar_claim.is_empty() {
            return Err(DomainError::MissingArtifact {
                what: format!("the framework jar {} (excluded or filtered out)", framework_jar.key()),
            }
            .into());
        }
        materializer.check_reactor(framework_jar)?;
        plan.add_copy(
            layout.framework_jar(framework_jar),
            framework_jar.file(),
            framework_jar.coordinates(),
        )?;

        let framework_libs = partitioner.claim_subtree(&mut pool, "framework", framework.jar);
        for &id in framework_libs.members() {
            let library = artifacts.get(id);
            materializer.check_reactor(library)?;
            plan.add_copy(
                layout.framework_lib_dir().join(library.file_name()),
                library.file(),
                library.coordinates(),
            )?;
        }
        info!(
            framework = %framework_jar.coordinates(),
            libraries = framework_libs.len(),
            "Framework planned"
        );

        // 3c. Active modules, then the leftovers of inactive provided ones
        let mut modules = Vec::with_capacity(activation.active.len());
        for entry in &activation.active {
            let module = artifacts.get(entry.artifact);
            materializer.check_reactor(module)?;
            let dir = layout.module_dir(&entry.name, module.version(), entry.placement);
            plan.add_extraction(
                &dir,
                module.file(),
                module.coordinates(),
                self.unarchiver.entries(module.file())?,
            )?;

            let claim = partitioner.claim_module(&mut pool, &entry.name, entry.artifact);
            for &id in claim.members() {
                let library = artifacts.get(id);
                materializer.check_reactor(library)?;
                plan.add_copy(
                    dir.join("lib").join(library_file_name(Some(&entry.name), library)),
                    library.file(),
                    library.coordinates(),
                )?;
            }
            info!(module = %entry.name, libraries = claim.len(), "Module planned");
            modules.push(DistModule {
                name: entry.name.clone(),
                placement: entry.placement,
                directory: dir,
                libraries: claim.len(),
            });
        }

        let mut discarded = 0;
        for entry in &activation.inactive_provided {
            let claim = partitioner.claim_module(&mut pool, &entry.name, entry.artifact);
            debug!(module = %entry.name, discarded = claim.len(), "Inactive module skipped");
            discarded += claim.len();
        }

        // 3d. Shared libraries
        let shared = pool.release("application");
        for &id in shared.members() {
            let library = artifacts.get(id);
            materializer.check_reactor(library)?;
            plan.add_copy(
                layout.shared_lib_dir().join(library.file_name()),
                library.file(),
                library.coordinates(),
            )?;
        }
        info!(libraries = shared.len(), "Shared libraries planned");

        // 4. Staging tree
        self.write_plan(&materializer, &plan, &staging_dir)?;
        info!(
            staging = %staging_dir.display(),
            files = plan.len(),
            "Distribution tree written"
        );

        // 5. Archive
        let archive = if request.create_archive {
            let path = request
                .output_dir
                .join(dist_file_name(&archive_name, request.classifier.as_deref()));
            let entries: Vec<ArchiveEntry> = plan
                .files()
                .map(|e| ArchiveEntry {
                    source: staging_dir.join(&e.destination),
                    name: entry_name(&e.destination),
                })
                .collect();
            let summary = self.archiver.create(&path, &entries)?;
            info!(archive = %summary.path.display(), entries = summary.entries, "Archive written");
            Some(summary.path)
        } else {
            None
        };

        Ok(DistReport {
            staging_dir,
            archive,
            framework_libraries: framework_libs.len(),
            modules,
            discarded_libraries: discarded,
            shared_libraries: shared.len(),
            application_files: application_count,
            total_files: plan.len(),
            conflicts: classification.conflicts,
        })
    }

    fn write_plan(
        &self,
        materializer: &Materializer<'_>,
        plan: &AssemblyPlan,
        staging_dir: &Path,
    ) -> PlaydistResult<()> {
        if self.filesystem.stat(staging_dir)?.is_some() {
            debug!(path = %staging_dir.display(), "Removing previous staging tree");
            self.filesystem.remove_dir_all(staging_dir)?;
        }
        self.filesystem.create_dir_all(staging_dir)?;

        for extraction in plan.extractions() {
            let dest = staging_dir.join(&extraction.destination);
            let files = materializer.unpack(&extraction.archive, &dest)?;
            debug!(archive = %extraction.archive.display(), files, "Unpacked");
        }

        for entry in plan.copies() {
            let dest = staging_dir.join(&entry.destination);
            let (Some(dir), Some(name)) = (dest.parent(), dest.file_name()) else {
                continue;
            };
            materializer.copy_into(&entry.source, dir, &name.to_string_lossy(), true)?;
        }
        Ok(())
    }
}

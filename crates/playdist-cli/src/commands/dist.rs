//! `playdist dist` — assemble a standalone distribution.

use tracing::{info, instrument};

use playdist_adapters::{LocalFilesystem, ZipArchiver, ZipUnarchiver};
use playdist_core::application::{DistRequest, DistService};

use crate::{
    cli::DistArgs,
    commands::{excluded_artifacts, load_resolved, project_paths},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: DistArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.skip {
        output.info("Distribution skipped")?;
        return Ok(());
    }

    let (base_dir, manifest) = project_paths(&args.project, &config);
    let resolved = load_resolved(manifest)?;
    let request = build_request(&args, &config, base_dir)?;

    let service = DistService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ZipUnarchiver::new()),
        Box::new(ZipArchiver::new()),
    );
    info!(base_dir = %request.base_dir.display(), "Assembling distribution");
    let report = service.run(&request, &resolved.artifacts, &resolved.graph)?;

    for conflict in &report.conflicts {
        output.warning(&format!(
            "Module '{}' resolved twice; kept {}, discarded {}",
            conflict.name, conflict.kept, conflict.discarded
        ))?;
    }
    output.header(&format!("Distribution tree: {}", report.staging_dir.display()))?;
    output.print(&format!("  framework libraries  {}", report.framework_libraries))?;
    for module in &report.modules {
        output.print(&format!(
            "  {:<20} {} ({} libraries)",
            module.name,
            module.directory.display(),
            module.libraries
        ))?;
    }
    output.print(&format!("  shared libraries     {}", report.shared_libraries))?;
    output.print(&format!("  application files    {}", report.application_files))?;
    if report.discarded_libraries > 0 {
        output.print(&format!(
            "  left out with inactive modules: {}",
            report.discarded_libraries
        ))?;
    }

    match &report.archive {
        Some(archive) => output.success(&format!(
            "Archive written: {} ({} files)",
            archive.display(),
            report.total_files
        ))?,
        None => output.success(&format!("{} files placed", report.total_files))?,
    }
    Ok(())
}

fn build_request(
    args: &DistArgs,
    config: &AppConfig,
    base_dir: std::path::PathBuf,
) -> CliResult<DistRequest> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.dist.output_dir));
    let pick = |flag: &Option<String>, configured: &String| {
        flag.clone().unwrap_or_else(|| configured.clone())
    };

    let mut request = DistRequest::new(base_dir, output_dir);
    request.profile = args.profile.clone().or_else(|| config.project.profile.clone());
    request.framework_home = config.project.framework_home.clone();
    request.archive_name = args.archive_name.clone();
    request.classifier = args.classifier.clone().or_else(|| config.dist.classifier.clone());
    request.application_includes = pick(&args.app_includes, &config.dist.app_includes);
    request.application_excludes = pick(&args.app_excludes, &config.dist.app_excludes);
    request.dependency_includes = pick(&args.dep_includes, &config.dist.dep_includes);
    request.dependency_excludes = pick(&args.dep_excludes, &config.dist.dep_excludes);
    request.excluded_artifacts = excluded_artifacts(config)?;
    request.create_archive = config.dist.archive && !args.no_archive;
    request.strict = args.strict || config.dependencies.strict;
    Ok(request)
}

//! `playdist deps` — place modules and libraries into the application.

use tracing::{info, instrument};

use playdist_adapters::{LocalFilesystem, ZipUnarchiver};
use playdist_core::application::{DependenciesOptions, DependenciesService};

use crate::{
    cli::DepsArgs,
    commands::{excluded_artifacts, load_resolved, project_paths},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: DepsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.skip {
        output.info("Dependency placement skipped")?;
        return Ok(());
    }

    let (base_dir, manifest) = project_paths(&args.project, &config);
    let resolved = load_resolved(manifest)?;

    let options = DependenciesOptions {
        clean: args.clean,
        overwrite: args.overwrite,
        skip_jars: args.skip_jars,
        strict: args.strict || config.dependencies.strict,
        excluded_artifacts: excluded_artifacts(&config)?,
    };

    let service = DependenciesService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(ZipUnarchiver::new()),
    );
    info!(base_dir = %base_dir.display(), "Placing dependencies");
    let report = service.run(&base_dir, &resolved.artifacts, &resolved.graph, &options)?;

    for conflict in &report.conflicts {
        output.warning(&format!(
            "Module '{}' resolved twice; kept {}, discarded {}",
            conflict.name, conflict.kept, conflict.discarded
        ))?;
    }
    for module in &report.modules {
        output.print(&format!(
            "  {:<20} {} ({} libraries)",
            module.name,
            module.directory.display(),
            module.libraries
        ))?;
    }
    output.success(&format!(
        "{} modules, {} shared libraries ({} written, {} up to date)",
        report.modules.len(),
        report.shared_libraries,
        report.written,
        report.unchanged
    ))?;
    Ok(())
}

//! `playdist modules` — show classification and activation.

use owo_colors::OwoColorize;
use tracing::instrument;

use playdist_adapters::LocalFilesystem;
use playdist_core::{
    application::{ModuleService, ModuleStatus},
    domain::Mode,
};

use crate::{
    cli::{ListFormat, ModeArg, ModulesArgs},
    commands::{load_resolved, project_paths},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: ModulesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (base_dir, manifest) = project_paths(&args.project, &config);
    let resolved = load_resolved(manifest)?;
    let mode = match args.mode {
        ModeArg::Dist => Mode::Dist,
        ModeArg::Deps => Mode::Dependencies,
    };
    let profile = args.profile.or(config.project.profile);

    let listing = ModuleService::new(Box::new(LocalFilesystem::new())).list(
        &base_dir,
        profile.as_deref(),
        &resolved.artifacts,
        mode,
        config.dependencies.strict,
    )?;

    if args.format == ListFormat::Json {
        output.json(&listing)?;
        return Ok(());
    }

    if listing.modules.is_empty() {
        output.info("No modules in the resolved dependencies")?;
        return Ok(());
    }

    output.header(&format!(
        "{:<20} {:<10} {:<9} DESTINATION",
        "MODULE", "STATUS", "SCOPE"
    ))?;
    for module in &listing.modules {
        let status = status_label(module.status);
        let status = if output.supports_color() {
            match module.status {
                ModuleStatus::Active => format!("{:<10}", status).green().to_string(),
                _ => format!("{:<10}", status).dimmed().to_string(),
            }
        } else {
            format!("{:<10}", status)
        };
        let destination = module
            .destination
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "-".into());
        output.print(&format!(
            "{:<20} {} {:<9} {}",
            module.name,
            status,
            module.scope.as_str(),
            destination
        ))?;
    }
    for conflict in &listing.conflicts {
        output.warning(&format!(
            "Module '{}' resolved twice; kept {}, discarded {}",
            conflict.name, conflict.kept, conflict.discarded
        ))?;
    }
    Ok(())
}

fn status_label(status: ModuleStatus) -> &'static str {
    match status {
        ModuleStatus::Active => "active",
        ModuleStatus::Inactive => "inactive",
        ModuleStatus::Skipped => "skipped",
    }
}

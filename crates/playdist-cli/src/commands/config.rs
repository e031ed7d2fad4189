//! `playdist config` — inspect configuration values.

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::active_path(global.config.as_ref()).display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let optional = |v: &Option<String>| v.clone().unwrap_or_default();
    match key {
        "project.base_dir" => Ok(config.project.base_dir.display().to_string()),
        "project.manifest" => Ok(config.project.manifest.display().to_string()),
        "project.profile" => Ok(optional(&config.project.profile)),
        "project.framework_home" => Ok(config
            .project
            .framework_home
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()),
        "dependencies.excluded_artifacts" => Ok(config.dependencies.excluded_artifacts.clone()),
        "dependencies.strict" => Ok(config.dependencies.strict.to_string()),
        "dist.output_dir" => Ok(config.dist.output_dir.display().to_string()),
        "dist.classifier" => Ok(optional(&config.dist.classifier)),
        "dist.app_includes" => Ok(config.dist.app_includes.clone()),
        "dist.app_excludes" => Ok(config.dist.app_excludes.clone()),
        "dist.dep_includes" => Ok(config.dist.dep_includes.clone()),
        "dist.dep_excludes" => Ok(config.dist.dep_excludes.clone()),
        "dist.archive" => Ok(config.dist.archive.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
